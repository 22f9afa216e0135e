// Domain value objects
pub mod activity_kind;

pub use activity_kind::*;
