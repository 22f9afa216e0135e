// Domain entities

pub mod activity;
pub mod item;
pub mod price_point;

pub use activity::*;
pub use item::*;
pub use price_point::*;
