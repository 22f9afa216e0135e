// Vigil Domain Layer

pub mod entities;
pub mod services;
pub mod utils;
pub mod value_objects;

pub use entities::*;
pub use services::*;
pub use utils::*;
pub use value_objects::*;
