// Domain services

pub mod detector;
pub mod ledger;

pub use detector::*;
pub use ledger::*;
