pub mod error;
pub mod patient;

pub use error::*;
pub use patient::*;
