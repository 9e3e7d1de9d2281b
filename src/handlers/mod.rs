pub mod error;
pub mod info;
pub mod patient;

pub use error::*;
pub use info::*;
pub use patient::*;
