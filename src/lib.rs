pub mod economics;
pub mod error;
pub mod export;
pub mod season;
pub mod table;

pub use error::Error;
