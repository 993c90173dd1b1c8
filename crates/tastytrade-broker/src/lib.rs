pub mod client;
pub mod error;
pub mod models;

pub use client::TastytradeClient;
pub use error::TastytradeError;
