pub mod config;
pub mod models;

pub use config::Settings;
pub use models::*;
