pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod routes;

pub use config::{Cli, Config};
pub use error::ApiError;
