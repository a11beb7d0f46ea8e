pub mod calculations;
pub mod error;
pub mod models;
pub mod service;
pub mod source;

pub use error::TaxError;
pub use models::*;
pub use service::{TaxCalculator, TaxService};
pub use source::{BracketSource, SourceConfig, SourceError, SourceFactory, SourceRegistry};
