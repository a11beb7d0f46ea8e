pub mod bracket_source;
pub mod factory;

pub use bracket_source::{BracketSource, SourceError};
pub use factory::{SourceConfig, SourceFactory, SourceRegistry};
