mod client;
mod factory;

pub use client::HttpBracketSource;
pub use factory::HttpSourceFactory;
