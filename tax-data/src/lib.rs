pub mod api;
pub mod loader;
pub mod source;

pub use loader::{ScheduleLoader, ScheduleLoaderError, ScheduleRecord};
pub use source::{CsvBracketSource, CsvSourceFactory};
