use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use tax_core::{BracketSource, SourceConfig, SourceError, SourceFactory, TaxBracket};
use tracing::{debug, info};

use crate::loader::{ScheduleLoader, ScheduleLoaderError};

impl From<ScheduleLoaderError> for SourceError {
    fn from(err: ScheduleLoaderError) -> Self {
        SourceError::Decode(err.to_string())
    }
}

/// Bracket source serving validated schedules held in memory.
#[derive(Debug, Clone, Default)]
pub struct CsvBracketSource {
    schedules: BTreeMap<i32, Vec<TaxBracket>>,
}

impl CsvBracketSource {
    pub fn new(schedules: BTreeMap<i32, Vec<TaxBracket>>) -> Self {
        Self { schedules }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScheduleLoaderError> {
        Ok(Self::new(ScheduleLoader::load(reader)?))
    }

    pub async fn from_path(path: &Path) -> Result<Self, SourceError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            SourceError::Io(format!("cannot read schedule file '{}': {e}", path.display()))
        })?;
        let source = Self::from_reader(bytes.as_slice())?;

        info!(
            path = %path.display(),
            years = ?source.years(),
            "loaded tax schedules"
        );
        Ok(source)
    }

    /// Years with a schedule, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.schedules.keys().copied().collect()
    }
}

#[async_trait]
impl BracketSource for CsvBracketSource {
    async fn fetch_brackets(
        &self,
        year: i32,
    ) -> Result<Vec<TaxBracket>, SourceError> {
        let brackets = self
            .schedules
            .get(&year)
            .cloned()
            .ok_or(SourceError::NotFound(year))?;

        debug!(year, count = brackets.len(), "serving schedule from file");
        Ok(brackets)
    }
}

/// Builds a [`CsvBracketSource`] from the CSV file named by `location`.
pub struct CsvSourceFactory;

#[async_trait]
impl SourceFactory for CsvSourceFactory {
    fn backend_name(&self) -> &'static str {
        "csv"
    }

    async fn create(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn BracketSource>, SourceError> {
        let source = CsvBracketSource::from_path(Path::new(&config.location)).await?;
        Ok(Box::new(source))
    }
}
