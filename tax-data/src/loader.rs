use std::collections::BTreeMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::TaxBracket;
use thiserror::Error;

/// Errors that can occur when loading tax schedule data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid schedule for {year}: {reason}")]
    InvalidSchedule { year: i32, reason: String },
}

impl From<csv::Error> for ScheduleLoaderError {
    fn from(err: csv::Error) -> Self {
        ScheduleLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the tax schedule CSV file.
///
/// - `tax_year`: The tax year (e.g., 2022)
/// - `min`: The lower bound of this bracket
/// - `max`: The upper bound of this bracket (empty or `0` for unlimited)
/// - `rate`: The marginal tax rate as a decimal (e.g., 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScheduleRecord {
    pub tax_year: i32,
    pub min: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max: Option<Decimal>,
    pub rate: Decimal,
}

impl ScheduleRecord {
    fn to_bracket(&self) -> TaxBracket {
        TaxBracket::new(self.min, self.max.unwrap_or(Decimal::ZERO), self.rate)
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for tax schedules from CSV files.
///
/// Records are grouped by tax year in file order and every schedule is
/// checked before use, so sources built on the loader only ever hand out
/// ascending, non-overlapping brackets.
pub struct ScheduleLoader;

impl ScheduleLoader {
    /// Parse schedule records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ScheduleRecord>, ScheduleLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ScheduleRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records into one validated schedule per tax year.
    ///
    /// Brackets keep the order they appear in for their year; the file is
    /// expected to list each year's bands from lowest to highest.
    pub fn group(
        records: &[ScheduleRecord]
    ) -> Result<BTreeMap<i32, Vec<TaxBracket>>, ScheduleLoaderError> {
        let mut schedules: BTreeMap<i32, Vec<TaxBracket>> = BTreeMap::new();

        for record in records {
            schedules
                .entry(record.tax_year)
                .or_default()
                .push(record.to_bracket());
        }

        for (year, brackets) in &schedules {
            Self::validate(*year, brackets)?;
        }

        Ok(schedules)
    }

    /// Parse and group in one step.
    pub fn load<R: Read>(
        reader: R
    ) -> Result<BTreeMap<i32, Vec<TaxBracket>>, ScheduleLoaderError> {
        let records = Self::parse(reader)?;
        Self::group(&records)
    }

    /// Check that a schedule is usable by the bracket accumulator.
    ///
    /// Bounds must be non-negative, rates within `[0, 1]`, bounded bands
    /// must have `max > min`, bands must ascend without overlapping, and
    /// only the last band may be open-ended.
    pub fn validate(
        year: i32,
        brackets: &[TaxBracket],
    ) -> Result<(), ScheduleLoaderError> {
        let invalid = |reason: String| ScheduleLoaderError::InvalidSchedule { year, reason };

        let mut previous: Option<&TaxBracket> = None;
        for bracket in brackets {
            if bracket.min.is_sign_negative() || bracket.max.is_sign_negative() {
                return Err(invalid(format!(
                    "bracket {}-{} has a negative bound",
                    bracket.min, bracket.max
                )));
            }
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(invalid(format!(
                    "rate {} of bracket starting at {} is outside [0, 1]",
                    bracket.rate, bracket.min
                )));
            }
            if let Some(max) = bracket.upper_bound() {
                if max <= bracket.min {
                    return Err(invalid(format!(
                        "bracket starting at {} ends at {}",
                        bracket.min, max
                    )));
                }
            }

            if let Some(prev) = previous {
                match prev.upper_bound() {
                    None => {
                        return Err(invalid(format!(
                            "open-ended bracket at {} is followed by bracket at {}",
                            prev.min, bracket.min
                        )));
                    }
                    Some(prev_max) if bracket.min < prev_max => {
                        return Err(invalid(format!(
                            "bracket starting at {} overlaps bracket {}-{}",
                            bracket.min, prev.min, prev_max
                        )));
                    }
                    Some(_) => {}
                }
            }

            previous = Some(bracket);
        }

        Ok(())
    }
}
