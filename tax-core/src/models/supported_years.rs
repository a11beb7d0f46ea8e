use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tax years a deployment is willing to calculate for.
///
/// This is policy data; it is injected into the validator rather than
/// compiled into it, so adding a year is a configuration change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupportedYears(BTreeSet<i32>);

impl SupportedYears {
    pub fn new(years: impl IntoIterator<Item = i32>) -> Self {
        Self(years.into_iter().collect())
    }

    pub fn contains(
        &self,
        year: i32,
    ) -> bool {
        self.0.contains(&year)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Years in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().copied()
    }
}

impl Default for SupportedYears {
    fn default() -> Self {
        Self::new(2019..=2022)
    }
}

impl fmt::Display for SupportedYears {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let years: Vec<String> = self.0.iter().map(i32::to_string).collect();
        write!(f, "{}", years.join(", "))
    }
}
