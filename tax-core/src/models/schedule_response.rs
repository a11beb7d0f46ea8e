use serde::{Deserialize, Serialize};

use super::TaxBracket;

/// Body of the schedule API's `GET /tax-calculator/tax-year/{year}` response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub tax_brackets: Vec<TaxBracket>,
}
