mod schedule_response;
mod supported_years;
mod tax_bracket;
mod tax_result;

pub use schedule_response::ScheduleResponse;
pub use supported_years::SupportedYears;
pub use tax_bracket::TaxBracket;
pub use tax_result::TaxResult;
