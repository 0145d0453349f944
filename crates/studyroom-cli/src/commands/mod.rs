pub mod config;
pub mod exam;
pub mod performance;
pub mod plan;
pub mod serve;
pub mod user;

use chrono::{Local, NaiveDate};
use studyroom_core::planner::wire::parse_exam_date;

/// clap value parser for `YYYY-MM-DD` dates.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_exam_date(raw).ok_or_else(|| format!("'{raw}' is not a YYYY-MM-DD date"))
}

/// Planning date: the explicit override or today's local date.
pub fn planning_date(explicit: Option<NaiveDate>) -> NaiveDate {
    explicit.unwrap_or_else(|| Local::now().date_naive())
}
