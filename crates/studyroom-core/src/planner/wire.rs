//! JSON request shape accepted at the API boundary.
//!
//! Callers send loosely-typed data (optional dates, any integer for hours);
//! [`ScheduleRequestPayload::resolve`] turns it into a [`ScheduleRequest`] or
//! reports the first field that cannot be used.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{Difficulty, PreferredTime, ScheduleRequest, StudySubject, MAX_HOURS_PER_DAY, MIN_HOURS_PER_DAY};
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPayload {
    pub name: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub exam_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequestPayload {
    #[serde(default)]
    pub subjects: Vec<SubjectPayload>,
    pub available_hours_per_day: i64,
    pub preferred_study_time: PreferredTime,
}

impl ScheduleRequestPayload {
    /// Resolve exam dates and check the hour budget.
    ///
    /// An empty subject list is left for [`super::plan`] to reject.
    pub fn resolve(&self) -> Result<ScheduleRequest, ValidationError> {
        let hours_per_day = u32::try_from(self.available_hours_per_day)
            .ok()
            .filter(|h| (MIN_HOURS_PER_DAY..=MAX_HOURS_PER_DAY).contains(h))
            .ok_or(ValidationError::HoursPerDayOutOfRange {
                value: self.available_hours_per_day,
            })?;

        let subjects = self
            .subjects
            .iter()
            .enumerate()
            .map(|(index, subject)| {
                let raw = subject
                    .exam_date
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| ValidationError::MissingExamDate {
                        index,
                        subject: subject.name.clone(),
                    })?;
                let exam_date = parse_exam_date(raw).ok_or_else(|| ValidationError::InvalidExamDate {
                    index,
                    subject: subject.name.clone(),
                    value: raw.to_string(),
                })?;
                Ok(StudySubject::new(subject.name.clone(), subject.difficulty, exam_date))
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(ScheduleRequest {
            subjects,
            hours_per_day,
            preferred_time: self.preferred_study_time,
        })
    }
}

/// Parse `YYYY-MM-DD`, or take the date part of an RFC 3339 timestamp.
pub fn parse_exam_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}
