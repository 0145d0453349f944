//! Study-plan schedule generator.
//!
//! Splits a fixed daily study budget across subjects, weighted by difficulty
//! and ordered by exam proximity:
//! - Subjects are ranked by days until their exam (stable, earliest first)
//! - Each subject gets `round(weight / total_weight * hours_per_day)` hours
//! - The schedule covers at most 14 days, or fewer if an exam is closer
//! - Hard subjects produce a "focus more" recommendation
//!
//! [`plan`] is a pure function. The planning date is passed in by the caller,
//! so identical input always yields identical output.

pub mod wire;

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub use wire::{ScheduleRequestPayload, SubjectPayload};

/// Upper bound on the number of planned days.
pub const MAX_HORIZON_DAYS: i64 = 14;
/// Smallest accepted daily study budget.
pub const MIN_HOURS_PER_DAY: u32 = 1;
/// Largest accepted daily study budget.
pub const MAX_HOURS_PER_DAY: u32 = 12;

/// Advice appended after the per-subject recommendations.
pub const GENERAL_RECOMMENDATIONS: [&str; 2] = [
    "Review weak topics regularly",
    "Take short breaks every 25 minutes",
];

/// Subject difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Relative share of the daily budget.
    pub fn weight(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ValidationError::InvalidValue {
                field: "difficulty".to_string(),
                message: format!("expected easy, medium or hard, got '{other}'"),
            }),
        }
    }
}

/// Preferred time of day for study sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredTime {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl PreferredTime {
    fn start_hour(self) -> u32 {
        match self {
            PreferredTime::Morning => 8,
            PreferredTime::Afternoon => 14,
            PreferredTime::Evening => 18,
            PreferredTime::Night => 20,
        }
    }

    /// Clock time every session of the day starts at.
    pub fn start_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.start_hour(), 0, 0).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PreferredTime::Morning => "morning",
            PreferredTime::Afternoon => "afternoon",
            PreferredTime::Evening => "evening",
            PreferredTime::Night => "night",
        }
    }
}

impl fmt::Display for PreferredTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferredTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(PreferredTime::Morning),
            "afternoon" => Ok(PreferredTime::Afternoon),
            "evening" => Ok(PreferredTime::Evening),
            "night" => Ok(PreferredTime::Night),
            other => Err(ValidationError::InvalidValue {
                field: "preferredStudyTime".to_string(),
                message: format!("expected morning, afternoon, evening or night, got '{other}'"),
            }),
        }
    }
}

/// One subject to prepare for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySubject {
    pub name: String,
    pub difficulty: Difficulty,
    pub exam_date: NaiveDate,
}

impl StudySubject {
    pub fn new(name: impl Into<String>, difficulty: Difficulty, exam_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            difficulty,
            exam_date,
        }
    }

    /// Whole days from `planning_date` to the exam (negative if already past).
    pub fn days_until_exam(&self, planning_date: NaiveDate) -> i64 {
        (self.exam_date - planning_date).num_days()
    }
}

/// Planner input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub subjects: Vec<StudySubject>,
    pub hours_per_day: u32,
    pub preferred_time: PreferredTime,
}

impl ScheduleRequest {
    /// Latest exam among the subjects; the end date of a persisted plan.
    pub fn latest_exam_date(&self) -> Option<NaiveDate> {
        self.subjects.iter().map(|s| s.exam_date).max()
    }
}

/// One subject's session on a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyTask {
    pub subject: String,
    pub topic: String,
    #[serde(rename = "duration")]
    pub duration_hours: u32,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
}

/// One planned day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub tasks: Vec<StudyTask>,
}

impl DaySchedule {
    pub fn total_hours(&self) -> u32 {
        self.tasks.iter().map(|t| t.duration_hours).sum()
    }
}

/// Planner output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    #[serde(rename = "schedule")]
    pub days: Vec<DaySchedule>,
    pub recommendations: Vec<String>,
}

/// `HH:MM` (de)serialization for session start times.
mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Check a request against `planning_date` without planning it.
pub fn validate(request: &ScheduleRequest, planning_date: NaiveDate) -> Result<(), ValidationError> {
    if request.subjects.is_empty() {
        return Err(ValidationError::NoSubjects);
    }
    if !(MIN_HOURS_PER_DAY..=MAX_HOURS_PER_DAY).contains(&request.hours_per_day) {
        return Err(ValidationError::HoursPerDayOutOfRange {
            value: i64::from(request.hours_per_day),
        });
    }
    for (index, subject) in request.subjects.iter().enumerate() {
        if subject.name.trim().is_empty() {
            return Err(ValidationError::EmptySubjectName { index });
        }
        if subject.exam_date < planning_date {
            return Err(ValidationError::ExamDateInPast {
                index,
                subject: subject.name.clone(),
                exam_date: subject.exam_date,
                planning_date,
            });
        }
    }
    Ok(())
}

/// Generate a day-by-day study schedule starting at `planning_date`.
///
/// # Errors
/// Returns a [`ValidationError`] when the request has no subjects, a blank
/// subject name, an exam before `planning_date`, or `hours_per_day` outside
/// 1..=12.
pub fn plan(request: &ScheduleRequest, planning_date: NaiveDate) -> Result<ScheduleResult, ValidationError> {
    validate(request, planning_date)?;

    let mut ranked: Vec<(i64, &StudySubject)> = request
        .subjects
        .iter()
        .map(|s| (s.days_until_exam(planning_date), s))
        .collect();
    // sort_by_key is stable: equal exam distances keep input order
    ranked.sort_by_key(|(days, _)| *days);

    let total_weight: u32 = ranked.iter().map(|(_, s)| s.difficulty.weight()).sum();
    let nearest = ranked.first().map_or(1, |(days, _)| *days);
    let horizon = nearest.min(MAX_HORIZON_DAYS).max(1);
    let start_time = request.preferred_time.start_time();

    let days = (0..horizon)
        .map(|offset| {
            let mut remaining = request.hours_per_day;
            let mut tasks = Vec::new();

            for (_, subject) in &ranked {
                if remaining == 0 {
                    break;
                }
                let hours = subject_hours(
                    subject.difficulty.weight(),
                    total_weight,
                    ranked.len(),
                    request.hours_per_day,
                )
                .min(remaining);

                if hours > 0 {
                    tasks.push(StudyTask {
                        subject: subject.name.clone(),
                        topic: format!("Review session {}", offset + 1),
                        duration_hours: hours,
                        start_time,
                    });
                    remaining -= hours;
                }
            }

            DaySchedule {
                date: planning_date + Duration::days(offset),
                tasks,
            }
        })
        .collect();

    let recommendations = ranked
        .iter()
        .filter(|(_, s)| s.difficulty == Difficulty::Hard)
        .map(|(_, s)| format!("Focus more on {} due to higher difficulty", s.name))
        .chain(GENERAL_RECOMMENDATIONS.iter().map(|line| line.to_string()))
        .collect();

    Ok(ScheduleResult {
        days,
        recommendations,
    })
}

/// Hours one subject receives per day before the remaining-budget cap.
fn subject_hours(weight: u32, total_weight: u32, subject_count: usize, hours_per_day: u32) -> u32 {
    if total_weight == 0 {
        let count = u32::try_from(subject_count).unwrap_or(u32::MAX).max(1);
        return round_half_up(hours_per_day, count);
    }
    round_half_up(weight * hours_per_day, total_weight)
}

/// `round(numerator / denominator)` with halves rounded up, in integers.
///
/// `denominator` must be non-zero.
pub fn round_half_up(numerator: u32, denominator: u32) -> u32 {
    let numerator = u64::from(numerator);
    let denominator = u64::from(denominator);
    let rounded = (2 * numerator + denominator) / (2 * denominator);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 3, 1)
    }

    fn subject(name: &str, difficulty: Difficulty, days_out: i64) -> StudySubject {
        StudySubject::new(name, difficulty, today() + Duration::days(days_out))
    }

    fn request(subjects: Vec<StudySubject>, hours: u32, time: PreferredTime) -> ScheduleRequest {
        ScheduleRequest {
            subjects,
            hours_per_day: hours,
            preferred_time: time,
        }
    }

    #[test]
    fn math_and_art_scenario() {
        let req = request(
            vec![
                subject("Math", Difficulty::Hard, 5),
                subject("Art", Difficulty::Easy, 20),
            ],
            6,
            PreferredTime::Morning,
        );

        let result = plan(&req, today()).unwrap();

        assert_eq!(result.days.len(), 5);
        let first = &result.days[0];
        assert_eq!(first.date, today());
        assert_eq!(first.tasks.len(), 2);
        assert_eq!(first.tasks[0].subject, "Math");
        assert_eq!(first.tasks[0].duration_hours, 5);
        assert_eq!(first.tasks[1].subject, "Art");
        assert_eq!(first.tasks[1].duration_hours, 1);
        for day in &result.days {
            for task in &day.tasks {
                assert_eq!(task.start_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
            }
        }
    }

    #[test]
    fn topics_use_one_based_day_index() {
        let req = request(vec![subject("Physics", Difficulty::Medium, 3)], 2, PreferredTime::Evening);
        let result = plan(&req, today()).unwrap();
        let topics: Vec<_> = result.days.iter().map(|d| d.tasks[0].topic.as_str()).collect();
        assert_eq!(topics, ["Review session 1", "Review session 2", "Review session 3"]);
    }

    #[test]
    fn horizon_capped_at_fourteen_days() {
        let req = request(vec![subject("History", Difficulty::Easy, 60)], 3, PreferredTime::Night);
        let result = plan(&req, today()).unwrap();
        assert_eq!(result.days.len(), 14);
        assert_eq!(result.days[13].date, today() + Duration::days(13));
    }

    #[test]
    fn exam_today_clamps_to_one_day() {
        let req = request(vec![subject("Chemistry", Difficulty::Hard, 0)], 4, PreferredTime::Afternoon);
        let result = plan(&req, today()).unwrap();
        assert_eq!(result.days.len(), 1);
        assert_eq!(result.days[0].tasks[0].duration_hours, 4);
    }

    #[test]
    fn exam_in_past_is_rejected() {
        let req = request(vec![subject("Latin", Difficulty::Easy, -1)], 4, PreferredTime::Morning);
        let err = plan(&req, today()).unwrap_err();
        assert!(matches!(err, ValidationError::ExamDateInPast { index: 0, .. }));
    }

    #[test]
    fn empty_subjects_rejected() {
        let req = request(Vec::new(), 4, PreferredTime::Morning);
        assert_eq!(plan(&req, today()).unwrap_err(), ValidationError::NoSubjects);
    }

    #[test]
    fn hours_out_of_range_rejected() {
        for hours in [0, 13] {
            let req = request(vec![subject("Math", Difficulty::Hard, 5)], hours, PreferredTime::Morning);
            assert_eq!(
                plan(&req, today()).unwrap_err(),
                ValidationError::HoursPerDayOutOfRange { value: i64::from(hours) }
            );
        }
    }

    #[test]
    fn blank_name_rejected() {
        let req = request(vec![subject("  ", Difficulty::Hard, 5)], 4, PreferredTime::Morning);
        assert_eq!(
            plan(&req, today()).unwrap_err(),
            ValidationError::EmptySubjectName { index: 0 }
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let req = request(
            vec![
                subject("Zoology", Difficulty::Medium, 4),
                subject("Algebra", Difficulty::Medium, 4),
                subject("Botany", Difficulty::Medium, 2),
            ],
            6,
            PreferredTime::Morning,
        );
        let result = plan(&req, today()).unwrap();
        let order: Vec<_> = result.days[0].tasks.iter().map(|t| t.subject.as_str()).collect();
        assert_eq!(order, ["Botany", "Zoology", "Algebra"]);
    }

    #[test]
    fn budget_exhaustion_starves_later_subjects() {
        // 0.5 rounds up to 1, so the earlier exam takes the whole hour
        let req = request(
            vec![
                subject("Math", Difficulty::Hard, 3),
                subject("Physics", Difficulty::Hard, 5),
            ],
            1,
            PreferredTime::Morning,
        );
        let result = plan(&req, today()).unwrap();
        for day in &result.days {
            assert_eq!(day.tasks.len(), 1);
            assert_eq!(day.tasks[0].subject, "Math");
        }
    }

    #[test]
    fn recommendations_list_hard_subjects_in_ranked_order() {
        let req = request(
            vec![
                subject("Statistics", Difficulty::Hard, 9),
                subject("Drawing", Difficulty::Easy, 1),
                subject("Calculus", Difficulty::Hard, 2),
            ],
            8,
            PreferredTime::Evening,
        );
        let result = plan(&req, today()).unwrap();
        assert_eq!(
            result.recommendations,
            vec![
                "Focus more on Calculus due to higher difficulty".to_string(),
                "Focus more on Statistics due to higher difficulty".to_string(),
                GENERAL_RECOMMENDATIONS[0].to_string(),
                GENERAL_RECOMMENDATIONS[1].to_string(),
            ]
        );
    }

    #[test]
    fn round_half_up_rounds_halves_away_from_zero() {
        assert_eq!(round_half_up(1, 2), 1);
        assert_eq!(round_half_up(5, 2), 3);
        assert_eq!(round_half_up(18, 4), 5);
        assert_eq!(round_half_up(6, 4), 2);
        assert_eq!(round_half_up(1, 3), 0);
    }

    #[test]
    fn zero_total_weight_splits_evenly() {
        assert_eq!(subject_hours(0, 0, 3, 6), 2);
        assert_eq!(subject_hours(0, 0, 4, 6), 2);
    }

    #[test]
    fn start_times_match_preferred_time() {
        let expected = [
            (PreferredTime::Morning, 8),
            (PreferredTime::Afternoon, 14),
            (PreferredTime::Evening, 18),
            (PreferredTime::Night, 20),
        ];
        for (time, hour) in expected {
            assert_eq!(time.start_time(), NaiveTime::from_hms_opt(hour, 0, 0).unwrap());
        }
    }

    #[test]
    fn result_serializes_to_boundary_shape() {
        let req = request(vec![subject("Math", Difficulty::Hard, 1)], 2, PreferredTime::Night);
        let result = plan(&req, today()).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["schedule"][0]["date"], "2025-03-01");
        let task = &json["schedule"][0]["tasks"][0];
        assert_eq!(task["subject"], "Math");
        assert_eq!(task["topic"], "Review session 1");
        assert_eq!(task["duration"], 2);
        assert_eq!(task["startTime"], "20:00");
        assert_eq!(json["recommendations"].as_array().unwrap().len(), 3);

        let back: ScheduleResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
        assert_eq!("Night".parse::<PreferredTime>().unwrap(), PreferredTime::Night);
    }
}
