//! Persisted study records.
//!
//! Plain data types stored by [`crate::storage::StudyDb`] and returned by the
//! services and HTTP layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::planner::{Difficulty, PreferredTime, ScheduleResult, StudySubject};

/// A student account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email,
            created_at: Utc::now(),
        }
    }
}

/// An upcoming exam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub difficulty: Difficulty,
    pub exam_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Exam {
    pub fn new(
        user_id: impl Into<String>,
        subject: impl Into<String>,
        difficulty: Difficulty,
        exam_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            subject: subject.into(),
            difficulty,
            exam_date,
            created_at: Utc::now(),
        }
    }

    pub fn to_subject(&self) -> StudySubject {
        StudySubject::new(self.subject.clone(), self.difficulty, self.exam_date)
    }
}

/// A generated and stored schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub id: String,
    pub user_id: String,
    pub hours_per_day: u32,
    pub preferred_time: PreferredTime,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub schedule: ScheduleResult,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// One graded attempt at a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub topic: String,
    pub score: f64,
    pub max_score: f64,
    pub time_spent_minutes: Option<u32>,
    pub recorded_at: DateTime<Utc>,
}

impl PerformanceRecord {
    pub fn percentage(&self) -> f64 {
        if self.max_score <= 0.0 {
            0.0
        } else {
            self.score / self.max_score * 100.0
        }
    }
}

/// A topic whose accuracy fell below the configured threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakTopic {
    pub user_id: String,
    pub subject: String,
    pub topic: String,
    pub accuracy: f64,
    pub attempts: u32,
    pub updated_at: DateTime<Utc>,
}

/// Per-subject aggregate over performance records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub subject: String,
    pub attempts: u32,
    pub average_percentage: f64,
}
