//! Performance tracking and weak-topic detection.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result, ValidationError};
use crate::records::{PerformanceRecord, SubjectSummary, WeakTopic};
use crate::storage::{PerformanceConfig, StudyDb};

/// A graded attempt as submitted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceInput {
    pub subject: String,
    pub topic: String,
    pub score: f64,
    pub max_score: f64,
    #[serde(default)]
    pub time_spent_minutes: Option<u32>,
}

impl PerformanceInput {
    fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |field: &str, message: &str| ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.to_string(),
        };

        if self.subject.trim().is_empty() {
            return Err(invalid("subject", "must not be empty"));
        }
        if self.topic.trim().is_empty() {
            return Err(invalid("topic", "must not be empty"));
        }
        if !self.max_score.is_finite() || self.max_score <= 0.0 {
            return Err(invalid("maxScore", "must be greater than zero"));
        }
        if !self.score.is_finite() || self.score < 0.0 || self.score > self.max_score {
            return Err(invalid("score", "must be between 0 and maxScore"));
        }
        Ok(())
    }
}

/// Outcome of recording one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedPerformance {
    pub record: PerformanceRecord,
    pub topic_accuracy: f64,
    pub is_weak: bool,
}

/// Store an attempt and refresh the topic's weak-topic flag in one transaction.
///
/// A topic is weak when its mean percentage is below
/// `config.weak_topic_threshold` after at least `config.min_attempts` attempts.
pub fn record_performance(
    db: &StudyDb,
    config: &PerformanceConfig,
    user_id: &str,
    input: &PerformanceInput,
) -> Result<RecordedPerformance> {
    input.validate()?;
    if db.get_user(user_id)?.is_none() {
        return Err(CoreError::NotFound {
            entity: "user",
            id: user_id.to_string(),
        });
    }

    let record = PerformanceRecord {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        subject: input.subject.trim().to_string(),
        topic: input.topic.trim().to_string(),
        score: input.score,
        max_score: input.max_score,
        time_spent_minutes: input.time_spent_minutes,
        recorded_at: Utc::now(),
    };
    let tx = db.conn().unchecked_transaction()?;
    db.insert_performance(&record)?;

    let (attempts, accuracy) = db.topic_accuracy(user_id, &record.subject, &record.topic)?;
    let is_weak = attempts >= config.min_attempts && accuracy < config.weak_topic_threshold;

    let cleared = if is_weak {
        db.upsert_weak_topic(&WeakTopic {
            user_id: user_id.to_string(),
            subject: record.subject.clone(),
            topic: record.topic.clone(),
            accuracy,
            attempts,
            updated_at: record.recorded_at,
        })?;
        false
    } else {
        db.remove_weak_topic(user_id, &record.subject, &record.topic)?
    };
    tx.commit()?;

    if is_weak {
        tracing::info!(user_id, subject = %record.subject, topic = %record.topic, accuracy, "topic flagged as weak");
    } else if cleared {
        tracing::info!(user_id, subject = %record.subject, topic = %record.topic, accuracy, "weak topic cleared");
    }

    Ok(RecordedPerformance {
        record,
        topic_accuracy: accuracy,
        is_weak,
    })
}

/// Per-subject attempt counts and mean percentages, sorted by subject.
pub fn performance_summary(db: &StudyDb, user_id: &str) -> Result<Vec<SubjectSummary>> {
    let records = db.list_performance(user_id, None)?;
    Ok(summarize(&records))
}

fn summarize(records: &[PerformanceRecord]) -> Vec<SubjectSummary> {
    let mut by_subject: BTreeMap<&str, (u32, f64)> = BTreeMap::new();
    for record in records {
        let entry = by_subject.entry(record.subject.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += record.percentage();
    }

    by_subject
        .into_iter()
        .map(|(subject, (attempts, total))| SubjectSummary {
            subject: subject.to_string(),
            attempts,
            average_percentage: total / f64::from(attempts),
        })
        .collect()
}
