//! SQLite-based storage for study data.
//!
//! Provides persistent storage for:
//! - Users and their upcoming exams
//! - Generated study plans (one active per user)
//! - Performance records and derived weak topics

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::data_dir;
use super::migrations;
use crate::error::{DatabaseError, Result};
use crate::planner::{Difficulty, PreferredTime, ScheduleResult};
use crate::records::{Exam, PerformanceRecord, StudyPlan, User, WeakTopic};

// === Helper Functions ===

/// Read a TEXT column and parse it, reporting failures as conversion errors.
fn parse_column<T, E>(
    row: &Row,
    idx: usize,
    parse: impl FnOnce(&str) -> std::result::Result<T, E>,
) -> rusqlite::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    parse(&raw).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_datetime(raw: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, chrono::ParseError> {
    raw.parse::<NaiveDate>()
}

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        created_at: parse_column(row, 3, parse_datetime)?,
    })
}

fn row_to_exam(row: &Row) -> rusqlite::Result<Exam> {
    Ok(Exam {
        id: row.get(0)?,
        user_id: row.get(1)?,
        subject: row.get(2)?,
        difficulty: parse_column(row, 3, str::parse::<Difficulty>)?,
        exam_date: parse_column(row, 4, parse_date)?,
        created_at: parse_column(row, 5, parse_datetime)?,
    })
}

fn row_to_study_plan(row: &Row) -> rusqlite::Result<StudyPlan> {
    Ok(StudyPlan {
        id: row.get(0)?,
        user_id: row.get(1)?,
        hours_per_day: row.get(2)?,
        preferred_time: parse_column(row, 3, str::parse::<PreferredTime>)?,
        start_date: parse_column(row, 4, parse_date)?,
        end_date: parse_column(row, 5, parse_date)?,
        schedule: parse_column(row, 6, |raw| serde_json::from_str::<ScheduleResult>(raw))?,
        is_active: row.get(7)?,
        created_at: parse_column(row, 8, parse_datetime)?,
    })
}

fn row_to_performance(row: &Row) -> rusqlite::Result<PerformanceRecord> {
    Ok(PerformanceRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        subject: row.get(2)?,
        topic: row.get(3)?,
        score: row.get(4)?,
        max_score: row.get(5)?,
        time_spent_minutes: row.get(6)?,
        recorded_at: parse_column(row, 7, parse_datetime)?,
    })
}

fn row_to_weak_topic(row: &Row) -> rusqlite::Result<WeakTopic> {
    Ok(WeakTopic {
        user_id: row.get(0)?,
        subject: row.get(1)?,
        topic: row.get(2)?,
        accuracy: row.get(3)?,
        attempts: row.get(4)?,
        updated_at: parse_column(row, 5, parse_datetime)?,
    })
}

const STUDY_PLAN_COLUMNS: &str = "id, user_id, hours_per_day, preferred_time, start_date, end_date,
     schedule_json, is_active, created_at";

/// SQLite database for study data.
pub struct StudyDb {
    conn: Connection,
}

impl StudyDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/studyroom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("studyroom.db"))
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Users ===

    pub fn create_user(&self, user: &User) -> Result<()> {
        self.conn.execute(
            "INSERT INTO users (id, name, email, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user.id, user.name, user.email, user.created_at.to_rfc3339()],
        )?;
        tracing::debug!(user_id = %user.id, "user created");
        Ok(())
    }

    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email, created_at FROM users WHERE id = ?1",
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email, created_at FROM users ORDER BY created_at ASC, name ASC")?;
        let users = stmt.query_map([], row_to_user)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    // === Exams ===

    pub fn create_exam(&self, exam: &Exam) -> Result<()> {
        self.conn.execute(
            "INSERT INTO exams (id, user_id, subject, difficulty, exam_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                exam.id,
                exam.user_id,
                exam.subject,
                exam.difficulty.as_str(),
                exam.exam_date.to_string(),
                exam.created_at.to_rfc3339(),
            ],
        )?;
        tracing::debug!(exam_id = %exam.id, subject = %exam.subject, "exam created");
        Ok(())
    }

    pub fn get_exam(&self, id: &str) -> Result<Option<Exam>> {
        let exam = self
            .conn
            .query_row(
                "SELECT id, user_id, subject, difficulty, exam_date, created_at FROM exams WHERE id = ?1",
                params![id],
                row_to_exam,
            )
            .optional()?;
        Ok(exam)
    }

    /// All exams of a user, nearest first.
    pub fn list_exams(&self, user_id: &str) -> Result<Vec<Exam>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, subject, difficulty, exam_date, created_at
             FROM exams
             WHERE user_id = ?1
             ORDER BY exam_date ASC, created_at ASC",
        )?;
        let exams = stmt
            .query_map(params![user_id], row_to_exam)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(exams)
    }

    /// Returns `true` if a row was deleted.
    pub fn delete_exam(&self, id: &str) -> Result<bool> {
        let deleted = self.conn.execute("DELETE FROM exams WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // === Study plans ===

    pub fn insert_study_plan(&self, plan: &StudyPlan) -> Result<()> {
        self.conn.execute(
            "INSERT INTO study_plans (id, user_id, hours_per_day, preferred_time, start_date, end_date,
                                      schedule_json, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                plan.id,
                plan.user_id,
                plan.hours_per_day,
                plan.preferred_time.as_str(),
                plan.start_date.to_string(),
                plan.end_date.to_string(),
                serde_json::to_string(&plan.schedule)?,
                plan.is_active,
                plan.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Mark every active plan of `user_id` inactive. Returns the number changed.
    pub fn deactivate_study_plans(&self, user_id: &str) -> Result<usize> {
        let changed = self.conn.execute(
            "UPDATE study_plans SET is_active = 0 WHERE user_id = ?1 AND is_active = 1",
            params![user_id],
        )?;
        Ok(changed)
    }

    /// Deactivate the user's current plans and store `plan` in one transaction.
    ///
    /// Returns the number of plans that were deactivated.
    pub fn replace_active_study_plan(&self, plan: &StudyPlan) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let deactivated = self.deactivate_study_plans(&plan.user_id)?;
        self.insert_study_plan(plan)?;
        tx.commit()?;
        tracing::debug!(plan_id = %plan.id, deactivated, "study plan stored");
        Ok(deactivated)
    }

    pub fn get_study_plan(&self, id: &str) -> Result<Option<StudyPlan>> {
        let plan = self
            .conn
            .query_row(
                &format!("SELECT {STUDY_PLAN_COLUMNS} FROM study_plans WHERE id = ?1"),
                params![id],
                row_to_study_plan,
            )
            .optional()?;
        Ok(plan)
    }

    pub fn active_study_plan(&self, user_id: &str) -> Result<Option<StudyPlan>> {
        let plan = self
            .conn
            .query_row(
                &format!(
                    "SELECT {STUDY_PLAN_COLUMNS} FROM study_plans
                     WHERE user_id = ?1 AND is_active = 1
                     ORDER BY created_at DESC
                     LIMIT 1"
                ),
                params![user_id],
                row_to_study_plan,
            )
            .optional()?;
        Ok(plan)
    }

    /// All plans of a user, newest first.
    pub fn list_study_plans(&self, user_id: &str) -> Result<Vec<StudyPlan>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STUDY_PLAN_COLUMNS} FROM study_plans
             WHERE user_id = ?1
             ORDER BY created_at DESC"
        ))?;
        let plans = stmt
            .query_map(params![user_id], row_to_study_plan)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(plans)
    }

    // === Performance ===

    pub fn insert_performance(&self, record: &PerformanceRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO performance_records (id, user_id, subject, topic, score, max_score,
                                              time_spent_minutes, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.user_id,
                record.subject,
                record.topic,
                record.score,
                record.max_score,
                record.time_spent_minutes,
                record.recorded_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Records of a user, oldest first, optionally limited to one subject.
    pub fn list_performance(&self, user_id: &str, subject: Option<&str>) -> Result<Vec<PerformanceRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, subject, topic, score, max_score, time_spent_minutes, recorded_at
             FROM performance_records
             WHERE user_id = ?1 AND (?2 IS NULL OR subject = ?2)
             ORDER BY recorded_at ASC",
        )?;
        let records = stmt
            .query_map(params![user_id, subject], row_to_performance)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Attempt count and mean percentage for one topic.
    pub fn topic_accuracy(&self, user_id: &str, subject: &str, topic: &str) -> Result<(u32, f64)> {
        let (attempts, accuracy): (u32, Option<f64>) = self.conn.query_row(
            "SELECT COUNT(*), AVG(score * 100.0 / max_score)
             FROM performance_records
             WHERE user_id = ?1 AND subject = ?2 AND topic = ?3",
            params![user_id, subject, topic],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok((attempts, accuracy.unwrap_or(0.0)))
    }

    // === Weak topics ===

    pub fn upsert_weak_topic(&self, topic: &WeakTopic) -> Result<()> {
        self.conn.execute(
            "INSERT INTO weak_topics (user_id, subject, topic, accuracy, attempts, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id, subject, topic) DO UPDATE SET
                 accuracy = excluded.accuracy,
                 attempts = excluded.attempts,
                 updated_at = excluded.updated_at",
            params![
                topic.user_id,
                topic.subject,
                topic.topic,
                topic.accuracy,
                topic.attempts,
                topic.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Returns `true` if the topic was flagged before.
    pub fn remove_weak_topic(&self, user_id: &str, subject: &str, topic: &str) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM weak_topics WHERE user_id = ?1 AND subject = ?2 AND topic = ?3",
            params![user_id, subject, topic],
        )?;
        Ok(deleted > 0)
    }

    /// Weak topics of a user, weakest first.
    pub fn list_weak_topics(&self, user_id: &str) -> Result<Vec<WeakTopic>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, subject, topic, accuracy, attempts, updated_at
             FROM weak_topics
             WHERE user_id = ?1
             ORDER BY accuracy ASC, subject ASC, topic ASC",
        )?;
        let topics = stmt
            .query_map(params![user_id], row_to_weak_topic)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(topics)
    }
}
