//! # Studyroom Core Library
//!
//! Business logic for the Studyroom study assistant. The CLI and the REST
//! backend are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Planner**: pure, deterministic day-by-day study schedule generator
//! - **Storage**: SQLite persistence for users, exams, plans and performance,
//!   plus TOML-based configuration
//! - **Service**: plan generation and performance tracking on top of storage
//!
//! ## Key Components
//!
//! - [`plan`]: the schedule generator
//! - [`StudyDb`]: study data persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod planner;
pub mod records;
pub mod service;
pub mod storage;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use planner::{
    plan, DaySchedule, Difficulty, PreferredTime, ScheduleRequest, ScheduleRequestPayload, ScheduleResult,
    StudySubject, StudyTask, SubjectPayload,
};
pub use records::{Exam, PerformanceRecord, StudyPlan, SubjectSummary, User, WeakTopic};
pub use storage::{Config, StudyDb};
