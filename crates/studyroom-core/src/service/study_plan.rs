//! Study-plan generation and persistence.
//!
//! Wraps [`crate::planner::plan`] with everything the planner leaves to its
//! caller: resolving the user, storing the result as the user's single active
//! plan, and deriving the plan's date range.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::planner::{self, PreferredTime, ScheduleRequest, ScheduleRequestPayload, ScheduleResult, StudySubject};
use crate::records::{Exam, StudyPlan};
use crate::storage::StudyDb;

/// Response of a successful generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub id: String,
    #[serde(flatten)]
    pub result: ScheduleResult,
}

/// Generate a plan from a boundary payload and store it as the active plan.
///
/// # Errors
/// - [`CoreError::NotFound`] if `user_id` does not exist
/// - [`CoreError::Validation`] for anything the planner rejects
pub fn generate_study_plan(
    db: &StudyDb,
    user_id: &str,
    payload: &ScheduleRequestPayload,
    planning_date: NaiveDate,
) -> Result<GeneratedPlan> {
    let request = payload.resolve()?;
    generate_from_request(db, user_id, &request, planning_date)
}

/// Generate and store a plan from an already-resolved request.
pub fn generate_from_request(
    db: &StudyDb,
    user_id: &str,
    request: &ScheduleRequest,
    planning_date: NaiveDate,
) -> Result<GeneratedPlan> {
    if db.get_user(user_id)?.is_none() {
        return Err(CoreError::NotFound {
            entity: "user",
            id: user_id.to_string(),
        });
    }

    let result = planner::plan(request, planning_date)?;
    let end_date = request.latest_exam_date().unwrap_or(planning_date);

    let plan = StudyPlan {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        hours_per_day: request.hours_per_day,
        preferred_time: request.preferred_time,
        start_date: planning_date,
        end_date,
        schedule: result.clone(),
        is_active: true,
        created_at: Utc::now(),
    };
    let deactivated = db.replace_active_study_plan(&plan)?;

    tracing::info!(
        user_id,
        plan_id = %plan.id,
        days = result.days.len(),
        deactivated,
        "study plan generated"
    );

    Ok(GeneratedPlan { id: plan.id, result })
}

/// Planner subjects for every exam on or after `planning_date`.
pub fn subjects_from_exams(exams: &[Exam], planning_date: NaiveDate) -> Vec<StudySubject> {
    exams
        .iter()
        .filter(|exam| exam.exam_date >= planning_date)
        .map(Exam::to_subject)
        .collect()
}

/// Build a request from the user's stored exams.
pub fn request_from_exams(
    db: &StudyDb,
    user_id: &str,
    hours_per_day: u32,
    preferred_time: PreferredTime,
    planning_date: NaiveDate,
) -> Result<ScheduleRequest> {
    let exams = db.list_exams(user_id)?;
    Ok(ScheduleRequest {
        subjects: subjects_from_exams(&exams, planning_date),
        hours_per_day,
        preferred_time,
    })
}
