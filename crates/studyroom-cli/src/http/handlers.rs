//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! core services for business logic.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use studyroom_core::service::{self, GeneratedPlan, PerformanceInput, RecordedPerformance};
use studyroom_core::{
    CoreError, Difficulty, Exam, PerformanceRecord, ScheduleRequestPayload, StudyPlan, SubjectSummary, User,
    ValidationError, WeakTopic,
};

use super::error::AppError;
use super::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExamRequest {
    pub subject: String,
    pub difficulty: Difficulty,
    pub exam_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct PlanningQuery {
    /// Overrides the planning date (defaults to today).
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SubjectQuery {
    pub subject: Option<String>,
}

fn require_user(db: &studyroom_core::StudyDb, user_id: &str) -> Result<(), CoreError> {
    match db.get_user(user_id)? {
        Some(_) => Ok(()),
        None => Err(CoreError::NotFound {
            entity: "user",
            id: user_id.to_string(),
        }),
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: "v1",
    })
}

// =============================================================================
// Users
// =============================================================================

/// POST /v1/users
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let Json(request) = body?;
    if request.name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name".into(),
            message: "must not be empty".into(),
        }
        .into());
    }
    let user = User::new(request.name.trim(), request.email);
    let stored = user.clone();
    state.with_db(move |db| db.create_user(&stored)).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /v1/users
pub async fn list_users(State(state): State<AppState>) -> HandlerResult<Vec<User>> {
    state.with_db(|db| db.list_users()).await.map(Json)
}

// =============================================================================
// Exams
// =============================================================================

/// POST /v1/users/{user_id}/exams
pub async fn create_exam(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Result<Json<CreateExamRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Exam>), AppError> {
    let Json(request) = body?;
    if request.subject.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "subject".into(),
            message: "must not be empty".into(),
        }
        .into());
    }
    let exam = Exam::new(user_id, request.subject.trim(), request.difficulty, request.exam_date);
    let stored = exam.clone();
    state
        .with_db(move |db| {
            require_user(db, &stored.user_id)?;
            db.create_exam(&stored)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(exam)))
}

/// GET /v1/users/{user_id}/exams
pub async fn list_exams(State(state): State<AppState>, Path(user_id): Path<String>) -> HandlerResult<Vec<Exam>> {
    state
        .with_db(move |db| {
            require_user(db, &user_id)?;
            db.list_exams(&user_id)
        })
        .await
        .map(Json)
}

/// DELETE /v1/exams/{exam_id}
pub async fn delete_exam(State(state): State<AppState>, Path(exam_id): Path<String>) -> Result<StatusCode, AppError> {
    let id = exam_id.clone();
    let deleted = state.with_db(move |db| db.delete_exam(&id)).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("exam not found: {exam_id}")))
    }
}

// =============================================================================
// Study plans
// =============================================================================

/// POST /v1/users/{user_id}/study-plans
///
/// Body: `{ subjects, availableHoursPerDay, preferredStudyTime }`.
pub async fn generate_study_plan(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: Result<Query<PlanningQuery>, QueryRejection>,
    body: Result<Json<ScheduleRequestPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<GeneratedPlan>), AppError> {
    let Query(query) = query?;
    let Json(payload) = body?;
    let planning_date = query.date.unwrap_or_else(|| Local::now().date_naive());
    let generated = state
        .with_db(move |db| service::generate_study_plan(db, &user_id, &payload, planning_date))
        .await?;
    Ok((StatusCode::CREATED, Json(generated)))
}

/// GET /v1/users/{user_id}/study-plans
pub async fn list_study_plans(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<Vec<StudyPlan>> {
    state
        .with_db(move |db| {
            require_user(db, &user_id)?;
            db.list_study_plans(&user_id)
        })
        .await
        .map(Json)
}

/// GET /v1/users/{user_id}/study-plans/active
pub async fn active_study_plan(State(state): State<AppState>, Path(user_id): Path<String>) -> HandlerResult<StudyPlan> {
    let id = user_id.clone();
    state
        .with_db(move |db| {
            require_user(db, &id)?;
            db.active_study_plan(&id)
        })
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no active study plan for user {user_id}")))
}

/// GET /v1/study-plans/{plan_id}
pub async fn get_study_plan(State(state): State<AppState>, Path(plan_id): Path<String>) -> HandlerResult<StudyPlan> {
    let id = plan_id.clone();
    state
        .with_db(move |db| db.get_study_plan(&id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("study plan not found: {plan_id}")))
}

// =============================================================================
// Performance
// =============================================================================

/// POST /v1/users/{user_id}/performance
pub async fn record_performance(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Result<Json<PerformanceInput>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordedPerformance>), AppError> {
    let Json(input) = body?;
    let config = state.config.performance.clone();
    let recorded = state
        .with_db(move |db| service::record_performance(db, &config, &user_id, &input))
        .await?;
    Ok((StatusCode::CREATED, Json(recorded)))
}

/// GET /v1/users/{user_id}/performance
pub async fn list_performance(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: Result<Query<SubjectQuery>, QueryRejection>,
) -> HandlerResult<Vec<PerformanceRecord>> {
    let Query(query) = query?;
    state
        .with_db(move |db| {
            require_user(db, &user_id)?;
            db.list_performance(&user_id, query.subject.as_deref())
        })
        .await
        .map(Json)
}

/// GET /v1/users/{user_id}/performance/summary
pub async fn performance_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<Vec<SubjectSummary>> {
    state
        .with_db(move |db| {
            require_user(db, &user_id)?;
            service::performance_summary(db, &user_id)
        })
        .await
        .map(Json)
}

/// GET /v1/users/{user_id}/weak-topics
pub async fn list_weak_topics(State(state): State<AppState>, Path(user_id): Path<String>) -> HandlerResult<Vec<WeakTopic>> {
    state
        .with_db(move |db| {
            require_user(db, &user_id)?;
            db.list_weak_topics(&user_id)
        })
        .await
        .map(Json)
}
