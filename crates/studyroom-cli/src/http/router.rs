//! Router configuration for the HTTP API.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::state::AppState;

/// Create the application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let api_v1 = Router::new()
        .route("/users", post(handlers::create_user).get(handlers::list_users))
        .route(
            "/users/{user_id}/exams",
            post(handlers::create_exam).get(handlers::list_exams),
        )
        .route("/exams/{exam_id}", delete(handlers::delete_exam))
        .route(
            "/users/{user_id}/study-plans",
            post(handlers::generate_study_plan).get(handlers::list_study_plans),
        )
        .route("/users/{user_id}/study-plans/active", get(handlers::active_study_plan))
        .route("/study-plans/{plan_id}", get(handlers::get_study_plan))
        .route(
            "/users/{user_id}/performance",
            post(handlers::record_performance).get(handlers::list_performance),
        )
        .route("/users/{user_id}/performance/summary", get(handlers::performance_summary))
        .route("/users/{user_id}/weak-topics", get(handlers::list_weak_topics));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use studyroom_core::{Config, StudyDb};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::new(StudyDb::open_memory().unwrap(), Config::default()))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_user(app: &Router) -> String {
        let (status, user) = send(app, "POST", "/v1/users", Some(json!({"name": "Ada"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        user["id"].as_str().unwrap().to_string()
    }

    fn math_and_art(hours: i64) -> Value {
        json!({
            "subjects": [
                {"name": "Math", "difficulty": "hard", "examDate": "2025-03-06"},
                {"name": "Art", "difficulty": "easy", "examDate": "2025-03-21"}
            ],
            "availableHoursPerDay": hours,
            "preferredStudyTime": "morning"
        })
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn generate_and_fetch_active_plan() {
        let app = app();
        let user_id = create_user(&app).await;

        let (status, plan) = send(
            &app,
            "POST",
            &format!("/v1/users/{user_id}/study-plans?date=2025-03-01"),
            Some(math_and_art(6)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(plan["schedule"].as_array().unwrap().len(), 5);
        assert_eq!(plan["schedule"][0]["tasks"][0]["subject"], "Math");
        assert_eq!(plan["schedule"][0]["tasks"][0]["duration"], 5);
        assert_eq!(plan["schedule"][0]["tasks"][1]["duration"], 1);
        assert_eq!(plan["schedule"][0]["tasks"][1]["startTime"], "08:00");

        let (status, active) = send(&app, "GET", &format!("/v1/users/{user_id}/study-plans/active"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(active["id"], plan["id"]);
        assert_eq!(active["end_date"], "2025-03-21");
        assert_eq!(active["is_active"], true);
    }

    #[tokio::test]
    async fn validation_errors_name_the_field() {
        let app = app();
        let user_id = create_user(&app).await;
        let uri = format!("/v1/users/{user_id}/study-plans?date=2025-03-01");

        let (status, body) = send(&app, "POST", &uri, Some(math_and_art(13))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field"], "availableHoursPerDay");

        let empty = json!({"subjects": [], "availableHoursPerDay": 4, "preferredStudyTime": "night"});
        let (status, body) = send(&app, "POST", &uri, Some(empty)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "subjects");

        let undated = json!({
            "subjects": [{"name": "Biology", "difficulty": "medium"}],
            "availableHoursPerDay": 4,
            "preferredStudyTime": "night"
        });
        let (status, body) = send(&app, "POST", &uri, Some(undated)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "subjects[0].examDate");
        assert_eq!(body["message"], "please select an exam date for 'Biology'");
    }

    #[tokio::test]
    async fn unknown_user_is_404() {
        let (status, body) = send(
            &app(),
            "POST",
            "/v1/users/nobody/study-plans?date=2025-03-01",
            Some(math_and_art(6)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn undecodable_body_reports_json_error_with_field() {
        let app = app();
        let user_id = create_user(&app).await;
        let uri = format!("/v1/users/{user_id}/study-plans?date=2025-03-01");

        let mut dawn = math_and_art(6);
        dawn["preferredStudyTime"] = json!("dawn");
        let (status, body) = send(&app, "POST", &uri, Some(dawn)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field"], "preferredStudyTime");
        assert!(body["message"].as_str().unwrap().contains("dawn"));

        let mut brutal = math_and_art(6);
        brutal["subjects"][0]["difficulty"] = json!("brutal");
        let (status, body) = send(&app, "POST", &uri, Some(brutal)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["field"].as_str().unwrap().ends_with("difficulty"));

        let mut fractional = math_and_art(6);
        fractional["availableHoursPerDay"] = json!(2.5);
        let (status, body) = send(&app, "POST", &uri, Some(fractional)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "availableHoursPerDay");
    }

    #[tokio::test]
    async fn bad_planning_date_is_a_json_validation_error() {
        let app = app();
        let user_id = create_user(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/v1/users/{user_id}/study-plans?date=someday"),
            Some(math_and_art(6)),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let app = app();
        let request = Request::builder()
            .method("POST")
            .uri("/v1/users")
            .header("content-type", "application/json")
            .body(Body::from("{\"name\": "))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn listing_for_unknown_user_is_404() {
        let app = app();
        for uri in [
            "/v1/users/nobody/exams",
            "/v1/users/nobody/study-plans",
            "/v1/users/nobody/performance",
            "/v1/users/nobody/performance/summary",
            "/v1/users/nobody/weak-topics",
        ] {
            let (status, body) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["code"], "NOT_FOUND");
        }

        let user_id = create_user(&app).await;
        let (status, exams) = send(&app, "GET", &format!("/v1/users/{user_id}/exams"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(exams, json!([]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_requests_share_the_database() {
        let app = app();
        let user_id = create_user(&app).await;

        let requests = (0..8).map(|i| {
            let app = app.clone();
            let uri = format!("/v1/users/{user_id}/performance");
            tokio::spawn(async move {
                send(
                    &app,
                    "POST",
                    &uri,
                    Some(json!({"subject": "Math", "topic": format!("Topic {i}"), "score": 9, "maxScore": 10})),
                )
                .await
                .0
            })
        });
        for handle in requests.collect::<Vec<_>>() {
            assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
        }

        let (_, records) = send(&app, "GET", &format!("/v1/users/{user_id}/performance"), None).await;
        assert_eq!(records.as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn exam_lifecycle() {
        let app = app();
        let user_id = create_user(&app).await;
        let uri = format!("/v1/users/{user_id}/exams");

        let (status, exam) = send(
            &app,
            "POST",
            &uri,
            Some(json!({"subject": "Physics", "difficulty": "hard", "examDate": "2025-04-02"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let exam_id = exam["id"].as_str().unwrap().to_string();

        let (_, exams) = send(&app, "GET", &uri, None).await;
        assert_eq!(exams.as_array().unwrap().len(), 1);
        assert_eq!(exams[0]["difficulty"], "hard");

        let (status, _) = send(&app, "DELETE", &format!("/v1/exams/{exam_id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "DELETE", &format!("/v1/exams/{exam_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn low_score_shows_up_as_weak_topic() {
        let app = app();
        let user_id = create_user(&app).await;

        let (status, recorded) = send(
            &app,
            "POST",
            &format!("/v1/users/{user_id}/performance"),
            Some(json!({"subject": "Math", "topic": "Limits", "score": 2, "maxScore": 10})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(recorded["is_weak"], true);

        let (_, weak) = send(&app, "GET", &format!("/v1/users/{user_id}/weak-topics"), None).await;
        assert_eq!(weak[0]["topic"], "Limits");

        let (_, summary) = send(&app, "GET", &format!("/v1/users/{user_id}/performance/summary"), None).await;
        assert_eq!(summary[0]["subject"], "Math");
        assert_eq!(summary[0]["attempts"], 1);
    }
}
