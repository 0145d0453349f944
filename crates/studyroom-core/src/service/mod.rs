//! Request-handling services shared by the CLI and the HTTP API.

pub mod performance;
pub mod study_plan;

pub use performance::{performance_summary, record_performance, PerformanceInput, RecordedPerformance};
pub use study_plan::{
    generate_from_request, generate_study_plan, request_from_exams, subjects_from_exams, GeneratedPlan,
};
