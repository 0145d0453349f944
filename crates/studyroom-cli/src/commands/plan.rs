//! Study plan commands for CLI.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Subcommand;
use studyroom_core::service;
use studyroom_core::{planner, Config, CoreError, PreferredTime, ScheduleRequestPayload, StudyDb};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Generate a plan and make it the user's active plan
    Generate {
        /// User ID
        user_id: String,
        /// JSON request file ({subjects, availableHoursPerDay, preferredStudyTime})
        #[arg(long, conflicts_with = "from_exams", required_unless_present = "from_exams")]
        file: Option<PathBuf>,
        /// Plan from the user's stored upcoming exams
        #[arg(long)]
        from_exams: bool,
        /// Study hours per day (default: planner.default_hours_per_day)
        #[arg(long, requires = "from_exams")]
        hours: Option<u32>,
        /// morning, afternoon, evening or night (default: planner.default_preferred_time)
        #[arg(long, requires = "from_exams")]
        time: Option<PreferredTime>,
        /// Planning date (YYYY-MM-DD, default: today)
        #[arg(long, value_parser = super::parse_date)]
        date: Option<NaiveDate>,
    },
    /// Run the planner on a request file without storing anything
    Preview {
        /// JSON request file
        #[arg(long)]
        file: PathBuf,
        /// Planning date (YYYY-MM-DD, default: today)
        #[arg(long, value_parser = super::parse_date)]
        date: Option<NaiveDate>,
    },
    /// Show the user's active plan
    Active {
        /// User ID
        user_id: String,
    },
    /// List all plans of a user, newest first
    List {
        /// User ID
        user_id: String,
    },
    /// Show a plan by ID
    Show {
        /// Plan ID
        id: String,
    },
}

fn read_payload(file: &Path) -> Result<ScheduleRequestPayload, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(file)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn run(action: PlanAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Generate {
            user_id,
            file,
            from_exams,
            hours,
            time,
            date,
        } => {
            let db = StudyDb::open()?;
            let today = super::planning_date(date);
            let generated = match file {
                Some(file) if !from_exams => {
                    let payload = read_payload(&file)?;
                    service::generate_study_plan(&db, &user_id, &payload, today)?
                }
                _ => {
                    let request = service::request_from_exams(
                        &db,
                        &user_id,
                        hours.unwrap_or(config.planner.default_hours_per_day),
                        time.unwrap_or(config.planner.default_preferred_time),
                        today,
                    )?;
                    service::generate_from_request(&db, &user_id, &request, today)?
                }
            };
            println!("{}", serde_json::to_string_pretty(&generated)?);
        }
        PlanAction::Preview { file, date } => {
            let request = read_payload(&file)?.resolve()?;
            let result = planner::plan(&request, super::planning_date(date))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        PlanAction::Active { user_id } => {
            let db = StudyDb::open()?;
            let plan = db.active_study_plan(&user_id)?.ok_or_else(|| CoreError::NotFound {
                entity: "active study plan",
                id: user_id,
            })?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        PlanAction::List { user_id } => {
            let db = StudyDb::open()?;
            let plans = db.list_study_plans(&user_id)?;
            println!("{}", serde_json::to_string_pretty(&plans)?);
        }
        PlanAction::Show { id } => {
            let db = StudyDb::open()?;
            let plan = db
                .get_study_plan(&id)?
                .ok_or(CoreError::NotFound { entity: "study plan", id })?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }
    Ok(())
}
