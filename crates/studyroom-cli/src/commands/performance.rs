//! Performance tracking commands for CLI.

use clap::Subcommand;
use studyroom_core::service::{self, PerformanceInput};
use studyroom_core::{Config, StudyDb};

#[derive(Subcommand)]
pub enum PerformanceAction {
    /// Record a graded attempt
    Record {
        /// User ID
        user_id: String,
        /// Subject name
        subject: String,
        /// Topic within the subject
        topic: String,
        /// Points scored
        #[arg(long)]
        score: f64,
        /// Points possible
        #[arg(long, default_value = "100")]
        max_score: f64,
        /// Minutes spent
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// List a user's records
    List {
        /// User ID
        user_id: String,
        /// Only this subject
        #[arg(long)]
        subject: Option<String>,
    },
    /// Per-subject averages
    Summary {
        /// User ID
        user_id: String,
    },
    /// Topics below the weak-topic threshold
    Weak {
        /// User ID
        user_id: String,
    },
}

pub fn run(action: PerformanceAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = StudyDb::open()?;

    match action {
        PerformanceAction::Record {
            user_id,
            subject,
            topic,
            score,
            max_score,
            minutes,
        } => {
            let input = PerformanceInput {
                subject,
                topic,
                score,
                max_score,
                time_spent_minutes: minutes,
            };
            let recorded = service::record_performance(&db, &config.performance, &user_id, &input)?;
            println!("{}", serde_json::to_string_pretty(&recorded)?);
        }
        PerformanceAction::List { user_id, subject } => {
            let records = db.list_performance(&user_id, subject.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        PerformanceAction::Summary { user_id } => {
            let summary = service::performance_summary(&db, &user_id)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        PerformanceAction::Weak { user_id } => {
            let topics = db.list_weak_topics(&user_id)?;
            println!("{}", serde_json::to_string_pretty(&topics)?);
        }
    }
    Ok(())
}
