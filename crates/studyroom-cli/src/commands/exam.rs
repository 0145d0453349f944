//! Exam management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use studyroom_core::{CoreError, Difficulty, Exam, StudyDb};

#[derive(Subcommand)]
pub enum ExamAction {
    /// Add an upcoming exam
    Add {
        /// User ID
        user_id: String,
        /// Subject name
        subject: String,
        /// easy, medium or hard
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
        /// Exam date (YYYY-MM-DD)
        #[arg(long, value_parser = super::parse_date)]
        date: NaiveDate,
    },
    /// List a user's exams, nearest first
    List {
        /// User ID
        user_id: String,
    },
    /// Remove an exam
    Remove {
        /// Exam ID
        id: String,
    },
}

pub fn run(action: ExamAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = StudyDb::open()?;

    match action {
        ExamAction::Add {
            user_id,
            subject,
            difficulty,
            date,
        } => {
            if db.get_user(&user_id)?.is_none() {
                return Err(CoreError::NotFound {
                    entity: "user",
                    id: user_id,
                }
                .into());
            }
            let exam = Exam::new(user_id, subject.trim(), difficulty, date);
            db.create_exam(&exam)?;
            println!("{}", serde_json::to_string_pretty(&exam)?);
        }
        ExamAction::List { user_id } => {
            let exams = db.list_exams(&user_id)?;
            println!("{}", serde_json::to_string_pretty(&exams)?);
        }
        ExamAction::Remove { id } => {
            if !db.delete_exam(&id)? {
                return Err(CoreError::NotFound { entity: "exam", id }.into());
            }
            println!("exam removed");
        }
    }
    Ok(())
}
