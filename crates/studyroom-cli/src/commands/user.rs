//! User management commands for CLI.

use clap::Subcommand;
use studyroom_core::{StudyDb, User};

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a new user
    Create {
        /// Display name
        name: String,
        /// Contact email
        #[arg(long)]
        email: Option<String>,
    },
    /// List all users
    List,
}

pub fn run(action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = StudyDb::open()?;

    match action {
        UserAction::Create { name, email } => {
            if name.trim().is_empty() {
                return Err("user name must not be empty".into());
            }
            let user = User::new(name.trim(), email);
            db.create_user(&user)?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        UserAction::List => {
            let users = db.list_users()?;
            println!("{}", serde_json::to_string_pretty(&users)?);
        }
    }
    Ok(())
}
