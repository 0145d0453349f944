use std::sync::{Arc, Mutex};

use studyroom_core::{Config, CoreError, StudyDb};

use super::error::AppError;

/// Shared handler state.
///
/// SQLite connections are not `Sync`, so the database sits behind a mutex.
/// All database work goes through [`AppState::with_db`], which runs on the
/// blocking thread pool.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<StudyDb>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: StudyDb, config: Config) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            config: Arc::new(config),
        }
    }

    /// Run `f` against the database inside `spawn_blocking`.
    pub async fn with_db<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&StudyDb) -> Result<T, CoreError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let db = db
                .lock()
                .map_err(|_| AppError::Internal("database lock poisoned".into()))?;
            f(&db).map_err(AppError::from)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {e}")))?
    }
}
