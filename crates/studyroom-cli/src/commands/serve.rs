//! `studyroom serve`: run the REST backend.

use clap::Args;
use studyroom_core::{Config, StudyDb};

use crate::http::{self, AppState};

#[derive(Args)]
pub struct ServeArgs {
    /// Bind host (default: server.host)
    #[arg(long)]
    host: Option<String>,
    /// Bind port (default: server.port)
    #[arg(long)]
    port: Option<u16>,
}

pub fn run(args: ServeArgs, mut config: Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let db = StudyDb::open()?;
    let state = AppState::new(db, config);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(http::serve(state))?;
    Ok(())
}
