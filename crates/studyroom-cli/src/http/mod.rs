//! REST backend over the core services.

mod error;
mod handlers;
mod router;
mod state;

pub use state::AppState;

use router::create_router;

use tracing::info;

/// Bind to the configured address and serve until the process exits.
pub async fn serve(state: AppState) -> std::io::Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Studyroom API listening on http://{addr}");
    axum::serve(listener, app).await
}
