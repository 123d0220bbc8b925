//! Liveness HTTP endpoint.

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

/// Serve `GET /healthz` on the given listener until shutdown.
pub async fn serve(
    listener: TcpListener,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let app = Router::new().route("/healthz", get(healthz));

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
}

async fn healthz() -> &'static str {
    "OK"
}
