use std::path::{Path, PathBuf};

use anyhow::Context as _;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cli::ServeArgs;

/// Static file router over a built site. Directory URLs resolve to their
/// `index.html`, matching how the site is published.
pub fn router(dir: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(listener: tokio::net::TcpListener, dir: PathBuf) -> anyhow::Result<()> {
    let app = router(&dir);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("serve site")
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let dir = PathBuf::from(&args.dir);
    if !dir.join("index.html").is_file() {
        anyhow::bail!(
            "no built site at {} (run `waypoint build` first)",
            dir.display()
        );
    }

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;
    tracing::info!(addr = %args.addr, dir = %dir.display(), "listening");
    println!("Serving {} at http://{}/", dir.display(), args.addr);
    serve(listener, dir).await
}
