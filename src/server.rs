use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, extract::State, response::Html, routing::get};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::{config::SiteConfig, page::PageState, render::render_page, youtube::YoutubeClient};

#[derive(Clone)]
pub struct AppState {
    pub youtube: YoutubeClient,
    pub site: Arc<SiteConfig>,
}

/// Every visit loads fresh data from YouTube before rendering.
/// A visitor disconnecting mid-load drops the in-flight requests with it
#[instrument(skip(state))]
async fn index(State(state): State<AppState>) -> Html<String> {
    let page = PageState::load(&state.youtube, &state.site).await;
    info!(
        "Rendering page with {} sermons, livestream: {:?}",
        page.videos.len(),
        page.live_video_id
    );
    Html(render_page(&state.site, &page))
}

async fn healthz() -> &'static str {
    "ok"
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Serves the site until `ct` is cancelled
///
/// # Errors
/// * If the address cannot be bound
/// * If the server stops with an IO error
pub async fn serve(listen: SocketAddr, state: AppState, ct: CancellationToken) -> Result<()> {
    let listener = TcpListener::bind(listen)
        .await
        .context(format!("Launching HTTP server on {listen}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(ct.cancelled_owned())
        .await
        .context("Serving HTTP")?;

    info!("Server shut down");
    Ok(())
}
