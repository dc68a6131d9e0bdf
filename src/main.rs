#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use config::{DEFAULT_PLAYLIST_ID, SiteConfig};
use page::PageState;
use render::render_page;
use server::AppState;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;
use util::{init_http_client, spawn_ct_watcher};
use youtube::{YOUTUBE_API_BASE, YoutubeClient};

pub mod config;
pub mod page;
pub mod render;
pub mod server;
pub mod util;
pub mod youtube;

/// Website for St. James Church, showing its livestream and recent sermons
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// YouTube Data API key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Channel whose livestream / latest video is embedded
    #[arg(long, env = "YOUTUBE_CHANNEL_ID")]
    channel_id: String,

    /// Playlist the recent sermons are taken from
    #[arg(long, env = "YOUTUBE_PLAYLIST_ID", default_value = DEFAULT_PLAYLIST_ID)]
    playlist_id: String,

    /// Base URL of the YouTube Data API
    #[arg(long, env = "YOUTUBE_API_BASE", default_value = YOUTUBE_API_BASE)]
    api_base: String,

    /// Address to listen on when serving
    #[arg(short, long, env = "LISTEN_ADDR", default_value = "127.0.0.1:3000")]
    listen: SocketAddr,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the page over HTTP, fetching fresh data on every visit [default]
    Serve,
    /// Fetch once and write the rendered page
    Render {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Loads the `.env` file (or `env_file`) and builds the log filter from it,
/// so a `RUST_LOG` set there applies. Defaults to `info`
fn load_env(env_file: Option<&Path>) -> EnvFilter {
    if let Some(path) = env_file {
        dotenvy::from_path(path).ok();
    } else {
        dotenvy::dotenv().ok();
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(load_env(None))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.api_key.trim().is_empty() {
        bail!("YouTube API key is empty");
    }
    if args.channel_id.trim().is_empty() {
        bail!("YouTube channel ID is empty");
    }

    let youtube = YoutubeClient::new(init_http_client(), args.api_base, args.api_key);
    let site = SiteConfig::new(args.channel_id, args.playlist_id);

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let ct = CancellationToken::new();
            spawn_ct_watcher(ct.clone());

            let state = AppState {
                youtube,
                site: Arc::new(site),
            };
            server::serve(args.listen, state, ct).await?;
        }
        Command::Render { out } => {
            let page = PageState::load(&youtube, &site).await;
            let html = render_page(&site, &page);

            if let Some(out) = out {
                tokio::fs::write(&out, html)
                    .await
                    .context(format!("Writing page to {}", out.display()))?;
                info!("Page written to {out:?}");
            } else {
                print!("{html}");
            }
        }
    }

    info!("All done!");
    Ok(())
}
