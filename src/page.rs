use anyhow::Result;
use tracing::{error, info, instrument, warn};

use crate::{
    config::SiteConfig,
    youtube::{PLAYLIST_PAGE_SIZE, VideoItem, YoutubeClient, is_valid_video_id},
};

/// What the page displays. Both slots start out empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageState {
    pub videos: Vec<VideoItem>,
    pub live_video_id: Option<String>,
}

impl PageState {
    /// Runs both fetches concurrently and fills whichever slots succeeded.
    /// Never fails; errors are logged and leave their slot empty
    pub async fn load(youtube: &YoutubeClient, site: &SiteConfig) -> Self {
        let mut state = Self::default();

        let (videos, live_video_id) = tokio::join!(
            fetch_playlist_videos(youtube, &site.playlist_id),
            fetch_live_or_recent_video(youtube, &site.channel_id),
        );

        if let Some(videos) = videos {
            state.videos = videos;
        }
        state.live_video_id = live_video_id;

        state
    }
}

/// Returns `None` if the playlist could not be fetched
#[instrument(skip(youtube))]
pub async fn fetch_playlist_videos(
    youtube: &YoutubeClient,
    playlist_id: &str,
) -> Option<Vec<VideoItem>> {
    match youtube
        .list_playlist_items(playlist_id, PLAYLIST_PAGE_SIZE)
        .await
    {
        Ok(videos) => Some(
            videos
                .into_iter()
                .filter(|v| {
                    let valid = is_valid_video_id(&v.snippet.resource_id.video_id);
                    if !valid {
                        warn!(
                            "Skipping playlist item {} with invalid video ID {:?}",
                            v.id, v.snippet.resource_id.video_id
                        );
                    }
                    valid
                })
                .collect(),
        ),
        Err(e) => {
            error!("Failed to load playlist: {e:#}");
            None
        }
    }
}

/// Returns the live video or, failing that, the latest one. `None` on any error
#[instrument(skip(youtube))]
pub async fn fetch_live_or_recent_video(
    youtube: &YoutubeClient,
    channel_id: &str,
) -> Option<String> {
    match resolve_live_video(youtube, channel_id).await {
        Ok(Some(id)) if is_valid_video_id(&id) => Some(id),
        Ok(Some(id)) => {
            warn!("Ignoring livestream with invalid video ID {id:?}");
            None
        }
        Ok(None) => None,
        Err(e) => {
            error!("Failed to fetch livestream: {e:#}");
            None
        }
    }
}

async fn resolve_live_video(youtube: &YoutubeClient, channel_id: &str) -> Result<Option<String>> {
    if let Some(id) = youtube.search_live_video(channel_id).await? {
        info!("Channel is live with video {id}");
        return Ok(Some(id));
    }

    let latest = youtube.search_latest_video(channel_id).await?;
    if latest.is_none() {
        info!("Channel has no live or past videos");
    }
    Ok(latest)
}
