use std::sync::LazyLock;

use anyhow::{Context, Result, ensure};
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument};

pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Amount of sermons shown on the page
pub const PLAYLIST_PAGE_SIZE: u8 = 6;

pub static VIDEO_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// An entry of a playlist as returned by `playlistItems?part=snippet`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    /// Kept as the raw RFC 3339 string so a malformed date can still be shown
    pub published_at: String,
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    pub video_id: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// Whether `id` is safe to put into an embed URL
#[must_use]
pub fn is_valid_video_id(id: &str) -> bool {
    VIDEO_ID_REGEX.is_match(id)
}

/// Read-only YouTube Data API v3 client authenticated with an API key
#[derive(Clone)]
pub struct YoutubeClient {
    http: Client,
    api_base: String,
    api_key: String,
}

impl YoutubeClient {
    pub fn new(http: Client, api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Lists the first `max_results` items of a playlist
    ///
    /// # Errors
    /// Errors on network error, non-success status or malformed body
    #[instrument(skip(self))]
    pub async fn list_playlist_items(
        &self,
        playlist_id: &str,
        max_results: u8,
    ) -> Result<Vec<VideoItem>> {
        self.list(
            "playlistItems",
            &[
                ("part", "snippet"),
                ("maxResults", &max_results.to_string()),
                ("playlistId", playlist_id),
            ],
        )
        .await
        .context("Fetching playlist items")
    }

    /// Returns the ID of the video the channel is currently broadcasting, if any
    ///
    /// # Errors
    /// Errors on network error, non-success status or malformed body
    #[instrument(skip(self))]
    pub async fn search_live_video(&self, channel_id: &str) -> Result<Option<String>> {
        let items: Vec<SearchResult> = self
            .list(
                "search",
                &[
                    ("part", "snippet"),
                    ("channelId", channel_id),
                    ("type", "video"),
                    ("eventType", "live"),
                ],
            )
            .await
            .context("Searching for live video")?;

        Ok(items.into_iter().next().map(|i| i.id.video_id))
    }

    /// Returns the ID of the channel's most recently published video, if any
    ///
    /// # Errors
    /// Errors on network error, non-success status or malformed body
    #[instrument(skip(self))]
    pub async fn search_latest_video(&self, channel_id: &str) -> Result<Option<String>> {
        let items: Vec<SearchResult> = self
            .list(
                "search",
                &[
                    ("part", "snippet"),
                    ("channelId", channel_id),
                    ("order", "date"),
                    ("maxResults", "1"),
                    ("type", "video"),
                ],
            )
            .await
            .context("Searching for latest video")?;

        Ok(items.into_iter().next().map(|i| i.id.video_id))
    }

    async fn list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let res = self
            .http
            .get(format!("{}/{endpoint}", self.api_base))
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            // The URL carries the API key
            .map_err(reqwest::Error::without_url)
            .context(format!("Sending `{endpoint}` request"))?;

        ensure!(
            res.status().is_success(),
            "YouTube `{endpoint}` request failed with status {}",
            res.status()
        );

        let body = res
            .json::<ListResponse<T>>()
            .await
            .map_err(reqwest::Error::without_url)
            .context(format!("Parsing `{endpoint}` response"))?;
        debug!("`{endpoint}` returned {} items", body.items.len());

        Ok(body.items)
    }
}

/// In-process stand-in for the YouTube Data API used by tests
#[cfg(test)]
pub mod mock {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use axum::{
        Json, Router,
        extract::{Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
    };
    use serde_json::Value;
    use tokio::net::TcpListener;

    /// `None` makes the endpoint answer with a 500
    #[derive(Debug, Default)]
    pub struct MockYoutube {
        pub playlist: Option<Value>,
        pub live: Option<Value>,
        pub recent: Option<Value>,
        pub requests: Mutex<Vec<(String, HashMap<String, String>)>>,
    }

    impl MockYoutube {
        pub fn requests_to(&self, endpoint: &str) -> Vec<HashMap<String, String>> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|(e, _)| e == endpoint)
                .map(|(_, q)| q.clone())
                .collect()
        }
    }

    /// Serves `mock` on a random local port and returns its base URL
    pub async fn spawn(mock: MockYoutube) -> (String, Arc<MockYoutube>) {
        let mock = Arc::new(mock);
        let app = Router::new()
            .route("/playlistItems", get(playlist_items))
            .route("/search", get(search))
            .with_state(mock.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        (format!("http://{addr}"), mock)
    }

    async fn playlist_items(
        State(mock): State<Arc<MockYoutube>>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Response {
        mock.requests
            .lock()
            .unwrap()
            .push(("playlistItems".to_string(), params));
        respond(mock.playlist.as_ref())
    }

    async fn search(
        State(mock): State<Arc<MockYoutube>>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Response {
        let live = params.get("eventType").is_some_and(|t| t == "live");
        mock.requests
            .lock()
            .unwrap()
            .push(("search".to_string(), params));
        respond(if live { mock.live.as_ref() } else { mock.recent.as_ref() })
    }

    fn respond(body: Option<&Value>) -> Response {
        match body {
            Some(v) => Json(v.clone()).into_response(),
            None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
