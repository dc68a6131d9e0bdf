/// Playlist holding the church's recorded sermons
pub const DEFAULT_PLAYLIST_ID: &str = "PLxVbRXKjzf4ZysNMtoLk949yNIr37VMVy";

pub const PRAYER_FORM_URL: &str = "https://docs.google.com/forms/d/e/1FAIpQLSchEwpuNAhGF_yC7TnmCQqZyovKr9jMxlwCovyzHr4xb7zjmw/viewform?usp=dialog";

/// Everything the page needs besides the data fetched from YouTube
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub playlist_id: String,
    pub channel_id: String,

    pub church_name: String,
    pub short_name: String,
    pub service_times: String,
    pub hero_image: String,
    pub prayer_form_url: String,
    pub about: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub copyright_year: u16,
}

impl SiteConfig {
    #[must_use]
    pub fn new(channel_id: impl Into<String>, playlist_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            playlist_id: playlist_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn channel_url(&self) -> String {
        format!("https://www.youtube.com/channel/{}", self.channel_id)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            playlist_id: DEFAULT_PLAYLIST_ID.to_string(),
            channel_id: String::new(),
            church_name: "St. James Church Jacobpuram".to_string(),
            short_name: "St. James Church".to_string(),
            service_times: "Sunday Service – 9:30 AM | Daily Service – 7:30 PM".to_string(),
            hero_image: "/backgrounds/hero.jpg".to_string(),
            prayer_form_url: PRAYER_FORM_URL.to_string(),
            about: "The Jacobpuram congregation is a major landmark in the southern tip of Tirunelveli district...".to_string(),
            address: "Jacobpuram, Tirunelveli Dist., Tamil Nadu, INDIA".to_string(),
            email: "stjameschurchofficial@gmail.com".to_string(),
            phone: "+91 98765 43210".to_string(),
            copyright_year: 2025,
        }
    }
}
