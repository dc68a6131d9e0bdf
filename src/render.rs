use chrono::DateTime;
use indoc::{formatdoc, indoc};

use crate::{config::SiteConfig, page::PageState, util::escape_html, youtube::VideoItem};

const PLAYER_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

pub const NO_LIVESTREAM_MESSAGE: &str = "No livestream available at the moment.";
pub const LOADING_SERMONS_MESSAGE: &str = "Loading sermons...";

const STYLESHEET: &str = indoc! {"
    html { scroll-behavior: smooth; }
    body { margin: 0; font-family: system-ui, sans-serif; color: #1f2937; background: linear-gradient(135deg, #eff6ff, #fff); }
    section { padding: 4rem 1.5rem; text-align: center; }
    h2 { font-size: 1.875rem; font-weight: 700; color: #1e3a8a; margin: 0 0 1.5rem; }
    .hero { position: relative; min-height: 100vh; display: flex; flex-direction: column; align-items: center; justify-content: center; overflow: hidden; }
    .hero-bg { position: absolute; inset: 0; z-index: 0; }
    .hero-bg img { width: 100%; height: 100%; object-fit: cover; transform: scale(1.1); }
    .hero-bg::after { content: ''; position: absolute; inset: 0; background: rgba(255, 255, 255, 0.6); backdrop-filter: blur(4px); }
    .hero > :not(.hero-bg) { z-index: 1; }
    .hero h2 { font-size: 3rem; margin-bottom: 1rem; }
    .hero h1 { font-size: 1.5rem; color: #1e40af; margin: 0 0 0.5rem; }
    .hero p { font-size: 1.25rem; font-weight: 700; color: #1e3a8a; }
    .actions { display: flex; flex-wrap: wrap; gap: 1rem; justify-content: center; }
    .button { padding: 0.75rem 1.5rem; border-radius: 0.375rem; text-decoration: none; font-weight: 600; }
    .button-live { background: #dc2626; color: #fff; }
    .button-outline { border: 1px solid #d1d5db; color: #1f2937; background: #fff; }
    .narrow { max-width: 42rem; margin: 0 auto; }
    .wide { max-width: 48rem; margin: 0 auto; }
    .player { position: relative; width: 100%; aspect-ratio: 16 / 9; border-radius: 0.75rem; overflow: hidden; box-shadow: 0 10px 15px rgba(0, 0, 0, 0.1); }
    .player iframe { position: absolute; inset: 0; width: 100%; height: 100%; }
    .form { width: 100%; border: 1px solid #e5e7eb; border-radius: 1rem; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr)); gap: 1.5rem; }
    .card { padding: 1rem; border-radius: 0.75rem; background: #fff; box-shadow: 0 10px 15px rgba(0, 0, 0, 0.1); }
    .card iframe { width: 100%; aspect-ratio: 16 / 9; border-radius: 0.375rem; }
    .muted { color: #6b7280; }
    .full { grid-column: 1 / -1; }
    .bg-gray { background: #f3f4f6; }
    .bg-white { background: #fff; }
    .bg-blue { background: #eff6ff; }
    footer { background: #1e3a8a; color: #fff; padding: 2.5rem 1.5rem; }
    footer .columns { display: flex; flex-wrap: wrap; justify-content: space-between; gap: 1.5rem; }
    footer ul { list-style: none; padding: 0; }
    footer a { color: #fff; }
    footer .copyright { text-align: center; font-size: 0.875rem; color: #d1d5db; margin-top: 2rem; }
"};

/// Formats an RFC 3339 timestamp the way a browser's `toLocaleDateString()`
/// does for en-US, in the timestamp's own offset. Unparseable input is
/// returned unchanged
#[must_use]
pub fn format_publish_date(published_at: &str) -> String {
    DateTime::parse_from_rfc3339(published_at).map_or_else(
        |_| published_at.to_string(),
        |d| d.format("%-m/%-d/%Y").to_string(),
    )
}

/// Renders the whole page
#[must_use]
pub fn render_page(site: &SiteConfig, state: &PageState) -> String {
    formatdoc! {r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
        <meta charset="utf-8">
        <meta name="viewport" content="width=device-width, initial-scale=1">
        <title>{title}</title>
        <style>
        {style}</style>
        </head>
        <body>
        {hero}{livestream}{prayer}{about}{sermons}{footer}</body>
        </html>
        "#,
        title = escape_html(&site.church_name),
        style = STYLESHEET,
        hero = render_hero(site),
        livestream = render_livestream(state.live_video_id.as_deref()),
        prayer = render_prayer_form(site),
        about = render_about(site),
        sermons = render_sermons(&state.videos),
        footer = render_footer(site),
    }
}

fn render_hero(site: &SiteConfig) -> String {
    formatdoc! {r##"
        <section class="hero">
          <div class="hero-bg"><img src="{image}" alt="Worship Background"></div>
          <h2>{name}</h2>
          <h1>Join Us for Worship</h1>
          <p>{times}</p>
          <div class="actions">
            <a class="button button-live" href="{channel}" target="_blank" rel="noopener noreferrer">Watch Live on YouTube</a>
            <a class="button button-outline" href="#footer">Submit a Prayer Request</a>
          </div>
        </section>
        "##,
        image = escape_html(&site.hero_image),
        name = escape_html(&site.church_name),
        times = escape_html(&site.service_times),
        channel = escape_html(&site.channel_url()),
    }
}

fn render_livestream(live_video_id: Option<&str>) -> String {
    let body = live_video_id.map_or_else(
        || format!(r#"<p class="muted">{NO_LIVESTREAM_MESSAGE}</p>"#),
        |id| {
            formatdoc! {r#"
                <div class="player">
                      <iframe src="https://www.youtube.com/embed/{id}?autoplay=1" title="YouTube Livestream" frameborder="0" allow="{allow}" allowfullscreen></iframe>
                    </div>"#,
                id = escape_html(id),
                allow = PLAYER_ALLOW,
            }
        },
    );

    formatdoc! {r#"
        <section class="bg-gray" id="livestream">
          <div class="narrow">
            <h2>Sunday Livestream</h2>
            {body}
          </div>
        </section>
        "#,
        body = body,
    }
}

fn render_prayer_form(site: &SiteConfig) -> String {
    formatdoc! {r#"
        <section class="bg-white" id="prayer">
          <div class="wide">
            <h2>Need Prayer?</h2>
            <p class="muted">Fill out the form below and our prayer team will pray for you.</p>
            <iframe class="form" src="{url}" width="100%" height="600" frameborder="0" title="Prayer Request Form"></iframe>
          </div>
        </section>
        "#,
        url = escape_html(&site.prayer_form_url),
    }
}

fn render_about(site: &SiteConfig) -> String {
    formatdoc! {r#"
        <section class="bg-blue" id="about">
          <h2>Who We Are</h2>
          <p class="narrow">{about}</p>
        </section>
        "#,
        about = escape_html(&site.about),
    }
}

fn render_sermons(videos: &[VideoItem]) -> String {
    let cards = if videos.is_empty() {
        format!(r#"<p class="muted full">{LOADING_SERMONS_MESSAGE}</p>"#)
    } else {
        videos.iter().map(render_sermon_card).collect::<String>()
    };

    formatdoc! {r#"
        <section class="bg-white" id="sermons">
          <h2>Recent Sermons</h2>
          <div class="grid">
        {cards}
          </div>
        </section>
        "#,
        cards = cards,
    }
}

fn render_sermon_card(video: &VideoItem) -> String {
    let title = escape_html(&video.snippet.title);
    formatdoc! {r#"
        <div class="card" id="video-{key}">
          <iframe src="https://www.youtube.com/embed/{video_id}" title="{title}" frameborder="0" allow="{allow}" allowfullscreen></iframe>
          <h3>{title}</h3>
          <p class="muted">{date}</p>
        </div>
        "#,
        key = escape_html(&video.id),
        video_id = escape_html(&video.snippet.resource_id.video_id),
        title = title,
        allow = PLAYER_ALLOW,
        date = escape_html(&format_publish_date(&video.snippet.published_at)),
    }
}

fn render_footer(site: &SiteConfig) -> String {
    formatdoc! {r##"
        <footer id="footer">
          <div class="columns">
            <div>
              <h3>{name}</h3>
              <p>{address}</p>
              <p>Email: {email}</p>
              <p>Phone: {phone}</p>
            </div>
            <div>
              <h3>Follow Us</h3>
              <ul>
                <li><a href="{channel}">YouTube</a></li>
                <li><a href="#">Facebook</a></li>
                <li><a href="#">Instagram</a></li>
              </ul>
            </div>
          </div>
          <p class="copyright">© {year} {name}. All rights reserved.</p>
        </footer>
        "##,
        name = escape_html(&site.short_name),
        address = escape_html(&site.address),
        email = escape_html(&site.email),
        phone = escape_html(&site.phone),
        channel = escape_html(&site.channel_url()),
        year = site.copyright_year,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::{ResourceId, VideoSnippet};
    use pretty_assertions::assert_eq;

    fn video(id: &str, title: &str, video_id: &str) -> VideoItem {
        VideoItem {
            id: id.to_string(),
            snippet: VideoSnippet {
                title: title.to_string(),
                published_at: "2025-01-01T00:00:00Z".to_string(),
                resource_id: ResourceId {
                    video_id: video_id.to_string(),
                },
            },
        }
    }

    fn site() -> SiteConfig {
        SiteConfig::new("UCchannel", "PLplaylist")
    }

    #[test]
    fn test_format_publish_date() {
        assert_eq!(format_publish_date("2025-01-01T00:00:00Z"), "1/1/2025");
        assert_eq!(format_publish_date("2024-12-25T18:30:00+05:30"), "12/25/2024");
        assert_eq!(format_publish_date("2025-01-01T00:00:00+05:30"), "1/1/2025");
        assert_eq!(format_publish_date("2024-12-31T23:00:00-08:00"), "12/31/2024");
        assert_eq!(format_publish_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_empty_state() {
        let html = render_page(&site(), &PageState::default());

        assert!(html.contains(NO_LIVESTREAM_MESSAGE));
        assert!(html.contains(LOADING_SERMONS_MESSAGE));
        assert_eq!(html.matches(r#"class="card""#).count(), 0);
        assert!(!html.contains("youtube.com/embed/"));
    }

    #[test]
    fn test_single_sermon_card() {
        let state = PageState {
            videos: vec![video("a", "Sermon 1", "vid1")],
            live_video_id: None,
        };
        let html = render_page(&site(), &state);

        assert_eq!(html.matches(r#"class="card""#).count(), 1);
        assert!(html.contains("<h3>Sermon 1</h3>"));
        assert!(html.contains(r#"title="Sermon 1""#));
        assert!(html.contains("1/1/2025"));
        assert!(html.contains(r#"src="https://www.youtube.com/embed/vid1""#));
        assert!(!html.contains(LOADING_SERMONS_MESSAGE));
    }

    #[test]
    fn test_card_count_matches_items() {
        for n in 0..=6 {
            let state = PageState {
                videos: (0..n)
                    .map(|i| video(&format!("item{i}"), &format!("Sermon {i}"), &format!("vid{i}")))
                    .collect(),
                live_video_id: None,
            };
            let html = render_page(&site(), &state);
            assert_eq!(html.matches(r#"class="card""#).count(), n);
        }
    }

    #[test]
    fn test_livestream_embed() {
        let state = PageState {
            videos: Vec::new(),
            live_video_id: Some("vidX".to_string()),
        };
        let html = render_page(&site(), &state);

        assert!(html.contains(r#"src="https://www.youtube.com/embed/vidX?autoplay=1""#));
        assert!(!html.contains(NO_LIVESTREAM_MESSAGE));
    }

    #[test]
    fn test_livestream_markup_is_aligned() {
        let html = render_livestream(Some("vidX"));
        let lines: Vec<&str> = html.lines().collect();
        let div = lines.iter().position(|l| l.contains(r#"<div class="player">"#)).unwrap();
        let indent = |l: &str| l.len() - l.trim_start().len();

        assert_eq!(indent(lines[div + 1]), indent(lines[div]) + 2);
        assert_eq!(lines[div + 2].trim(), "</div>");
        assert_eq!(indent(lines[div + 2]), indent(lines[div]));
    }

    #[test]
    fn test_titles_are_escaped() {
        let state = PageState {
            videos: vec![video("a", "Faith & <Hope>", "vid1")],
            live_video_id: None,
        };
        let html = render_page(&site(), &state);

        assert!(html.contains("<h3>Faith &amp; &lt;Hope&gt;</h3>"));
        assert!(!html.contains("<Hope>"));
    }

    #[test]
    fn test_static_sections() {
        let html = render_page(&site(), &PageState::default());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>St. James Church Jacobpuram</h2>"));
        assert!(html.contains("Join Us for Worship"));
        assert!(html.contains(r#"href="https://www.youtube.com/channel/UCchannel""#));
        assert!(html.contains(&escape_html(crate::config::PRAYER_FORM_URL)));
        assert!(html.contains("Who We Are"));
        assert!(html.contains("Recent Sermons"));
        assert!(html.contains("© 2025 St. James Church. All rights reserved."));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let state = PageState {
            videos: vec![video("a", "Sermon 1", "vid1")],
            live_video_id: Some("live".to_string()),
        };
        assert_eq!(render_page(&site(), &state), render_page(&site(), &state));
    }
}
