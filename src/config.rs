use log::{warn, Level};
use serde::Deserialize;

use crate::media::{MediaId, MediaSpec, Orientation};
use crate::error::SiteError;

/// Id of the inline `<script type="application/json">` holding the site config.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose transitions while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct RemoteVideo {
    pub id: String,
    #[serde(default)]
    pub orientation: Orientation,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct MediaEntry {
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub preview: String,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "default_lazy")]
    pub lazy: bool,
}

fn default_lazy() -> bool {
    true
}

impl MediaEntry {
    fn new(title: &str, category: &str, preview: &str, remote_id: &str, orientation: Orientation) -> Self {
        Self {
            title: title.to_string(),
            category: category.to_string(),
            preview: preview.to_string(),
            poster: None,
            remote_id: Some(remote_id.to_string()),
            orientation,
            lazy: true,
        }
    }

    pub fn spec(&self) -> MediaSpec {
        MediaSpec {
            deferred_source: self.lazy.then(|| self.preview.clone()),
            remote_id: self.remote_id.clone(),
            orientation: self.orientation,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Embed player URL, `{id}` is replaced with the remote identifier.
    pub embed_url_template: String,
    pub game_url: String,
    pub showreel: Option<RemoteVideo>,
    pub portfolio: Vec<MediaEntry>,
    pub editing: Vec<MediaEntry>,
    pub nav_scroll_threshold: f64,
    pub lazy_root_margin: String,
    pub presence_threshold: f64,
    pub reveal_threshold: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            embed_url_template: "https://player.vimeo.com/video/{id}?autoplay=1&title=0&byline=0&portrait=0".to_string(),
            game_url: "/snake/index.html".to_string(),
            showreel: Some(RemoteVideo {
                id: "76979871".to_string(),
                orientation: Orientation::Horizontal,
            }),
            portfolio: vec![
                MediaEntry::new("Brand Film", "Commercial", "/assets/previews/brand-film.mp4", "76979871", Orientation::Horizontal),
                MediaEntry::new("Night Drive", "Music Video", "/assets/previews/night-drive.mp4", "22439234", Orientation::Horizontal),
                MediaEntry::new("Studio Session", "Documentary", "/assets/previews/studio-session.mp4", "1084537", Orientation::Horizontal),
            ],
            editing: vec![
                MediaEntry::new("Launch Teaser", "Short Form", "/assets/previews/launch-teaser.mp4", "253989945", Orientation::Vertical),
                MediaEntry::new("Behind The Cut", "Short Form", "/assets/previews/behind-the-cut.mp4", "357274789", Orientation::Vertical),
            ],
            nav_scroll_threshold: 100.0,
            lazy_root_margin: "50px".to_string(),
            presence_threshold: 0.1,
            reveal_threshold: 0.5,
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, SiteError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads the inline config element, falling back to defaults when it is
    /// missing or unparseable.
    pub fn load() -> Self {
        let raw = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|element| element.text_content());

        match raw {
            Some(raw) if !raw.trim().is_empty() => Self::from_json(&raw).unwrap_or_else(|err| {
                warn!("{}, using defaults", err);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Portfolio entries keyed by media id; ids continue into the editing grid.
    pub fn portfolio_entries(&self) -> Vec<(MediaId, MediaEntry)> {
        number_entries(&self.portfolio, 0)
    }

    pub fn editing_entries(&self) -> Vec<(MediaId, MediaEntry)> {
        number_entries(&self.editing, self.portfolio.len())
    }
}

fn number_entries(entries: &[MediaEntry], offset: usize) -> Vec<(MediaId, MediaEntry)> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| (MediaId((offset + index) as u32), entry.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = SiteConfig::from_json(r#"{"game_url": "/games/snake.html", "nav_scroll_threshold": 40}"#).unwrap();
        assert_eq!(config.game_url, "/games/snake.html");
        assert_eq!(config.nav_scroll_threshold, 40.0);
        assert_eq!(config.lazy_root_margin, "50px");
        assert_eq!(config.portfolio.len(), 3);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = SiteConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SiteError::Config(_)));
    }

    #[test]
    fn entries_default_to_lazy_horizontal() {
        let config = SiteConfig::from_json(
            r#"{"portfolio": [{"title": "Reel", "preview": "/a.mp4"}],
                "editing": [{"title": "Cut", "preview": "/b.mp4", "orientation": "vertical", "remote_id": "abc", "lazy": false}]}"#,
        )
        .unwrap();

        let portfolio = config.portfolio_entries();
        assert_eq!(portfolio[0].0, MediaId(0));
        let spec = portfolio[0].1.spec();
        assert_eq!(spec.deferred_source.as_deref(), Some("/a.mp4"));
        assert_eq!(spec.orientation, Orientation::Horizontal);
        assert_eq!(spec.remote_id, None);

        let editing = config.editing_entries();
        assert_eq!(editing[0].0, MediaId(1));
        let spec = editing[0].1.spec();
        assert_eq!(spec.deferred_source, None);
        assert_eq!(spec.orientation, Orientation::Vertical);
        assert_eq!(spec.remote_id.as_deref(), Some("abc"));
    }
}
