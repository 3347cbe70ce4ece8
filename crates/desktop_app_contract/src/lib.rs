//! Shared contract types between the desktop window manager runtime and managed apps.
//!
//! Apps never touch the window manager directly. They describe the window they want with a
//! [`WindowConfig`], identify it with a [`WindowKey`], and reach back into the shell through the
//! [`DesktopHost`] trait, which the runtime implements.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// Known desktop applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppId {
    /// To-do list.
    Tasks,
    /// Note editor.
    Notes,
    /// Weather widget.
    Weather,
    /// Embedded web browser.
    Browser,
    /// Saved links.
    Bookmarks,
    /// Browser preset for Google.
    Google,
    /// Browser preset for YouTube.
    Youtube,
    /// Shell settings.
    Settings,
    /// AI assistant chat.
    AiChat,
    /// File list.
    Files,
    /// Music player.
    MusicPlayer,
    /// Price ticker.
    CryptoTracker,
}

impl AppId {
    /// Every application, in launcher order.
    pub const ALL: [AppId; 12] = [
        AppId::Tasks,
        AppId::Notes,
        AppId::Weather,
        AppId::Browser,
        AppId::Bookmarks,
        AppId::Google,
        AppId::Youtube,
        AppId::Settings,
        AppId::AiChat,
        AppId::Files,
        AppId::MusicPlayer,
        AppId::CryptoTracker,
    ];

    /// Returns the canonical string id (also the default window key).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Notes => "notes",
            Self::Weather => "weather",
            Self::Browser => "browser",
            Self::Bookmarks => "bookmarks",
            Self::Google => "google",
            Self::Youtube => "youtube",
            Self::Settings => "settings",
            Self::AiChat => "ai-chat",
            Self::Files => "files",
            Self::MusicPlayer => "music-player",
            Self::CryptoTracker => "crypto-tracker",
        }
    }

    /// Human-readable title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Tasks => "Tasks",
            Self::Notes => "Notes",
            Self::Weather => "Weather",
            Self::Browser => "Browser",
            Self::Bookmarks => "Bookmarks",
            Self::Google => "Google",
            Self::Youtube => "YouTube",
            Self::Settings => "Settings",
            Self::AiChat => "AI Assistant",
            Self::Files => "Files",
            Self::MusicPlayer => "Music Player",
            Self::CryptoTracker => "Crypto Tracker",
        }
    }

    /// Icon identifier resolved by the view layer.
    pub const fn icon_id(self) -> &'static str {
        match self {
            Self::Tasks => "check-square",
            Self::Notes => "file-text",
            Self::Weather => "cloud-sun",
            Self::Browser | Self::Google | Self::Youtube => "globe",
            Self::Bookmarks => "bookmark",
            Self::Settings => "settings",
            Self::AiChat => "layers",
            Self::Files => "folder",
            Self::MusicPlayer => "play-circle",
            Self::CryptoTracker => "trending-up",
        }
    }

    /// Parses a canonical string id.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|app| app.as_str() == raw)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a managed window.
///
/// Single-instance apps use their [`AppId`] string. Multi-instance browser windows mint a fresh
/// key per open with [`WindowKey::browser_instance`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowKey(String);

impl WindowKey {
    /// Creates a key from trusted caller input.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the single-instance key for `app_id`.
    pub fn for_app(app_id: AppId) -> Self {
        Self(app_id.as_str().to_string())
    }

    /// Mints a browser instance key: `browser_<title slug>_<millis>`.
    pub fn browser_instance(title: &str, stamp_ms: u64) -> Self {
        let slug = title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase();
        if slug.is_empty() {
            Self(format!("browser_{stamp_ms}"))
        } else {
            Self(format!("browser_{slug}_{stamp_ms}"))
        }
    }

    /// Returns the key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AppId> for WindowKey {
    fn from(app_id: AppId) -> Self {
        Self::for_app(app_id)
    }
}

/// Default window width in pixels.
pub const DEFAULT_WINDOW_WIDTH: i32 = 600;
/// Default window height in pixels.
pub const DEFAULT_WINDOW_HEIGHT: i32 = 500;
/// Default minimum window width in pixels.
pub const DEFAULT_MIN_WIDTH: i32 = 300;
/// Default minimum window height in pixels.
pub const DEFAULT_MIN_HEIGHT: i32 = 200;

/// Construction parameters for a new window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Title bar text. Defaults to the window key when absent.
    pub title: Option<String>,
    /// Title bar and taskbar icon.
    pub icon_id: Option<String>,
    /// Initial width.
    pub width: i32,
    /// Initial height.
    pub height: i32,
    /// Resize floor for width.
    pub min_width: i32,
    /// Resize floor for height.
    pub min_height: i32,
    /// Extra style class for the window frame.
    pub css_class: Option<String>,
    /// URL shown by browser windows.
    pub url: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: None,
            icon_id: None,
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
            css_class: None,
            url: None,
        }
    }
}

impl WindowConfig {
    /// Starts a config with the app's title and icon.
    pub fn for_app(app_id: AppId) -> Self {
        Self {
            title: Some(app_id.title().to_string()),
            icon_id: Some(app_id.icon_id().to_string()),
            css_class: Some(format!("app-{}", app_id.as_str())),
            ..Self::default()
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the initial size.
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the resize floor.
    pub fn with_min_size(mut self, min_width: i32, min_height: i32) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }

    /// Sets the browser URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Shell services exposed to apps that act on other apps (the assistant, global search).
pub trait DesktopHost {
    /// Opens (or focuses) the window for `app_id` and returns its key.
    fn open_app(&mut self, app_id: AppId) -> Result<WindowKey, String>;

    /// Appends a task to the task list and refreshes the tasks window if it is open.
    fn create_task(&mut self, text: &str) -> Result<(), String>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn app_ids_round_trip_through_strings() {
        for app in AppId::ALL {
            assert_eq!(AppId::parse(app.as_str()), Some(app));
        }
        assert_eq!(AppId::parse("paint"), None);
    }

    #[test]
    fn app_id_serializes_as_kebab_case() {
        assert_eq!(
            serde_json::to_string(&AppId::AiChat).expect("serialize"),
            "\"ai-chat\""
        );
        assert_eq!(
            serde_json::to_string(&AppId::MusicPlayer).expect("serialize"),
            "\"music-player\""
        );
    }

    #[test]
    fn browser_instance_keys_slug_the_title() {
        assert_eq!(
            WindowKey::browser_instance("My  YouTube", 42).as_str(),
            "browser_my_youtube_42"
        );
        assert_eq!(WindowKey::browser_instance("", 7).as_str(), "browser_7");
    }

    #[test]
    fn window_config_defaults_match_shell_defaults() {
        let config = WindowConfig::default();
        assert_eq!((config.width, config.height), (600, 500));
        assert_eq!((config.min_width, config.min_height), (300, 200));

        let tasks = WindowConfig::for_app(AppId::Tasks).with_size(500, 600);
        assert_eq!(tasks.title.as_deref(), Some("Tasks"));
        assert_eq!(tasks.css_class.as_deref(), Some("app-tasks"));
        assert_eq!(tasks.height, 600);
    }
}
