//! App registry: launcher metadata and window parameters for every [`AppId`].

use desktop_app_contract::{AppId, WindowConfig, WindowKey};

/// URL a browser window shows when none is given.
pub const DEFAULT_BROWSER_URL: &str = "https://www.google.com";
/// URL for the YouTube launcher preset.
pub const YOUTUBE_URL: &str = "https://www.youtube.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppDescriptor {
    pub app_id: AppId,
    pub launcher_label: &'static str,
    /// Shown as a taskbar shortcut with an open indicator.
    pub pinned: bool,
    pub show_in_launcher: bool,
}

const APP_REGISTRY: [AppDescriptor; 12] = [
    AppDescriptor {
        app_id: AppId::Tasks,
        launcher_label: "Tasks",
        pinned: true,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::Notes,
        launcher_label: "Notes",
        pinned: true,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::Weather,
        launcher_label: "Weather",
        pinned: true,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::Browser,
        launcher_label: "Browser",
        pinned: true,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::Bookmarks,
        launcher_label: "Bookmarks",
        pinned: false,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::Google,
        launcher_label: "Google",
        pinned: false,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::Youtube,
        launcher_label: "YouTube",
        pinned: false,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::AiChat,
        launcher_label: "AI Assistant",
        pinned: true,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::Settings,
        launcher_label: "Settings",
        pinned: true,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::Files,
        launcher_label: "Files",
        pinned: false,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::MusicPlayer,
        launcher_label: "Music Player",
        pinned: false,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::CryptoTracker,
        launcher_label: "Crypto Tracker",
        pinned: false,
        show_in_launcher: true,
    },
];

pub fn app_registry() -> &'static [AppDescriptor] {
    &APP_REGISTRY
}

pub fn launcher_apps() -> Vec<AppDescriptor> {
    app_registry()
        .iter()
        .copied()
        .filter(|entry| entry.show_in_launcher)
        .collect()
}

pub fn pinned_apps() -> Vec<AppDescriptor> {
    app_registry()
        .iter()
        .copied()
        .filter(|entry| entry.pinned)
        .collect()
}

pub fn app_descriptor(app_id: AppId) -> Option<&'static AppDescriptor> {
    app_registry().iter().find(|entry| entry.app_id == app_id)
}

/// Window parameters used when `app_id` is launched.
///
/// The browser presets share the browser's window; see [`browser_window`].
pub fn window_config(app_id: AppId) -> WindowConfig {
    match app_id {
        AppId::Tasks => desktop_app_tasks::window_config(),
        AppId::Notes => desktop_app_notes::window_config(),
        AppId::Settings => desktop_app_settings::window_config(),
        AppId::Weather => WindowConfig::for_app(app_id).with_size(900, 700),
        AppId::AiChat => WindowConfig::for_app(app_id).with_size(600, 700),
        AppId::Files => WindowConfig::for_app(app_id).with_size(700, 500),
        AppId::MusicPlayer => WindowConfig::for_app(app_id).with_size(600, 700),
        AppId::CryptoTracker => WindowConfig::for_app(app_id).with_size(800, 600),
        AppId::Bookmarks => WindowConfig::for_app(app_id),
        AppId::Browser | AppId::Google | AppId::Youtube => {
            WindowConfig::for_app(AppId::Browser).with_size(1000, 700)
        }
    }
}

/// URL and title a browser launch resolves to.
///
/// `Google` and `YouTube` are presets of the browser with their own title and home page.
pub fn browser_target(app_id: AppId, url: Option<&str>) -> (String, &'static str) {
    let fallback = match app_id {
        AppId::Youtube => YOUTUBE_URL,
        _ => DEFAULT_BROWSER_URL,
    };
    let title = match app_id {
        AppId::Youtube => "YouTube",
        AppId::Google => "Google",
        _ => "Browser",
    };
    (url.unwrap_or(fallback).to_string(), title)
}

/// Window key and config for a browser window showing `url`.
///
/// Every call mints a fresh time-stamped key. Google and YouTube pages put the title in the key;
/// other pages use the stamp alone.
pub fn browser_window(url: Option<&str>, title: &str, stamp_ms: u64) -> (WindowKey, WindowConfig) {
    let target = url.unwrap_or(DEFAULT_BROWSER_URL);
    let slug = if target.contains("youtube.com") || target.contains("google.com") {
        title
    } else {
        ""
    };
    let config = window_config(AppId::Browser)
        .with_title(title)
        .with_url(target);
    (WindowKey::browser_instance(slug, stamp_ms), config)
}
