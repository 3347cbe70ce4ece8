//! Persisted key-value state: raw backends and the namespaced facade.

pub mod facade;
pub mod prefs;

/// Window geometry snapshots, one map keyed by window key.
pub const WINDOW_POSITIONS_KEY: &str = "windowPositions";
/// Assistant chat transcript.
pub const CHAT_HISTORY_KEY: &str = "aiChatHistory";
/// Task list.
pub const TASKS_KEY: &str = "tasks";
/// Note list.
pub const NOTES_KEY: &str = "notes";
/// Settings app blob.
pub const SETTINGS_KEY: &str = "settings";
/// Desktop icon size preference.
pub const ICON_SIZE_KEY: &str = "iconSize";
/// Symbols tracked by ticker-style widgets.
pub const TRACKED_SYMBOLS_KEY: &str = "trackedCryptos";
