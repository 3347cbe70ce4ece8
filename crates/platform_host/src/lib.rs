//! Host-side services shared by the desktop runtime and its apps.
//!
//! This crate owns the persistence boundary: raw key-value backends ([`PrefsStore`]
//! implementations) and the namespaced [`StorageFacade`] every other component goes through.
//! It also carries the small time and debounce helpers apps use for ids and autosave.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod debounce;
pub mod storage;
pub mod time;

pub use debounce::Debouncer;
pub use storage::facade::{StorageFacade, DEFAULT_NAMESPACE};
pub use storage::prefs::{FilePrefsStore, MemoryPrefsStore, NoopPrefsStore, PrefsStore};
pub use storage::{
    CHAT_HISTORY_KEY, ICON_SIZE_KEY, NOTES_KEY, SETTINGS_KEY, TASKS_KEY, TRACKED_SYMBOLS_KEY,
    WINDOW_POSITIONS_KEY,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
