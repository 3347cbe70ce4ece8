//! Taskbar projections of the window list.

use desktop_app_contract::{AppId, WindowKey};

use crate::{apps, model::DesktopState};

/// One running-window button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub key: WindowKey,
    pub title: String,
    pub icon_id: Option<String>,
    pub active: bool,
    pub minimized: bool,
}

/// Open indicator for a pinned shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinnedIndicator {
    pub app_id: AppId,
    pub open: bool,
}

/// Running windows in creation order. Windows in their exit transition are left out.
pub fn taskbar_entries(state: &DesktopState) -> Vec<TaskbarEntry> {
    state
        .windows
        .iter()
        .filter(|w| !w.closing)
        .map(|w| TaskbarEntry {
            key: w.key.clone(),
            title: w.title.clone(),
            icon_id: w.icon_id.clone(),
            active: w.is_active,
            minimized: w.minimized,
        })
        .collect()
}

/// Whether any live window belongs to `app_id`.
///
/// Browser windows are multi-instance, so any `browser*` key counts for the browser.
pub fn app_has_window(state: &DesktopState, app_id: AppId) -> bool {
    let app_key = app_id.as_str();
    state.windows.iter().filter(|w| !w.closing).any(|w| {
        let key = w.key.as_str();
        key == app_key || (app_id == AppId::Browser && key.starts_with("browser_"))
    })
}

pub fn pinned_indicators(state: &DesktopState) -> Vec<PinnedIndicator> {
    apps::pinned_apps()
        .into_iter()
        .map(|descriptor| PinnedIndicator {
            app_id: descriptor.app_id,
            open: app_has_window(state, descriptor.app_id),
        })
        .collect()
}
