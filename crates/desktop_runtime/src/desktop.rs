//! Desktop composition root: the window manager plus the app stores it launches.

use desktop_app_contract::{AppId, DesktopHost, WindowKey};
use desktop_app_notes::NotesStore;
use desktop_app_settings::SettingsStore;
use desktop_app_tasks::TaskList;
use platform_host::StorageFacade;

use crate::{
    apps::{self, browser_target, browser_window},
    manager::{Clock, WindowManager},
    model::WindowRect,
    reducer::ReducerError,
};

/// Search keywords and the app each one opens. Checked in order.
const SEARCH_KEYWORDS: [(&str, AppId); 10] = [
    ("task", AppId::Tasks),
    ("note", AppId::Notes),
    ("weather", AppId::Weather),
    ("ai", AppId::AiChat),
    ("assistant", AppId::AiChat),
    ("chat", AppId::AiChat),
    ("browser", AppId::Browser),
    ("google", AppId::Browser),
    ("youtube", AppId::Browser),
    ("setting", AppId::Settings),
];

/// What the global search box did with a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query looked like a URL and was opened in a browser window.
    OpenedUrl(WindowKey),
    /// A keyword matched and its app was opened.
    OpenedApp(AppId),
    /// Nothing matched; the assistant window was opened and should receive the query.
    AskAssistant(String),
    /// Blank query.
    Ignored,
}

/// Returns whether the search box treats `query` as a URL.
pub fn looks_like_url(query: &str) -> bool {
    query.contains('.') && (query.contains("http") || !query.contains(' '))
}

/// The running desktop.
///
/// Owns the only instances of the window manager and the app stores, so every app sees the same
/// state. All pieces share one storage facade.
#[derive(Debug)]
pub struct Desktop {
    storage: StorageFacade,
    windows: WindowManager,
    tasks: TaskList,
    notes: NotesStore,
    settings: SettingsStore,
    /// Last stamp minted into a browser window key.
    browser_stamp: u64,
}

impl Desktop {
    pub fn new(storage: StorageFacade, viewport: WindowRect) -> Self {
        let windows = WindowManager::new(storage.clone(), viewport);
        Self::assemble(storage, windows)
    }

    pub fn with_clock(storage: StorageFacade, viewport: WindowRect, clock: Clock) -> Self {
        let windows = WindowManager::with_clock(storage.clone(), viewport, clock);
        Self::assemble(storage, windows)
    }

    fn assemble(storage: StorageFacade, windows: WindowManager) -> Self {
        Self {
            tasks: TaskList::load(storage.clone()),
            notes: NotesStore::load(storage.clone()),
            settings: SettingsStore::load(storage.clone()),
            storage,
            windows,
            browser_stamp: 0,
        }
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut WindowManager {
        &mut self.windows
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskList {
        &mut self.tasks
    }

    pub fn notes(&self) -> &NotesStore {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut NotesStore {
        &mut self.notes
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    pub fn storage(&self) -> &StorageFacade {
        &self.storage
    }

    /// Launches `app_id`, focusing its window if one is already open.
    pub fn launch(&mut self, app_id: AppId) -> Result<WindowKey, ReducerError> {
        self.launch_with_url(app_id, None)
    }

    /// Launches `app_id`; browser apps open `url` when given.
    pub fn launch_with_url(
        &mut self,
        app_id: AppId,
        url: Option<&str>,
    ) -> Result<WindowKey, ReducerError> {
        match app_id {
            AppId::Browser | AppId::Google | AppId::Youtube => {
                let (target, title) = browser_target(app_id, url);
                self.open_browser(Some(&target), title)
            }
            _ => self
                .windows
                .create_window(WindowKey::for_app(app_id), apps::window_config(app_id)),
        }
    }

    /// Opens a new browser window.
    ///
    /// Keys are stamped from the window manager's clock, bumped past the previous stamp so two
    /// opens in the same millisecond still get separate windows.
    pub fn open_browser(
        &mut self,
        url: Option<&str>,
        title: &str,
    ) -> Result<WindowKey, ReducerError> {
        self.browser_stamp = self.windows.now_ms().max(self.browser_stamp + 1);
        let (key, config) = browser_window(url, title, self.browser_stamp);
        self.windows.create_window(key, config)
    }

    /// Opens the `index`-th pinned taskbar app (zero based), as Alt+1..9 does.
    pub fn launch_pinned(&mut self, index: usize) -> Option<Result<WindowKey, ReducerError>> {
        let descriptor = apps::pinned_apps().into_iter().nth(index)?;
        Some(self.launch(descriptor.app_id))
    }

    /// Runs a global search query.
    pub fn search(&mut self, query: &str) -> Result<SearchOutcome, ReducerError> {
        if query.trim().is_empty() {
            return Ok(SearchOutcome::Ignored);
        }
        if looks_like_url(query) {
            let key = self.open_browser(Some(query), "Browser")?;
            return Ok(SearchOutcome::OpenedUrl(key));
        }

        let lower = query.to_lowercase();
        if let Some((_, app_id)) = SEARCH_KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
        {
            self.launch(*app_id)?;
            return Ok(SearchOutcome::OpenedApp(*app_id));
        }

        self.launch(AppId::AiChat)?;
        Ok(SearchOutcome::AskAssistant(query.to_string()))
    }

    /// Advances timers against the window manager's clock: finished close transitions and
    /// debounced autosaves.
    pub fn tick(&mut self) -> Vec<WindowKey> {
        let now_ms = self.windows.now_ms();
        self.notes.poll_autosave(now_ms);
        self.settings.poll_autosave(now_ms);
        self.windows.tick()
    }

    /// Wipes every namespaced key and reloads the stores this desktop owns.
    ///
    /// The chat transcript belongs to the assistant session, which must reload its history after
    /// this returns or its next message rewrites the old transcript.
    pub fn clear_all_data(&mut self) -> bool {
        let cleared = self.settings.clear_all_data();
        self.tasks.reload();
        self.notes = NotesStore::load(self.storage.clone());
        self.windows.reload_positions();
        log::info!("desktop data cleared (ok: {cleared})");
        cleared
    }
}

impl DesktopHost for Desktop {
    fn open_app(&mut self, app_id: AppId) -> Result<WindowKey, String> {
        self.launch(app_id).map_err(|err| err.to_string())
    }

    /// Adds the task and brings up the tasks window if it is not already open.
    fn create_task(&mut self, text: &str) -> Result<(), String> {
        let now = self.windows.now_ms();
        if self.tasks.add(text, now).is_none() {
            return Err("task text is empty".to_string());
        }
        if !self.windows.is_open(&WindowKey::for_app(AppId::Tasks)) {
            self.launch(AppId::Tasks).map_err(|err| err.to_string())?;
        }
        Ok(())
    }
}
