//! Settings app state: shell preferences, desktop icon size, tracked ticker symbols, and the
//! clear-all-data action.

use desktop_app_contract::{AppId, WindowConfig};
use platform_host::{
    Debouncer, StorageFacade, ICON_SIZE_KEY, SETTINGS_KEY, TRACKED_SYMBOLS_KEY,
};
use serde::{Deserialize, Serialize};

/// Delay between the last text edit and the settings write.
pub const SETTINGS_SAVE_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: String,
    pub animations: bool,
    pub auto_save: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            animations: true,
            auto_save: true,
        }
    }
}

/// Boolean settings exposed as toggle switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingToggle {
    Animations,
    AutoSave,
}

/// Desktop icon size preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl IconSize {
    /// Icon edge length in pixels.
    pub const fn pixels(self) -> u32 {
        match self {
            Self::Small => 48,
            Self::Medium => 64,
            Self::Large => 80,
        }
    }
}

/// A symbol followed by ticker widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedSymbol {
    pub symbol: String,
    pub name: String,
}

/// Symbols tracked when nothing has been persisted.
pub fn default_tracked_symbols() -> Vec<TrackedSymbol> {
    [
        ("BTC", "Bitcoin"),
        ("ETH", "Ethereum"),
        ("BNB", "Binance Coin"),
        ("SOL", "Solana"),
        ("ADA", "Cardano"),
    ]
    .into_iter()
    .map(|(symbol, name)| TrackedSymbol {
        symbol: symbol.to_string(),
        name: name.to_string(),
    })
    .collect()
}

/// Window parameters for the settings app.
pub fn window_config() -> WindowConfig {
    WindowConfig::for_app(AppId::Settings).with_size(700, 600)
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    storage: StorageFacade,
    settings: Settings,
    pending: Debouncer<()>,
}

impl SettingsStore {
    pub fn load(storage: StorageFacade) -> Self {
        let settings = storage.get(SETTINGS_KEY, Settings::default());
        Self {
            storage,
            settings,
            pending: Debouncer::new(SETTINGS_SAVE_DELAY_MS),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Flips a toggle and saves immediately.
    pub fn toggle(&mut self, toggle: SettingToggle) -> bool {
        let slot = match toggle {
            SettingToggle::Animations => &mut self.settings.animations,
            SettingToggle::AutoSave => &mut self.settings.auto_save,
        };
        *slot = !*slot;
        let value = *slot;
        self.save_now();
        value
    }

    /// Records a theme-name edit; the write is debounced.
    pub fn edit_theme(&mut self, theme: &str, now_ms: u64) {
        self.settings.theme = theme.trim().to_string();
        self.pending.schedule((), now_ms);
    }

    /// Writes pending edits once the delay has passed. Returns whether a write happened.
    pub fn poll_autosave(&mut self, now_ms: u64) -> bool {
        if self.pending.poll(now_ms).is_some() {
            self.save_now();
            true
        } else {
            false
        }
    }

    pub fn icon_size(&self) -> IconSize {
        self.storage.get(ICON_SIZE_KEY, IconSize::default())
    }

    pub fn set_icon_size(&self, size: IconSize) -> bool {
        self.storage.set(ICON_SIZE_KEY, &size)
    }

    pub fn tracked_symbols(&self) -> Vec<TrackedSymbol> {
        self.storage
            .get(TRACKED_SYMBOLS_KEY, default_tracked_symbols())
    }

    pub fn set_tracked_symbols(&self, symbols: &[TrackedSymbol]) -> bool {
        self.storage.set(TRACKED_SYMBOLS_KEY, symbols)
    }

    /// Starts tracking `symbol`, upper-cased. Returns `false` for blank or already tracked symbols.
    pub fn add_tracked_symbol(&self, symbol: &str) -> bool {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return false;
        }
        let mut symbols = self.tracked_symbols();
        if symbols.iter().any(|tracked| tracked.symbol == symbol) {
            log::debug!("{symbol} is already tracked");
            return false;
        }
        symbols.push(TrackedSymbol {
            symbol,
            name: String::new(),
        });
        self.set_tracked_symbols(&symbols)
    }

    /// Stops tracking `symbol`. Returns whether it was tracked.
    pub fn remove_tracked_symbol(&self, symbol: &str) -> bool {
        let symbol = symbol.trim().to_uppercase();
        let mut symbols = self.tracked_symbols();
        let before = symbols.len();
        symbols.retain(|tracked| tracked.symbol != symbol);
        if symbols.len() == before {
            return false;
        }
        self.set_tracked_symbols(&symbols)
    }

    /// Removes every namespaced key, then writes default settings back.
    ///
    /// Other components hold their own in-memory copies; the host is expected to reload them.
    pub fn clear_all_data(&mut self) -> bool {
        self.pending.cancel();
        let cleared = self.storage.clear();
        self.settings = Settings::default();
        self.save_now();
        cleared
    }

    fn save_now(&mut self) {
        self.pending.cancel();
        self.storage.set(SETTINGS_KEY, &self.settings);
    }
}
