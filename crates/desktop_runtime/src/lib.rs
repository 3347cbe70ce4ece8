//! Headless desktop runtime: window manager state, reducer, geometry persistence, taskbar
//! projections, the app registry, and the [`Desktop`] composition root.

pub mod apps;
pub mod desktop;
pub mod manager;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod taskbar;
pub mod window_manager;

pub use desktop::{looks_like_url, Desktop, SearchOutcome};
pub use manager::{Clock, WindowManager};
pub use model::*;
pub use persistence::{load_window_positions, persist_window_positions};
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use taskbar::{PinnedIndicator, TaskbarEntry};
