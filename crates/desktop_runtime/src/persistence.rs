//! Window geometry persistence through the storage facade.

use platform_host::{StorageFacade, WINDOW_POSITIONS_KEY};

use crate::model::WindowPositions;

/// Loads every stored window snapshot. Missing or unreadable data yields an empty map.
pub fn load_window_positions(storage: &StorageFacade) -> WindowPositions {
    storage.get(WINDOW_POSITIONS_KEY, WindowPositions::new())
}

/// Writes the whole snapshot map. Returns `false` when the backend rejected the write.
pub fn persist_window_positions(storage: &StorageFacade, positions: &WindowPositions) -> bool {
    let saved = storage.set(WINDOW_POSITIONS_KEY, positions);
    if !saved {
        log::warn!(
            "window positions were not persisted ({} entries)",
            positions.len()
        );
    }
    saved
}
