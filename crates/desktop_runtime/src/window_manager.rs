//! Shared window-manager transition helpers used by the desktop reducer.

use desktop_app_contract::WindowKey;

use crate::model::{DesktopState, GeometrySnapshot, ResizeEdge, WindowRecord, WindowRect};

/// Focuses and raises `key` with the next z-order value, clearing focus everywhere else.
///
/// Returns `false` when no window has that key.
pub fn focus_window_internal(state: &mut DesktopState, key: &WindowKey) -> bool {
    if !state.windows.iter().any(|w| &w.key == key) {
        return false;
    }

    let z_index = state.next_z_index;
    state.next_z_index += 1;
    for window in &mut state.windows {
        if &window.key == key {
            window.z_index = z_index;
            window.is_active = true;
            window.minimized = false;
        } else {
            window.is_active = false;
        }
    }
    true
}

/// Applies resize deltas for a given edge/corner drag.
///
/// Sizes are floored at `min_w`/`min_h`. When a left or top edge is dragged past the floor, the
/// opposite edge stays where it was.
pub fn resize_rect(
    start: WindowRect,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
    min_w: i32,
    min_h: i32,
) -> WindowRect {
    let raw = match edge {
        ResizeEdge::East => WindowRect {
            w: start.w + dx,
            ..start
        },
        ResizeEdge::West => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            ..start
        },
        ResizeEdge::South => WindowRect {
            h: start.h + dy,
            ..start
        },
        ResizeEdge::North => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            ..start
        },
        ResizeEdge::NorthEast => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            w: start.w + dx,
            ..start
        },
        ResizeEdge::NorthWest => WindowRect {
            x: start.x + dx,
            y: start.y + dy,
            w: start.w - dx,
            h: start.h - dy,
        },
        ResizeEdge::SouthEast => WindowRect {
            w: start.w + dx,
            h: start.h + dy,
            ..start
        },
        ResizeEdge::SouthWest => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            h: start.h + dy,
            ..start
        },
    };

    let w = raw.w.max(min_w);
    let h = raw.h.max(min_h);
    WindowRect {
        x: if edge.moves_left_edge() {
            start.x + start.w - w
        } else {
            raw.x
        },
        y: if edge.moves_top_edge() {
            start.y + start.h - h
        } else {
            raw.y
        },
        w,
        h,
    }
}

/// Builds the snapshot written when `window` is closed or explicitly saved.
///
/// A maximized window keeps whatever pre-maximize geometry was already stored and only gains the
/// flag.
pub fn snapshot_for(window: &WindowRecord, existing: Option<GeometrySnapshot>) -> GeometrySnapshot {
    if window.maximized {
        GeometrySnapshot {
            maximized: true,
            ..existing.unwrap_or_default()
        }
    } else {
        GeometrySnapshot::from_rect(window.rect)
    }
}

/// Applies a stored snapshot to a freshly built window.
///
/// Maximized snapshots only set the flag; the rect stays the restore target.
pub fn apply_snapshot(window: &mut WindowRecord, snapshot: GeometrySnapshot) {
    if snapshot.maximized {
        window.maximized = true;
    } else {
        window.rect = snapshot.apply_to(window.rect);
    }
}

/// Returns the rect `window` currently occupies on screen.
///
/// `WindowRecord::rect` is the normal geometry; a maximized window fills the viewport instead.
pub fn displayed_rect(viewport: WindowRect, window: &WindowRecord) -> WindowRect {
    if window.maximized {
        WindowRect {
            w: viewport.w.max(window.min_width),
            h: viewport.h.max(window.min_height),
            ..viewport
        }
    } else {
        window.rect
    }
}
