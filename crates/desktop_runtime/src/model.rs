use std::collections::BTreeMap;

use desktop_app_contract::{WindowConfig, WindowKey};
use serde::{Deserialize, Serialize};

/// First z-order value handed out. Lower values are reserved for desktop chrome.
pub const FIRST_Z_INDEX: u64 = 100;
/// Length of the window exit transition before a closed window is removed.
pub const CLOSE_TRANSITION_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Centers a `w`x`h` window horizontally and a third of the way down `self`.
    pub fn centered(self, w: i32, h: i32) -> Self {
        Self {
            x: self.x + (self.w - w) / 2,
            y: self.y + (self.h - h) / 3,
            w,
            h,
        }
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            w: 1280,
            h: 800,
        }
    }
}

/// Persisted geometry for one window key.
///
/// Coordinates are optional: a window that was closed while maximized without ever being
/// restored only records the flag. When the flag is set, the coordinates are the pre-maximize
/// geometry used when the window is restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeometrySnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(default)]
    pub maximized: bool,
}

impl GeometrySnapshot {
    pub fn from_rect(rect: WindowRect) -> Self {
        Self {
            left: Some(rect.x),
            top: Some(rect.y),
            width: Some(rect.w),
            height: Some(rect.h),
            maximized: false,
        }
    }

    /// Overlays every recorded coordinate onto `rect`.
    pub fn apply_to(&self, rect: WindowRect) -> WindowRect {
        WindowRect {
            x: self.left.unwrap_or(rect.x),
            y: self.top.unwrap_or(rect.y),
            w: self.width.filter(|w| *w > 0).unwrap_or(rect.w),
            h: self.height.filter(|h| *h > 0).unwrap_or(rect.h),
        }
    }
}

/// Snapshots for every window key ever saved.
pub type WindowPositions = BTreeMap<WindowKey, GeometrySnapshot>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub key: WindowKey,
    pub title: String,
    pub icon_id: Option<String>,
    pub css_class: Option<String>,
    pub url: Option<String>,
    pub rect: WindowRect,
    pub min_width: i32,
    pub min_height: i32,
    pub z_index: u64,
    pub is_active: bool,
    pub minimized: bool,
    pub maximized: bool,
    /// Exit transition running; the record is removed when it completes.
    pub closing: bool,
}

impl WindowRecord {
    pub fn visible(&self) -> bool {
        !self.minimized && !self.closing
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopState {
    /// Open windows in creation order (taskbar order). Stacking is `z_index`, not position.
    pub windows: Vec<WindowRecord>,
    /// Next z-order value. Only ever increases.
    pub next_z_index: u64,
    /// Area windows are centered in and maximized to.
    pub viewport: WindowRect,
    pub positions: WindowPositions,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            next_z_index: FIRST_Z_INDEX,
            viewport: WindowRect::default(),
            positions: WindowPositions::new(),
        }
    }
}

impl DesktopState {
    pub fn with_positions(viewport: WindowRect, positions: WindowPositions) -> Self {
        Self {
            viewport,
            positions,
            ..Self::default()
        }
    }

    pub fn window(&self, key: &WindowKey) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.key == key)
    }

    pub fn active_window_key(&self) -> Option<&WindowKey> {
        self.windows.iter().find(|w| w.is_active).map(|w| &w.key)
    }

    /// Window with the highest z-order value.
    pub fn front_most(&self) -> Option<&WindowRecord> {
        self.windows.iter().max_by_key(|w| w.z_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub key: WindowKey,
    pub config: WindowConfig,
}

impl OpenWindowRequest {
    pub fn new(key: impl Into<WindowKey>, config: WindowConfig) -> Self {
        Self {
            key: key.into(),
            config,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    pub fn moves_left_edge(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    pub fn moves_top_edge(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub key: WindowKey,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub key: WindowKey,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
}
