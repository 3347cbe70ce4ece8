//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use desktop_app_contract::WindowKey;
use thiserror::Error;

use crate::model::{
    DesktopState, DragSession, GeometrySnapshot, InteractionState, OpenWindowRequest,
    PointerPosition, ResizeEdge, ResizeSession, WindowRecord, WindowRect, CLOSE_TRANSITION_MS,
};
use crate::window_manager::{apply_snapshot, focus_window_internal, resize_rect, snapshot_for};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window, or focus it when one with the same key is already open.
    OpenWindow(OpenWindowRequest),
    /// Focus (and raise) a window.
    FocusWindow {
        /// Window to focus.
        key: WindowKey,
    },
    /// Minimize a window. It keeps its taskbar entry.
    MinimizeWindow {
        /// Window to minimize.
        key: WindowKey,
    },
    /// Maximize a normal window, or restore a maximized one.
    ToggleMaximize {
        /// Window to toggle.
        key: WindowKey,
    },
    /// Record the window's geometry snapshot.
    SaveWindowPosition {
        /// Window to snapshot.
        key: WindowKey,
    },
    /// Re-apply the stored snapshot to an open window.
    RestoreWindowPosition {
        /// Window to restore.
        key: WindowKey,
    },
    /// Snapshot geometry and start the exit transition.
    CloseWindow {
        /// Window to close.
        key: WindowKey,
    },
    /// Remove a window whose exit transition has finished.
    CompleteClose {
        /// Window to remove.
        key: WindowKey,
    },
    /// Taskbar click: un-minimize and focus.
    ActivateTaskbarEntry {
        /// Window associated with the taskbar button.
        key: WindowKey,
    },
    /// Begin dragging a window by its title bar.
    BeginMove {
        /// Window being dragged.
        key: WindowKey,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window drag.
    EndMove,
    /// Begin resizing a window.
    BeginResize {
        /// Window being resized.
        key: WindowKey,
        /// Edge or corner being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window resize.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window resize.
    EndResize,
    /// Replace the area windows are centered in and maximized to.
    SetViewport {
        /// New desktop area.
        viewport: WindowRect,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host to execute.
pub enum RuntimeEffect {
    /// Write the geometry snapshot map to storage.
    PersistGeometry,
    /// Call back with [`DesktopAction::CompleteClose`] once `delay_ms` has passed.
    ScheduleRemoval {
        /// Window being closed.
        key: WindowKey,
        /// Exit transition length.
        delay_ms: u64,
    },
    /// Taskbar entries changed.
    RefreshTaskbar,
    /// Move keyboard focus into the window's primary input.
    FocusWindowInput(WindowKey),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions.
pub enum ReducerError {
    /// No open window has this key.
    #[error("window not found: {0}")]
    WindowNotFound(WindowKey),
}

/// Applies a [`DesktopAction`] to the desktop runtime state and collects resulting side effects.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a key that is not open.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            if let Some(existing) = state.window(&req.key) {
                if !existing.closing {
                    focus(state, &req.key)?;
                    effects.push(RuntimeEffect::RefreshTaskbar);
                    effects.push(RuntimeEffect::FocusWindowInput(req.key));
                    return Ok(effects);
                }
                state.windows.retain(|w| w.key != req.key);
            }

            let record = build_window(state, req);
            let key = record.key.clone();
            state.windows.push(record);
            focus(state, &key)?;
            effects.push(RuntimeEffect::RefreshTaskbar);
            effects.push(RuntimeEffect::FocusWindowInput(key));
        }
        DesktopAction::FocusWindow { key } => {
            focus(state, &key)?;
            effects.push(RuntimeEffect::RefreshTaskbar);
            effects.push(RuntimeEffect::FocusWindowInput(key));
        }
        DesktopAction::MinimizeWindow { key } => {
            let window = find_window_mut(state, &key)?;
            window.minimized = true;
            window.is_active = false;
            effects.push(RuntimeEffect::RefreshTaskbar);
        }
        DesktopAction::ToggleMaximize { key } => {
            let (maximized, rect) = {
                let window = find_window(state, &key)?;
                (window.maximized, window.rect)
            };
            if maximized {
                let stored = state.positions.get(&key).copied();
                let window = find_window_mut(state, &key)?;
                window.maximized = false;
                if let Some(snapshot) = stored {
                    window.rect = snapshot.apply_to(window.rect);
                }
            } else {
                state
                    .positions
                    .insert(key.clone(), GeometrySnapshot::from_rect(rect));
                find_window_mut(state, &key)?.maximized = true;
                effects.push(RuntimeEffect::PersistGeometry);
            }
        }
        DesktopAction::SaveWindowPosition { key } => {
            save_position(state, &key)?;
            effects.push(RuntimeEffect::PersistGeometry);
        }
        DesktopAction::RestoreWindowPosition { key } => {
            let stored = state.positions.get(&key).copied();
            let window = find_window_mut(state, &key)?;
            if let Some(snapshot) = stored {
                apply_snapshot(window, snapshot);
            }
        }
        DesktopAction::CloseWindow { key } => {
            if find_window(state, &key)?.closing {
                return Ok(effects);
            }
            save_position(state, &key)?;
            let window = find_window_mut(state, &key)?;
            window.closing = true;
            window.is_active = false;
            clear_sessions_for(interaction, &key);
            effects.push(RuntimeEffect::PersistGeometry);
            effects.push(RuntimeEffect::ScheduleRemoval {
                key,
                delay_ms: CLOSE_TRANSITION_MS,
            });
        }
        DesktopAction::CompleteClose { key } => {
            let before_len = state.windows.len();
            state.windows.retain(|w| !(w.key == key && w.closing));
            if state.windows.len() == before_len {
                return Err(ReducerError::WindowNotFound(key));
            }
            effects.push(RuntimeEffect::RefreshTaskbar);
        }
        DesktopAction::ActivateTaskbarEntry { key } => {
            find_window_mut(state, &key)?.minimized = false;
            focus(state, &key)?;
            effects.push(RuntimeEffect::RefreshTaskbar);
            effects.push(RuntimeEffect::FocusWindowInput(key));
        }
        DesktopAction::BeginMove { key, pointer } => {
            let rect_start = find_window(state, &key)?.rect;
            focus(state, &key)?;
            interaction.dragging = Some(DragSession {
                key,
                pointer_start: pointer,
                rect_start,
            });
            effects.push(RuntimeEffect::RefreshTaskbar);
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let window = find_window_mut(state, &session.key)?;
                if !window.maximized {
                    window.rect = session.rect_start.offset(dx, dy);
                }
            }
        }
        DesktopAction::EndMove => {
            interaction.dragging = None;
        }
        DesktopAction::BeginResize { key, edge, pointer } => {
            let rect_start = find_window(state, &key)?.rect;
            focus(state, &key)?;
            interaction.resizing = Some(ResizeSession {
                key,
                edge,
                pointer_start: pointer,
                rect_start,
            });
            effects.push(RuntimeEffect::RefreshTaskbar);
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let window = find_window_mut(state, &session.key)?;
                if !window.maximized {
                    window.rect = resize_rect(
                        session.rect_start,
                        session.edge,
                        dx,
                        dy,
                        window.min_width,
                        window.min_height,
                    );
                }
            }
        }
        DesktopAction::EndResize => {
            interaction.resizing = None;
        }
        DesktopAction::SetViewport { viewport } => {
            state.viewport = viewport;
        }
    }

    Ok(effects)
}

fn build_window(state: &DesktopState, req: OpenWindowRequest) -> WindowRecord {
    let OpenWindowRequest { key, config } = req;
    let mut record = WindowRecord {
        title: config.title.unwrap_or_else(|| key.as_str().to_string()),
        icon_id: config.icon_id,
        css_class: config.css_class,
        url: config.url,
        rect: state.viewport.centered(config.width, config.height),
        min_width: config.min_width,
        min_height: config.min_height,
        z_index: 0,
        is_active: false,
        minimized: false,
        maximized: false,
        closing: false,
        key,
    };
    if let Some(snapshot) = state.positions.get(&record.key).copied() {
        apply_snapshot(&mut record, snapshot);
    }
    record
}

fn save_position(state: &mut DesktopState, key: &WindowKey) -> Result<(), ReducerError> {
    let existing = state.positions.get(key).copied();
    let snapshot = snapshot_for(find_window(state, key)?, existing);
    state.positions.insert(key.clone(), snapshot);
    Ok(())
}

fn focus(state: &mut DesktopState, key: &WindowKey) -> Result<(), ReducerError> {
    if focus_window_internal(state, key) {
        Ok(())
    } else {
        Err(ReducerError::WindowNotFound(key.clone()))
    }
}

fn clear_sessions_for(interaction: &mut InteractionState, key: &WindowKey) {
    if interaction.dragging.as_ref().is_some_and(|s| &s.key == key) {
        interaction.dragging = None;
    }
    if interaction.resizing.as_ref().is_some_and(|s| &s.key == key) {
        interaction.resizing = None;
    }
}

fn find_window<'a>(
    state: &'a DesktopState,
    key: &WindowKey,
) -> Result<&'a WindowRecord, ReducerError> {
    state
        .window(key)
        .ok_or_else(|| ReducerError::WindowNotFound(key.clone()))
}

fn find_window_mut<'a>(
    state: &'a mut DesktopState,
    key: &WindowKey,
) -> Result<&'a mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| &w.key == key)
        .ok_or_else(|| ReducerError::WindowNotFound(key.clone()))
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::WindowConfig;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::FIRST_Z_INDEX;

    const VIEWPORT: WindowRect = WindowRect {
        x: 0,
        y: 0,
        w: 1200,
        h: 900,
    };

    fn state() -> DesktopState {
        DesktopState {
            viewport: VIEWPORT,
            ..DesktopState::default()
        }
    }

    fn open(
        state: &mut DesktopState,
        interaction: &mut InteractionState,
        key: &str,
    ) -> Vec<RuntimeEffect> {
        reduce_desktop(
            state,
            interaction,
            DesktopAction::OpenWindow(OpenWindowRequest::new(
                WindowKey::new(key),
                WindowConfig::default(),
            )),
        )
        .expect("open window")
    }

    fn act(
        state: &mut DesktopState,
        interaction: &mut InteractionState,
        action: DesktopAction,
    ) -> Vec<RuntimeEffect> {
        reduce_desktop(state, interaction, action).expect("action")
    }

    fn key(raw: &str) -> WindowKey {
        WindowKey::new(raw)
    }

    #[test]
    fn open_window_centers_focuses_and_counts_z_from_first_value() {
        let mut state = state();
        let mut interaction = InteractionState::default();

        let effects = open(&mut state, &mut interaction, "tasks");

        let window = state.window(&key("tasks")).unwrap();
        assert_eq!(
            window.rect,
            WindowRect {
                x: 300,
                y: 133,
                w: 600,
                h: 500
            }
        );
        assert_eq!(window.title, "tasks");
        assert_eq!(window.z_index, FIRST_Z_INDEX);
        assert!(window.is_active);
        assert!(effects.contains(&RuntimeEffect::RefreshTaskbar));
        assert!(effects.contains(&RuntimeEffect::FocusWindowInput(key("tasks"))));
    }

    #[test]
    fn last_focused_window_has_highest_z_and_is_only_active_one() {
        let mut state = state();
        let mut interaction = InteractionState::default();
        open(&mut state, &mut interaction, "tasks");
        open(&mut state, &mut interaction, "notes");
        open(&mut state, &mut interaction, "weather");

        act(
            &mut state,
            &mut interaction,
            DesktopAction::FocusWindow { key: key("tasks") },
        );

        assert_eq!(state.front_most().unwrap().key, key("tasks"));
        assert_eq!(state.active_window_key(), Some(&key("tasks")));
        assert_eq!(state.windows.iter().filter(|w| w.is_active).count(), 1);
        let mut z: Vec<u64> = state.windows.iter().map(|w| w.z_index).collect();
        z.dedup();
        assert_eq!(z.len(), 3);
    }

    #[test]
    fn opening_an_open_key_only_refocuses() {
        let mut state = state();
        let mut interaction = InteractionState::default();
        open(&mut state, &mut interaction, "notes");
        open(&mut state, &mut interaction, "tasks");

        open(&mut state, &mut interaction, "notes");

        assert_eq!(state.windows.len(), 2);
        assert_eq!(state.front_most().unwrap().key, key("notes"));
    }

    #[test]
    fn close_then_reopen_restores_saved_geometry() {
        let mut state = state();
        let mut interaction = InteractionState::default();
        open(&mut state, &mut interaction, "notes");
        act(
            &mut state,
            &mut interaction,
            DesktopAction::BeginMove {
                key: key("notes"),
                pointer: PointerPosition { x: 0, y: 0 },
            },
        );
        act(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateMove {
                pointer: PointerPosition { x: -250, y: -100 },
            },
        );
        act(&mut state, &mut interaction, DesktopAction::EndMove);
        let moved = state.window(&key("notes")).unwrap().rect;

        let effects = act(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { key: key("notes") },
        );
        assert!(effects.contains(&RuntimeEffect::PersistGeometry));
        assert!(effects.contains(&RuntimeEffect::ScheduleRemoval {
            key: key("notes"),
            delay_ms: CLOSE_TRANSITION_MS,
        }));
        assert!(state.window(&key("notes")).unwrap().closing);

        act(
            &mut state,
            &mut interaction,
            DesktopAction::CompleteClose { key: key("notes") },
        );
        assert!(state.windows.is_empty());

        open(&mut state, &mut interaction, "notes");
        assert_eq!(state.window(&key("notes")).unwrap().rect, moved);
    }

    #[test]
    fn closing_maximized_window_reopens_maximized_with_prior_geometry() {
        let mut state = state();
        let mut interaction = InteractionState::default();
        open(&mut state, &mut interaction, "browser");
        let normal = state.window(&key("browser")).unwrap().rect;

        act(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleMaximize {
                key: key("browser"),
            },
        );
        act(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow {
                key: key("browser"),
            },
        );
        let snapshot = state.positions[&key("browser")];
        assert!(snapshot.maximized);
        assert_eq!(snapshot.left, Some(normal.x));

        act(
            &mut state,
            &mut interaction,
            DesktopAction::CompleteClose {
                key: key("browser"),
            },
        );
        open(&mut state, &mut interaction, "browser");
        assert!(state.window(&key("browser")).unwrap().maximized);

        act(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleMaximize {
                key: key("browser"),
            },
        );
        let window = state.window(&key("browser")).unwrap();
        assert!(!window.maximized);
        assert_eq!(window.rect, normal);
    }

    #[test]
    fn reopening_while_closing_replaces_the_old_record() {
        let mut state = state();
        let mut interaction = InteractionState::default();
        open(&mut state, &mut interaction, "tasks");
        act(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { key: key("tasks") },
        );

        open(&mut state, &mut interaction, "tasks");
        let window = state.window(&key("tasks")).unwrap();
        assert!(!window.closing);
        assert_eq!(state.windows.len(), 1);

        let err = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::CompleteClose { key: key("tasks") },
        )
        .unwrap_err();
        assert_eq!(err, ReducerError::WindowNotFound(key("tasks")));
        assert_eq!(state.windows.len(), 1);
    }

    #[test]
    fn minimize_keeps_window_and_taskbar_activation_restores_it() {
        let mut state = state();
        let mut interaction = InteractionState::default();
        open(&mut state, &mut interaction, "tasks");
        act(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow { key: key("tasks") },
        );

        let window = state.window(&key("tasks")).unwrap();
        assert!(window.minimized);
        assert!(!window.is_active);
        let z_before = window.z_index;

        act(
            &mut state,
            &mut interaction,
            DesktopAction::ActivateTaskbarEntry { key: key("tasks") },
        );
        let window = state.window(&key("tasks")).unwrap();
        assert!(!window.minimized);
        assert!(window.is_active);
        assert!(window.z_index > z_before);
    }

    #[test]
    fn maximized_windows_ignore_drag_and_resize() {
        let mut state = state();
        let mut interaction = InteractionState::default();
        open(&mut state, &mut interaction, "tasks");
        act(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleMaximize { key: key("tasks") },
        );
        let before = state.window(&key("tasks")).unwrap().rect;

        act(
            &mut state,
            &mut interaction,
            DesktopAction::BeginResize {
                key: key("tasks"),
                edge: ResizeEdge::SouthEast,
                pointer: PointerPosition { x: 0, y: 0 },
            },
        );
        act(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateResize {
                pointer: PointerPosition { x: 80, y: 80 },
            },
        );
        assert_eq!(state.window(&key("tasks")).unwrap().rect, before);
    }

    #[test]
    fn resize_respects_window_minimum() {
        let mut state = state();
        let mut interaction = InteractionState::default();
        open(&mut state, &mut interaction, "tasks");
        act(
            &mut state,
            &mut interaction,
            DesktopAction::BeginResize {
                key: key("tasks"),
                edge: ResizeEdge::East,
                pointer: PointerPosition { x: 0, y: 0 },
            },
        );
        act(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateResize {
                pointer: PointerPosition { x: -1000, y: 0 },
            },
        );
        act(&mut state, &mut interaction, DesktopAction::EndResize);

        assert_eq!(state.window(&key("tasks")).unwrap().rect.w, 300);
        assert_eq!(interaction.resizing, None);
    }

    #[test]
    fn unknown_keys_are_reported() {
        let mut state = state();
        let mut interaction = InteractionState::default();
        let err = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::FocusWindow { key: key("ghost") },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "window not found: ghost");
    }
}
