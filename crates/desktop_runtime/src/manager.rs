//! Window manager service: owns the reducer state and executes its effects.
//!
//! The reducer stays pure. [`WindowManager::dispatch`] runs it and then drains the returned
//! [`RuntimeEffect`] values in order: geometry writes go to the storage facade, scheduled
//! removals are queued against the injected clock and completed by [`WindowManager::tick`].

use std::{fmt, rc::Rc};

use desktop_app_contract::{WindowConfig, WindowKey};
use platform_host::{unix_time_ms_now, StorageFacade};

use crate::{
    model::{
        DesktopState, GeometrySnapshot, InteractionState, OpenWindowRequest, PointerPosition,
        ResizeEdge, WindowRecord, WindowRect,
    },
    persistence::{load_window_positions, persist_window_positions},
    reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect},
    taskbar::{pinned_indicators, taskbar_entries, PinnedIndicator, TaskbarEntry},
    window_manager::displayed_rect,
};

/// Millisecond clock used for scheduling.
pub type Clock = Rc<dyn Fn() -> u64>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingRemoval {
    key: WindowKey,
    due_ms: u64,
}

pub struct WindowManager {
    state: DesktopState,
    interaction: InteractionState,
    storage: StorageFacade,
    clock: Clock,
    pending_removals: Vec<PendingRemoval>,
    taskbar_revision: u64,
    input_focus: Option<WindowKey>,
}

impl fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowManager")
            .field("state", &self.state)
            .field("pending_removals", &self.pending_removals)
            .field("taskbar_revision", &self.taskbar_revision)
            .finish_non_exhaustive()
    }
}

impl WindowManager {
    /// Creates a manager using wall-clock time, loading stored geometry snapshots.
    pub fn new(storage: StorageFacade, viewport: WindowRect) -> Self {
        Self::with_clock(storage, viewport, Rc::new(unix_time_ms_now))
    }

    pub fn with_clock(storage: StorageFacade, viewport: WindowRect, clock: Clock) -> Self {
        let positions = load_window_positions(&storage);
        Self {
            state: DesktopState::with_positions(viewport, positions),
            interaction: InteractionState::default(),
            storage,
            clock,
            pending_removals: Vec::new(),
            taskbar_revision: 0,
            input_focus: None,
        }
    }

    /// Re-reads geometry snapshots from storage, dropping the in-memory map.
    pub fn reload_positions(&mut self) {
        self.state.positions = load_window_positions(&self.storage);
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn now_ms(&self) -> u64 {
        (self.clock)()
    }

    /// Runs `action` through the reducer and executes the resulting effects.
    pub fn dispatch(&mut self, action: DesktopAction) -> Result<(), ReducerError> {
        let effects = reduce_desktop(&mut self.state, &mut self.interaction, action)?;
        for effect in effects {
            self.run_effect(effect);
        }
        Ok(())
    }

    fn run_effect(&mut self, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::PersistGeometry => {
                persist_window_positions(&self.storage, &self.state.positions);
            }
            RuntimeEffect::ScheduleRemoval { key, delay_ms } => {
                let due_ms = self.now_ms() + delay_ms;
                self.pending_removals.retain(|p| p.key != key);
                self.pending_removals.push(PendingRemoval { key, due_ms });
            }
            RuntimeEffect::RefreshTaskbar => {
                self.taskbar_revision += 1;
            }
            RuntimeEffect::FocusWindowInput(key) => {
                self.input_focus = Some(key);
            }
        }
    }

    /// Opens a window or focuses the existing one with the same key.
    pub fn create_window(
        &mut self,
        key: WindowKey,
        config: WindowConfig,
    ) -> Result<WindowKey, ReducerError> {
        self.pending_removals.retain(|p| p.key != key);
        self.dispatch(DesktopAction::OpenWindow(OpenWindowRequest::new(
            key.clone(),
            config,
        )))?;
        Ok(key)
    }

    pub fn focus_window(&mut self, key: &WindowKey) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::FocusWindow { key: key.clone() })
    }

    pub fn minimize_window(&mut self, key: &WindowKey) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::MinimizeWindow { key: key.clone() })
    }

    /// Maximizes a normal window or restores a maximized one.
    pub fn maximize_window(&mut self, key: &WindowKey) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::ToggleMaximize { key: key.clone() })
    }

    /// Starts the exit transition; the record disappears on the first [`Self::tick`] after it.
    pub fn close_window(&mut self, key: &WindowKey) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::CloseWindow { key: key.clone() })
    }

    /// Removes a closing window immediately.
    pub fn complete_close(&mut self, key: &WindowKey) -> Result<(), ReducerError> {
        self.pending_removals.retain(|p| &p.key != key);
        self.dispatch(DesktopAction::CompleteClose { key: key.clone() })
    }

    pub fn save_window_position(&mut self, key: &WindowKey) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::SaveWindowPosition { key: key.clone() })
    }

    pub fn restore_window_position(&mut self, key: &WindowKey) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::RestoreWindowPosition { key: key.clone() })
    }

    pub fn activate_taskbar_entry(&mut self, key: &WindowKey) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::ActivateTaskbarEntry { key: key.clone() })
    }

    pub fn begin_move(
        &mut self,
        key: &WindowKey,
        pointer: PointerPosition,
    ) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::BeginMove {
            key: key.clone(),
            pointer,
        })
    }

    pub fn update_move(&mut self, pointer: PointerPosition) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::UpdateMove { pointer })
    }

    pub fn end_move(&mut self) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::EndMove)
    }

    pub fn begin_resize(
        &mut self,
        key: &WindowKey,
        edge: ResizeEdge,
        pointer: PointerPosition,
    ) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::BeginResize {
            key: key.clone(),
            edge,
            pointer,
        })
    }

    pub fn update_resize(&mut self, pointer: PointerPosition) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::UpdateResize { pointer })
    }

    pub fn end_resize(&mut self) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::EndResize)
    }

    pub fn set_viewport(&mut self, viewport: WindowRect) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::SetViewport { viewport })
    }

    /// Completes every removal whose transition has elapsed. Returns the removed keys.
    pub fn tick(&mut self) -> Vec<WindowKey> {
        let now = self.now_ms();
        let (due, waiting): (Vec<_>, Vec<_>) = self
            .pending_removals
            .drain(..)
            .partition(|p| p.due_ms <= now);
        self.pending_removals = waiting;

        let mut removed = Vec::new();
        for PendingRemoval { key, .. } in due {
            match self.dispatch(DesktopAction::CompleteClose { key: key.clone() }) {
                Ok(()) => removed.push(key),
                Err(err) => log::debug!("skipping scheduled removal: {err}"),
            }
        }
        removed
    }

    pub fn has_pending_removals(&self) -> bool {
        !self.pending_removals.is_empty()
    }

    pub fn window(&self, key: &WindowKey) -> Option<&WindowRecord> {
        self.state.window(key)
    }

    /// Whether `key` has a live (not closing) window.
    pub fn is_open(&self, key: &WindowKey) -> bool {
        self.window(key).is_some_and(|w| !w.closing)
    }

    pub fn front_most(&self) -> Option<&WindowRecord> {
        self.state.front_most()
    }

    /// On-screen rect for `key`, accounting for maximization.
    pub fn displayed_rect(&self, key: &WindowKey) -> Option<WindowRect> {
        self.window(key)
            .map(|w| displayed_rect(self.state.viewport, w))
    }

    pub fn position_snapshot(&self, key: &WindowKey) -> Option<GeometrySnapshot> {
        self.state.positions.get(key).copied()
    }

    pub fn taskbar(&self) -> Vec<TaskbarEntry> {
        taskbar_entries(&self.state)
    }

    pub fn pinned_indicators(&self) -> Vec<PinnedIndicator> {
        pinned_indicators(&self.state)
    }

    /// Bumped on every taskbar-affecting change; views re-render when it moves.
    pub fn taskbar_revision(&self) -> u64 {
        self.taskbar_revision
    }

    /// Window whose primary input should hold keyboard focus.
    pub fn input_focus(&self) -> Option<&WindowKey> {
        self.input_focus.as_ref()
    }
}
