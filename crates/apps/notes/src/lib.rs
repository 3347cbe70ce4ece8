//! Notes app state: a most-recent-first note list with debounced autosave.

use desktop_app_contract::{AppId, WindowConfig};
use platform_host::{next_monotonic_timestamp_ms, Debouncer, StorageFacade, NOTES_KEY};
use serde::{Deserialize, Serialize};

/// Delay between the last edit and the autosave write.
pub const AUTOSAVE_DELAY_MS: u64 = 2000;
/// Title used when a note is saved without one.
pub const UNTITLED: &str = "Untitled";

/// Time-based note identifier (`note_<millis>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    fn mint() -> Self {
        Self(format!("note_{}", next_monotonic_timestamp_ms()))
    }

    /// Wraps an existing id.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Editor contents waiting for autosave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

/// Window parameters for the notes app.
pub fn window_config() -> WindowConfig {
    WindowConfig::for_app(AppId::Notes).with_size(700, 600)
}

/// Note list plus editor selection.
#[derive(Debug, Clone)]
pub struct NotesStore {
    storage: StorageFacade,
    notes: Vec<Note>,
    current: Option<NoteId>,
    autosave: Debouncer<NoteDraft>,
}

impl NotesStore {
    /// Loads persisted notes and selects the first one, if any.
    pub fn load(storage: StorageFacade) -> Self {
        let notes: Vec<Note> = storage.get(NOTES_KEY, Vec::new());
        let current = notes.first().map(|note| note.id.clone());
        Self {
            storage,
            notes,
            current,
            autosave: Debouncer::new(AUTOSAVE_DELAY_MS),
        }
    }

    /// Notes, most recently created or updated first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Id of the note open in the editor.
    pub fn current_id(&self) -> Option<&NoteId> {
        self.current.as_ref()
    }

    /// The note open in the editor.
    pub fn current(&self) -> Option<&Note> {
        let id = self.current.as_ref()?;
        self.notes.iter().find(|note| &note.id == id)
    }

    /// Clears the editor so the next save creates a note.
    pub fn new_note(&mut self) {
        self.autosave.cancel();
        self.current = None;
    }

    /// Opens `id` in the editor, first writing any pending autosave for the previous note.
    pub fn select(&mut self, id: &NoteId, now_ms: u64) -> Option<&Note> {
        if !self.notes.iter().any(|note| &note.id == id) {
            return None;
        }
        if let Some(draft) = self.autosave.flush() {
            self.save(&draft.title, &draft.content, now_ms);
        }
        self.current = Some(id.clone());
        self.current()
    }

    /// Saves editor contents: updates the open note or creates a new one.
    ///
    /// Returns `None` without writing when both title and content are empty.
    pub fn save(&mut self, title: &str, content: &str, now_ms: u64) -> Option<NoteId> {
        let title = title.trim();
        if title.is_empty() && content.is_empty() {
            return None;
        }
        let title = if title.is_empty() { UNTITLED } else { title };

        let existing = self
            .current
            .as_ref()
            .and_then(|id| self.notes.iter().position(|note| &note.id == id));
        let id = match existing {
            Some(index) => {
                let mut note = self.notes.remove(index);
                note.title = title.to_string();
                note.content = content.to_string();
                note.updated_at = now_ms;
                let id = note.id.clone();
                self.notes.insert(0, note);
                id
            }
            None => {
                let note = Note {
                    id: NoteId::mint(),
                    title: title.to_string(),
                    content: content.to_string(),
                    created_at: now_ms,
                    updated_at: now_ms,
                };
                let id = note.id.clone();
                self.notes.insert(0, note);
                id
            }
        };
        self.current = Some(id.clone());
        self.storage.set(NOTES_KEY, &self.notes);
        Some(id)
    }

    /// Records an editor keystroke; supersedes any earlier pending autosave.
    pub fn edit(&mut self, title: &str, content: &str, now_ms: u64) {
        self.autosave.schedule(
            NoteDraft {
                title: title.to_string(),
                content: content.to_string(),
            },
            now_ms,
        );
    }

    /// Writes the pending draft once its delay has passed.
    ///
    /// Autosave only updates an existing note; drafts for an unsaved note are dropped.
    /// Returns whether a write happened.
    pub fn poll_autosave(&mut self, now_ms: u64) -> bool {
        let Some(draft) = self.autosave.poll(now_ms) else {
            return false;
        };
        if self.current.is_none() {
            return false;
        }
        self.save(&draft.title, &draft.content, now_ms).is_some()
    }

    /// Returns whether an autosave is waiting.
    pub fn autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }
}
