//! Tasks app state: an ordered to-do list persisted through the storage facade.
//!
//! Entries carry a generated [`TaskId`] so toggles and deletes address the task itself rather
//! than its list position. Lists written before ids existed are upgraded on load.

use desktop_app_contract::{AppId, WindowConfig};
use platform_host::{StorageFacade, TASKS_KEY};
use serde::{Deserialize, Serialize};

/// Stable task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One to-do entry. List position is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub created_at: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    #[serde(default)]
    id: Option<TaskId>,
    text: String,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    created_at: u64,
}

/// Window parameters for the tasks app.
pub fn window_config() -> WindowConfig {
    WindowConfig::for_app(AppId::Tasks).with_size(500, 600)
}

/// Task list bound to a storage facade. Every mutation persists the whole list.
#[derive(Debug, Clone)]
pub struct TaskList {
    storage: StorageFacade,
    tasks: Vec<Task>,
}

impl TaskList {
    /// Loads the persisted list, assigning ids to legacy entries.
    pub fn load(storage: StorageFacade) -> Self {
        let mut list = Self {
            storage,
            tasks: Vec::new(),
        };
        list.reload();
        list
    }

    /// Re-reads the list from storage, discarding in-memory state.
    pub fn reload(&mut self) {
        let stored: Vec<StoredTask> = self.storage.get(TASKS_KEY, Vec::new());
        let mut upgraded = false;
        self.tasks = stored
            .into_iter()
            .map(|task| Task {
                id: task.id.unwrap_or_else(|| {
                    upgraded = true;
                    TaskId::generate()
                }),
                text: task.text,
                completed: task.completed,
                created_at: task.created_at,
            })
            .collect();
        if upgraded {
            self.save();
        }
    }

    /// Returns tasks in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id.
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Number of tasks not yet completed.
    pub fn remaining(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    /// Appends a task. Blank text is ignored and yields `None`.
    pub fn add(&mut self, text: &str, now_ms: u64) -> Option<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let id = TaskId::generate();
        self.tasks.push(Task {
            id: id.clone(),
            text: text.to_string(),
            completed: false,
            created_at: now_ms,
        });
        self.save();
        Some(id)
    }

    /// Flips the completed flag. Returns `false` when the id is unknown.
    pub fn toggle(&mut self, id: &TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| &task.id == id) else {
            return false;
        };
        task.completed = !task.completed;
        self.save();
        true
    }

    /// Deletes a task. Returns `false` when the id is unknown.
    pub fn remove(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| &task.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.save();
        true
    }

    fn save(&self) {
        self.storage.set(TASKS_KEY, &self.tasks);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn add_persists_and_ignores_blank_text() {
        let storage = StorageFacade::in_memory();
        let mut list = TaskList::load(storage.clone());

        assert_eq!(list.add("   ", 1), None);
        let id = list.add("  buy milk ", 5).expect("task added");

        let reloaded = TaskList::load(storage);
        assert_eq!(reloaded.tasks().len(), 1);
        let task = reloaded.get(&id).expect("same id after reload");
        assert_eq!(task.text, "buy milk");
        assert_eq!(task.created_at, 5);
        assert!(!task.completed);
    }

    #[test]
    fn toggle_and_remove_address_tasks_by_id() {
        let mut list = TaskList::load(StorageFacade::in_memory());
        let first = list.add("one", 1).unwrap();
        let second = list.add("two", 2).unwrap();

        assert!(list.remove(&first));
        assert!(list.toggle(&second));
        assert!(list.get(&second).unwrap().completed);
        assert_eq!(list.remaining(), 0);

        assert!(!list.toggle(&first));
        assert!(!list.remove(&first));
    }

    #[test]
    fn legacy_entries_without_ids_are_upgraded_once() {
        let storage = StorageFacade::in_memory();
        storage.set(
            TASKS_KEY,
            &json!([{"text": "old", "completed": true, "createdAt": 10}]),
        );

        let list = TaskList::load(storage.clone());
        let id = list.tasks()[0].id.clone();
        assert_eq!(list.tasks()[0].text, "old");
        assert!(list.tasks()[0].completed);

        let again = TaskList::load(storage);
        assert_eq!(again.tasks()[0].id, id);
    }

    #[test]
    fn persisted_layout_uses_camel_case() {
        let storage = StorageFacade::in_memory();
        let mut list = TaskList::load(storage.clone());
        list.add("x", 9);
        let raw = storage.get(TASKS_KEY, serde_json::Value::Null);
        assert_eq!(raw[0]["createdAt"], json!(9));
        assert!(raw[0]["id"].is_string());
    }
}
