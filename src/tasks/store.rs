use std::sync::{Arc, RwLock};

use chrono::{DateTime, Local, TimeZone, Utc};
use uuid::Uuid;

use crate::{
    events::{DashboardEvent, SharedBus},
    utils::sync::{read, write},
};

use super::{
    counts::{derive_breakdown, derive_counts, TaskBreakdown, TaskCounts},
    filter::{apply_filter, TaskFilter},
    model::{Comment, NewTask, Subtask, Task, TaskPatch},
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Canonical task list. Single writer: every mutation goes through these
/// methods; readers only ever get cloned snapshots.
///
/// Unknown ids are never errors. `update_task` / `delete_task` report whether
/// anything changed, and the detail operations return `None`.
#[derive(Clone)]
pub struct TaskStore {
    tasks: Arc<RwLock<Vec<Task>>>,
    bus: SharedBus,
}

impl TaskStore {
    pub fn new(bus: SharedBus) -> Self {
        Self::with_tasks(bus, Vec::new())
    }

    pub fn with_tasks(bus: SharedBus, tasks: Vec<Task>) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(tasks)),
            bus,
        }
    }

    pub fn add_task(&self, data: NewTask) -> Task {
        let task = data.into_task(Uuid::new_v4().to_string(), Utc::now());
        write(&self.tasks).push(task.clone());
        log_debug!("task {} added", task.id);
        self.bus.emit(DashboardEvent::TasksChanged);
        task
    }

    pub fn update_task(&self, id: &str, patch: TaskPatch) -> bool {
        let updated = self.mutate(id, |task| patch.apply(task)).is_some();
        if !updated {
            log_debug!("update for unknown task {id} ignored");
        }
        updated
    }

    pub fn delete_task(&self, id: &str) -> bool {
        let removed = {
            let mut tasks = write(&self.tasks);
            let before = tasks.len();
            tasks.retain(|task| task.id != id);
            tasks.len() != before
        };
        if removed {
            self.bus.emit(DashboardEvent::TasksChanged);
        } else {
            log_debug!("delete for unknown task {id} ignored");
        }
        removed
    }

    pub fn get_task_by_id(&self, id: &str) -> Option<Task> {
        read(&self.tasks).iter().find(|task| task.id == id).cloned()
    }

    pub fn list(&self) -> Vec<Task> {
        read(&self.tasks).clone()
    }

    pub fn len(&self) -> usize {
        read(&self.tasks).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.tasks).is_empty()
    }

    pub fn filtered(&self, filter: &TaskFilter) -> Vec<Task> {
        apply_filter(&read(&self.tasks), filter)
    }

    /// Recomputed on every call against the local clock.
    pub fn derive_counts(&self) -> TaskCounts {
        self.derive_counts_at(&Local::now())
    }

    pub fn derive_counts_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> TaskCounts {
        derive_counts(&read(&self.tasks), now)
    }

    pub fn breakdown(&self) -> TaskBreakdown {
        derive_breakdown(&read(&self.tasks))
    }

    pub fn add_subtask(&self, task_id: &str, title: impl Into<String>) -> Option<Task> {
        let subtask = Subtask {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            completed: false,
        };
        self.mutate(task_id, move |task| task.subtasks.push(subtask))
    }

    /// Returns `None` when either the task or the subtask is unknown.
    pub fn toggle_subtask(&self, task_id: &str, subtask_id: &str) -> Option<Task> {
        let known = self
            .get_task_by_id(task_id)?
            .subtasks
            .iter()
            .any(|subtask| subtask.id == subtask_id);
        if !known {
            return None;
        }
        self.mutate(task_id, |task| {
            if let Some(subtask) = task
                .subtasks
                .iter_mut()
                .find(|subtask| subtask.id == subtask_id)
            {
                subtask.completed = !subtask.completed;
            }
        })
    }

    pub fn add_comment(
        &self,
        task_id: &str,
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Option<Task> {
        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            author: author.into(),
            text: text.into(),
            timestamp: Utc::now(),
        };
        self.mutate(task_id, move |task| task.comments.push(comment))
    }

    fn mutate<F>(&self, id: &str, change: F) -> Option<Task>
    where
        F: FnOnce(&mut Task),
    {
        let updated = {
            let mut tasks = write(&self.tasks);
            let task = tasks.iter_mut().find(|task| task.id == id)?;
            change(task);
            task.updated_at = Utc::now();
            task.clone()
        };
        self.bus.emit(DashboardEvent::TasksChanged);
        Some(updated)
    }
}
