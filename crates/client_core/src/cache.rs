//! Read-only mirror of the remote task store.

use std::collections::HashSet;

use shared::{
    domain::{Task, TaskId},
    protocol::Severity,
};
use tracing::{info, warn};

use crate::{state::ControllerState, TaskService};

pub const REFRESH_ERROR_PREFIX: &str = "Error al cargar las tareas: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Replaced { count: usize },
    Failed { diagnostic: String },
}

impl RefreshOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, RefreshOutcome::Replaced { .. })
    }
}

/// Last successfully fetched task list. Only ever replaced as a whole.
#[derive(Debug, Default)]
pub struct TaskCache {
    tasks: Vec<Task>,
    loaded: bool,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks in the order the store returned them. Empty until the first
    /// successful refresh; see [`TaskCache::is_loaded`].
    pub fn current_snapshot(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Fetches every task and swaps the snapshot in. On failure the previous
    /// snapshot stays and an error status is set.
    pub async fn refresh(
        &mut self,
        service: &dyn TaskService,
        state: &mut ControllerState,
    ) -> RefreshOutcome {
        let mut scope = state.enter_busy();

        let fetched = match service.fetch_tasks().await {
            Ok(tasks) => match first_duplicate_id(&tasks) {
                None => Ok(tasks),
                Some(id) => Err(format!("identificador de tarea duplicado '{id}'")),
            },
            Err(err) => Err(err.diagnostic()),
        };

        match fetched {
            Ok(tasks) => {
                let count = tasks.len();
                self.tasks = tasks;
                self.loaded = true;
                info!(count, "tasks: snapshot replaced");
                RefreshOutcome::Replaced { count }
            }
            Err(diagnostic) => {
                warn!(%diagnostic, kept = self.tasks.len(), "tasks: refresh failed, keeping stale snapshot");
                scope.set_status(format!("{REFRESH_ERROR_PREFIX}{diagnostic}"), Severity::Error);
                RefreshOutcome::Failed { diagnostic }
            }
        }
    }
}

fn first_duplicate_id(tasks: &[Task]) -> Option<&TaskId> {
    let mut seen = HashSet::with_capacity(tasks.len());
    tasks.iter().map(|task| &task.id).find(|id| !seen.insert(*id))
}
