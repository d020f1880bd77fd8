//! Lifecycle of a single user command, from validation to cache refresh.

use std::sync::Arc;

use shared::{
    domain::Task,
    protocol::{ActionKind, CommandResponse, Severity},
};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    cache::{RefreshOutcome, TaskCache},
    projector::{ScreenView, StatusProjector},
    state::{ControllerState, StatusSignals},
    TaskService,
};

pub const EMPTY_COMMAND_NOTICE: &str = "Por favor, introduce un comando.";
pub const COMMAND_ERROR_PREFIX: &str = "Error al procesar el comando: ";

/// Whether an interpreted action warrants re-fetching the task list. Only the
/// `unknown` sentinel is exempt; unlisted action tags still refresh.
pub fn should_refresh(action: &ActionKind) -> bool {
    !action.is_unknown()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Whitespace-only input; nothing was sent.
    EmptyInput,
    /// A command or refresh was already in flight.
    Rejected,
    /// The service answered. `refresh` is `None` when the action was
    /// `unknown`.
    Completed {
        action: ActionKind,
        refresh: Option<RefreshOutcome>,
    },
    /// Transport failure or non-2xx response.
    Failed { diagnostic: String },
}

pub struct CommandController {
    service: Arc<dyn TaskService>,
    state: ControllerState,
    cache: TaskCache,
}

impl CommandController {
    pub fn new(service: Arc<dyn TaskService>) -> Self {
        Self {
            service,
            state: ControllerState::new(),
            cache: TaskCache::new(),
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn cache(&self) -> &TaskCache {
        &self.cache
    }

    pub fn current_snapshot(&self) -> &[Task] {
        self.cache.current_snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusSignals> {
        self.state.subscribe()
    }

    pub fn view(&self) -> ScreenView {
        StatusProjector::screen(&self.state, &self.cache)
    }

    pub fn stage_input(&mut self, text: impl Into<String>) {
        self.state.stage_input(text.into());
    }

    pub async fn submit_staged(&mut self) -> SubmitOutcome {
        let text = self.state.pending_input().to_string();
        self.submit(&text).await
    }

    /// Refreshes the task cache outside of a command, e.g. the initial load.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        self.cache
            .refresh(self.service.as_ref(), &mut self.state)
            .await
    }

    /// Sends one command and reconciles the cache with its effect.
    ///
    /// The raw text is sent as typed; trimming only decides emptiness. Busy
    /// is held from dispatch until any follow-up refresh has finished, and
    /// the staged input is cleared only when the service answered.
    pub async fn submit(&mut self, raw_text: &str) -> SubmitOutcome {
        if self.state.is_busy() {
            warn!("command: rejected, another request is in flight");
            return SubmitOutcome::Rejected;
        }

        if raw_text.trim().is_empty() {
            self.state.set_status(EMPTY_COMMAND_NOTICE, Severity::Info);
            return SubmitOutcome::EmptyInput;
        }

        self.state.clear_status();
        let mut scope = self.state.enter_busy();
        info!(chars = raw_text.chars().count(), "command: dispatching");

        match self.service.submit_command(raw_text).await {
            Ok(CommandResponse {
                interpretation,
                action_result,
            }) => {
                info!(
                    action = interpretation.action.as_str(),
                    status = action_result.status.as_str(),
                    "command: interpreted"
                );
                scope.set_status(action_result.message, action_result.status);

                let refresh = if should_refresh(&interpretation.action) {
                    Some(
                        self.cache
                            .refresh(self.service.as_ref(), &mut scope)
                            .await,
                    )
                } else {
                    None
                };

                scope.clear_input();
                SubmitOutcome::Completed {
                    action: interpretation.action,
                    refresh,
                }
            }
            Err(err) => {
                let diagnostic = err.diagnostic();
                warn!(error = %err, "command: request failed");
                scope.set_status(format!("{COMMAND_ERROR_PREFIX}{diagnostic}"), Severity::Error);
                SubmitOutcome::Failed { diagnostic }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
