//! Command submission and task synchronisation for the remote task service.
//!
//! [`CommandController`] owns the controller state and the task cache and is
//! the only thing that mutates them. Rendering layers read a projection of
//! that state through [`StatusProjector`] or subscribe to live
//! [`StatusSignals`].

use async_trait::async_trait;
use shared::{domain::Task, protocol::CommandResponse};

pub mod cache;
pub mod controller;
pub mod error;
pub mod projector;
pub mod state;
pub mod transport;

pub use cache::{RefreshOutcome, TaskCache};
pub use controller::{should_refresh, CommandController, SubmitOutcome};
pub use error::ServiceError;
pub use projector::{
    MessageBlock, MessageClass, ScreenView, StatusProjector, StatusView, TaskListView,
};
pub use state::{ControllerState, StatusSignals};
pub use transport::HttpTaskService;

/// The two remote operations the controller depends on.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// `GET /tasks`: every task, in store order.
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ServiceError>;

    /// `POST /command`: interpret and execute one free-text command.
    async fn submit_command(&self, command: &str) -> Result<CommandResponse, ServiceError>;
}
