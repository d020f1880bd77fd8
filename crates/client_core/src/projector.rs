//! Pure projection of controller state into what a renderer shows.

use shared::{domain::Task, protocol::Severity};

use crate::{
    cache::TaskCache,
    state::{ControllerState, StatusSignals},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    Success,
    Error,
    Info,
    /// Severity the service sent but this client does not know.
    Neutral,
}

impl MessageClass {
    pub fn style_class(self) -> &'static str {
        match self {
            MessageClass::Success => "message success",
            MessageClass::Error => "message error",
            MessageClass::Info => "message info",
            MessageClass::Neutral => "message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBlock {
    pub text: String,
    pub class: MessageClass,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub busy: bool,
    pub message: Option<MessageBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListView {
    /// Busy with nothing fetched yet.
    Loading,
    /// Idle and no fetch has succeeded yet, e.g. the first load failed.
    NotLoaded,
    /// Loaded, and the store holds no tasks.
    Empty,
    Tasks(Vec<Task>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub status: StatusView,
    pub tasks: TaskListView,
}

pub struct StatusProjector;

impl StatusProjector {
    pub fn project(signals: &StatusSignals) -> StatusView {
        let message = (!signals.message.is_empty()).then(|| MessageBlock {
            text: signals.message.clone(),
            class: Self::class_for(signals.severity.as_ref()),
        });
        StatusView {
            busy: signals.busy,
            message,
        }
    }

    pub fn class_for(severity: Option<&Severity>) -> MessageClass {
        match severity {
            Some(Severity::Success) => MessageClass::Success,
            Some(Severity::Error) => MessageClass::Error,
            Some(Severity::Info) => MessageClass::Info,
            Some(Severity::Unrecognized(_)) | None => MessageClass::Neutral,
        }
    }

    pub fn task_list(busy: bool, loaded: bool, snapshot: &[Task]) -> TaskListView {
        if !loaded {
            if busy {
                TaskListView::Loading
            } else {
                TaskListView::NotLoaded
            }
        } else if snapshot.is_empty() {
            TaskListView::Empty
        } else {
            TaskListView::Tasks(snapshot.to_vec())
        }
    }

    pub fn screen(state: &ControllerState, cache: &TaskCache) -> ScreenView {
        ScreenView {
            status: Self::project(&state.signals()),
            tasks: Self::task_list(state.is_busy(), cache.is_loaded(), cache.current_snapshot()),
        }
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::{TaskId, TaskStatus};

    use super::*;

    #[test]
    fn message_block_only_when_text_present() {
        let view = StatusProjector::project(&StatusSignals {
            busy: true,
            message: String::new(),
            severity: Some(Severity::Error),
        });
        assert!(view.busy);
        assert!(view.message.is_none());
    }

    #[test]
    fn severity_maps_to_style_class() {
        for (severity, class) in [
            (Severity::Success, "message success"),
            (Severity::Error, "message error"),
            (Severity::Info, "message info"),
            (Severity::Unrecognized("warning".into()), "message"),
        ] {
            let view = StatusProjector::project(&StatusSignals {
                busy: false,
                message: "hola".into(),
                severity: Some(severity),
            });
            let block = view.message.expect("message block");
            assert_eq!(block.text, "hola");
            assert_eq!(block.class.style_class(), class);
        }
    }

    #[test]
    fn task_list_distinguishes_loading_from_empty() {
        assert_eq!(
            StatusProjector::task_list(true, false, &[]),
            TaskListView::Loading
        );
        assert_eq!(
            StatusProjector::task_list(false, false, &[]),
            TaskListView::NotLoaded
        );
        assert_eq!(
            StatusProjector::task_list(false, true, &[]),
            TaskListView::Empty
        );
        assert_eq!(
            StatusProjector::task_list(true, true, &[]),
            TaskListView::Empty
        );

        let task = Task {
            id: TaskId("1".into()),
            description: "escribir informe".into(),
            start_date: None,
            status: TaskStatus::Completed,
            created_at: None,
        };
        assert_eq!(
            StatusProjector::task_list(true, true, std::slice::from_ref(&task)),
            TaskListView::Tasks(vec![task])
        );
    }
}
