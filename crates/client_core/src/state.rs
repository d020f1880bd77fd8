//! Transient controller state and its live signal feed.

use std::ops::{Deref, DerefMut};

use shared::protocol::Severity;
use tokio::sync::watch;

/// What a renderer needs to draw the status area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSignals {
    pub busy: bool,
    pub message: String,
    pub severity: Option<Severity>,
}

/// State owned by the command controller. Fields are private; writes happen
/// only through the controller and cache operations in this crate.
#[derive(Debug)]
pub struct ControllerState {
    busy_depth: usize,
    pending_input: String,
    last_message: String,
    last_severity: Option<Severity>,
    signals: watch::Sender<StatusSignals>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerState {
    pub fn new() -> Self {
        let (signals, _) = watch::channel(StatusSignals::default());
        Self {
            busy_depth: 0,
            pending_input: String::new(),
            last_message: String::new(),
            last_severity: None,
            signals,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy_depth > 0
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    pub fn last_severity(&self) -> Option<&Severity> {
        self.last_severity.as_ref()
    }

    pub fn signals(&self) -> StatusSignals {
        StatusSignals {
            busy: self.is_busy(),
            message: self.last_message.clone(),
            severity: self.last_severity.clone(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusSignals> {
        self.signals.subscribe()
    }

    pub(crate) fn stage_input(&mut self, text: String) {
        self.pending_input = text;
    }

    pub(crate) fn clear_input(&mut self) {
        self.pending_input.clear();
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>, severity: Severity) {
        self.last_message = message.into();
        self.last_severity = Some(severity);
        self.publish();
    }

    pub(crate) fn clear_status(&mut self) {
        self.last_message.clear();
        self.last_severity = None;
        self.publish();
    }

    /// Marks the state busy until the returned scope is dropped. Scopes nest:
    /// busy only clears when the outermost one ends.
    pub(crate) fn enter_busy(&mut self) -> BusyScope<'_> {
        self.busy_depth += 1;
        if self.busy_depth == 1 {
            self.publish();
        }
        BusyScope { state: self }
    }

    fn publish(&self) {
        self.signals.send_replace(self.signals());
    }
}

/// Drop guard for the busy flag. Dereferences to the state it guards so the
/// holder can keep mutating it while busy.
pub(crate) struct BusyScope<'a> {
    state: &'a mut ControllerState,
}

impl Deref for BusyScope<'_> {
    type Target = ControllerState;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl DerefMut for BusyScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for BusyScope<'_> {
    fn drop(&mut self) {
        self.state.busy_depth = self.state.busy_depth.saturating_sub(1);
        if self.state.busy_depth == 0 {
            self.state.publish();
        }
    }
}
