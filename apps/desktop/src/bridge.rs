//! Worker task that owns the controller, plus the input-side admission check.

use client_core::{CommandController, ScreenView, StatusSignals, SubmitOutcome};
use tokio::{
    sync::{
        mpsc::{self, error::TrySendError},
        watch,
    },
    task::JoinHandle,
};
use tracing::debug;

pub const BUSY_NOTICE: &str = "Espera a que termine el comando en curso.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Submit(String),
    Refresh,
}

#[derive(Debug, Clone)]
pub enum ConsoleEvent {
    /// An operation finished; the view reflects its final state.
    Settled {
        view: ScreenView,
        outcome: Option<SubmitOutcome>,
    },
}

pub struct Bridge {
    cmd_tx: mpsc::Sender<ConsoleCommand>,
    signals: watch::Receiver<StatusSignals>,
    in_flight: bool,
    worker: JoinHandle<()>,
}

/// Moves the controller onto its own task. Commands are processed one at a
/// time; each produces exactly one [`ConsoleEvent::Settled`].
pub fn launch(mut controller: CommandController) -> (Bridge, mpsc::Receiver<ConsoleEvent>) {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<ConsoleCommand>(1);
    let (event_tx, event_rx) = mpsc::channel::<ConsoleEvent>(16);
    let signals = controller.subscribe();

    let worker = tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            let outcome = match cmd {
                ConsoleCommand::Submit(text) => {
                    controller.stage_input(text);
                    Some(controller.submit_staged().await)
                }
                ConsoleCommand::Refresh => {
                    controller.refresh().await;
                    None
                }
            };
            let event = ConsoleEvent::Settled {
                view: controller.view(),
                outcome,
            };
            if event_tx.send(event).await.is_err() {
                break;
            }
        }
        debug!("console worker stopped");
    });

    (
        Bridge {
            cmd_tx,
            signals,
            in_flight: false,
            worker,
        },
        event_rx,
    )
}

impl Bridge {
    pub fn signals(&self) -> watch::Receiver<StatusSignals> {
        self.signals.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight || self.signals.borrow().busy
    }

    /// Forwards a command unless one is already in flight. Refusals are
    /// returned as user-facing text; nothing is queued behind a busy worker.
    pub fn dispatch(&mut self, cmd: ConsoleCommand) -> Result<(), String> {
        if self.is_busy() {
            return Err(BUSY_NOTICE.to_string());
        }
        match self.cmd_tx.try_send(cmd) {
            Ok(()) => {
                self.in_flight = true;
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(BUSY_NOTICE.to_string()),
            Err(TrySendError::Closed(_)) => {
                Err("El procesador de comandos se detuvo; reinicia la aplicación.".to_string())
            }
        }
    }

    pub fn settled(&mut self) {
        self.in_flight = false;
    }

    pub async fn shutdown(self) {
        drop(self.cmd_tx);
        let _ = self.worker.await;
    }
}
