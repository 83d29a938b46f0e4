use std::sync::Arc;

use lamp_common::{ModeMachine, ModePhase};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeView {
    pub phase: ModePhase,
    pub value: String,
    pub enabled: bool,
    pub hint: &'static str,
    pub options: Vec<String>,
}

/// Owns the glow mode and pushes selections to the lamp.
#[derive(Clone)]
pub struct ModeController {
    transport: Arc<dyn Transport>,
    machine: Arc<Mutex<ModeMachine>>,
}

impl ModeController {
    pub fn new(transport: Arc<dyn Transport>, known_modes: Vec<String>) -> Self {
        let simulated = transport.kind().is_simulated();
        Self {
            transport,
            machine: Arc::new(Mutex::new(ModeMachine::new(known_modes, simulated))),
        }
    }

    /// Applies `mode` locally and syncs it. Returns whether a request was
    /// sent; a failed sync keeps the local value and is not retried.
    pub async fn select(&self, mode: &str) -> bool {
        let ticket = {
            let mut machine = self.machine.lock().await;
            match machine.select(mode) {
                Some(ticket) => ticket,
                None => {
                    debug!(
                        "mode {mode} ignored in phase {:?}",
                        machine.phase()
                    );
                    return false;
                }
            }
        };

        match self.transport.set_mode(mode).await {
            Ok(echo) => {
                let mut machine = self.machine.lock().await;
                if !machine.complete(ticket, echo.mode.as_deref()) {
                    debug!("mode {mode} synced after being superseded");
                }
            }
            Err(err) => {
                warn!("mode {mode} not synced: {err}");
                self.machine.lock().await.fail(ticket);
            }
        }
        true
    }

    pub async fn phase(&self) -> ModePhase {
        self.machine.lock().await.phase()
    }

    pub async fn value(&self) -> String {
        self.machine.lock().await.value().to_string()
    }

    pub async fn view(&self) -> ModeView {
        let machine = self.machine.lock().await;
        ModeView {
            phase: machine.phase(),
            value: machine.value().to_string(),
            enabled: machine.is_enabled(),
            hint: machine.hint(),
            options: machine.known_modes().to_vec(),
        }
    }

    /// Locked handle for the status synchronizer, which folds each applied
    /// status into the machine while holding its own state lock.
    pub(crate) fn machine(&self) -> &Arc<Mutex<ModeMachine>> {
        &self.machine
    }
}
