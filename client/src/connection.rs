use std::sync::Arc;

use lamp_common::{ConnectionState, TransportKind};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Shared reachability indicator. Written by status polling, toggling and
/// settings saves; read by everything else.
#[derive(Clone)]
pub struct ConnectionMonitor {
    kind: TransportKind,
    state: Arc<Mutex<ConnectionState>>,
}

impl ConnectionMonitor {
    /// Starts `down` until the first call completes.
    pub fn new(kind: TransportKind) -> Self {
        Self {
            kind,
            state: Arc::new(Mutex::new(ConnectionState::Down)),
        }
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    pub async fn state(&self) -> ConnectionState {
        *self.state.lock().await
    }

    pub(crate) async fn mark_reachable(&self) {
        self.set(ConnectionState::reachable(self.kind)).await;
    }

    pub(crate) async fn mark_down(&self) {
        self.set(ConnectionState::Down).await;
    }

    async fn set(&self, next: ConnectionState) {
        let mut state = self.state.lock().await;
        if *state != next {
            match next {
                ConnectionState::Down => warn!("lamp connection {}", next.as_str()),
                _ => info!("lamp connection {}", next.as_str()),
            }
            *state = next;
        }
    }
}
