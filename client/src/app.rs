use std::{sync::Arc, time::Duration};

use lamp_common::{ClientConfig, ConnectionState, DeviceView, TransportKind};
use serde::Serialize;
use tracing::info;

use crate::{
    connection::ConnectionMonitor,
    mode::{ModeController, ModeView},
    poll::PollTask,
    settings::{SettingsReconciler, SettingsView},
    status::StatusSynchronizer,
    transport::{self, Transport},
};

/// Everything a front end needs to render the lamp in one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LampView {
    pub transport: TransportKind,
    pub connection: ConnectionState,
    pub connection_label: &'static str,
    pub device: DeviceView,
    pub mode: ModeView,
    pub settings: SettingsView,
}

/// Wires one transport to the status, settings and mode components.
pub struct LampApp {
    config: ClientConfig,
    connection: ConnectionMonitor,
    status: StatusSynchronizer,
    settings: SettingsReconciler,
    mode: ModeController,
    poller: Option<PollTask>,
}

impl LampApp {
    pub fn new(mut config: ClientConfig) -> Self {
        config.sanitize();
        let transport = transport::from_config(&config);
        Self::with_transport(config, transport)
    }

    pub fn with_transport(mut config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        config.sanitize();
        let connection = ConnectionMonitor::new(transport.kind());
        let mode = ModeController::new(transport.clone(), config.known_modes.clone());
        let status = StatusSynchronizer::new(transport.clone(), connection.clone(), mode.clone());
        let settings = SettingsReconciler::new(transport, connection.clone());

        Self {
            config,
            connection,
            status,
            settings,
            mode,
            poller: None,
        }
    }

    /// Starts polling and performs the initial settings load.
    pub async fn start(&mut self) {
        if self.poller.is_none() {
            let every = Duration::from_millis(self.config.poll_interval_ms);
            self.poller = Some(PollTask::spawn(self.status.clone(), every));
        }
        info!(
            "lamp client started transport={} poll_interval_ms={}",
            self.connection.kind().as_str(),
            self.config.poll_interval_ms
        );
        self.settings.load().await;
    }

    pub fn stop(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
            info!("lamp client stopped");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(PollTask::is_running)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn connection(&self) -> &ConnectionMonitor {
        &self.connection
    }

    pub fn status(&self) -> &StatusSynchronizer {
        &self.status
    }

    pub fn settings(&self) -> &SettingsReconciler {
        &self.settings
    }

    pub fn mode(&self) -> &ModeController {
        &self.mode
    }

    pub async fn view(&self) -> LampView {
        let connection = self.connection.state().await;
        LampView {
            transport: self.connection.kind(),
            connection,
            connection_label: connection.label(),
            device: self.status.view().await,
            mode: self.mode.view().await,
            settings: self.settings.view().await,
        }
    }
}
