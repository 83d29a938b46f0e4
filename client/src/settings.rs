use std::sync::Arc;

use lamp_common::{Settings, SettingsField, SettingsForm, SettingsGate};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{connection::ConnectionMonitor, transport::Transport};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsView {
    pub settings: Settings,
    pub form: SettingsForm,
    pub gate: SettingsGate,
    pub message: Option<String>,
}

#[derive(Debug, Default)]
struct SettingsState {
    form: SettingsForm,
    settings: Settings,
    message: Option<String>,
}

impl SettingsState {
    /// Replaces inputs and canonical settings with `settings`, gated.
    fn replace(&mut self, settings: &Settings) {
        self.form = SettingsForm::from(settings);
        self.form.enforce_dependencies();
        self.settings = self.form.to_settings();
    }
}

/// Owns the canonical settings and their persistence.
#[derive(Clone)]
pub struct SettingsReconciler {
    transport: Arc<dyn Transport>,
    connection: ConnectionMonitor,
    state: Arc<Mutex<SettingsState>>,
}

impl SettingsReconciler {
    pub fn new(transport: Arc<dyn Transport>, connection: ConnectionMonitor) -> Self {
        Self {
            transport,
            connection,
            state: Arc::new(Mutex::new(SettingsState::default())),
        }
    }

    /// Fetches settings, merging them over the defaults. Falls back to pure
    /// defaults when the device cannot be read.
    pub async fn load(&self) -> bool {
        match self.transport.settings().await {
            Ok(patch) => {
                self.state.lock().await.replace(&Settings::from_patch(&patch));
                debug!("settings loaded");
                true
            }
            Err(err) => {
                warn!("settings load failed: {err}");
                let message = if self.transport.kind().is_simulated() {
                    "Mock settings ready."
                } else {
                    "Could not load settings."
                };
                let mut state = self.state.lock().await;
                state.replace(&Settings::default());
                state.message = Some(message.to_string());
                false
            }
        }
    }

    /// Applies input changes and re-derives the canonical settings. A WiFi
    /// change may switch MQTT off as a side effect.
    pub async fn edit(&self, fields: impl IntoIterator<Item = SettingsField>) -> SettingsGate {
        let mut state = self.state.lock().await;
        for field in fields {
            state.form.apply(field);
        }
        if state.form.enforce_dependencies() {
            debug!("mqtt switched off until wifi is ready");
        }
        state.settings = state.form.to_settings();
        state.form.gate()
    }

    /// Sends the current settings; the device's echo becomes the new state.
    pub async fn save(&self) -> bool {
        let payload = {
            let mut state = self.state.lock().await;
            state.message = Some("Saving...".to_string());
            state.form.to_settings()
        };

        match self.transport.save_settings(&payload).await {
            Ok(patch) => {
                let message = if self.transport.kind().is_simulated() {
                    "Saved in mock mode."
                } else {
                    "Saved."
                };
                {
                    let mut state = self.state.lock().await;
                    state.replace(&Settings::from_patch(&patch));
                    state.message = Some(message.to_string());
                }
                self.connection.mark_reachable().await;
                info!("settings saved");
                true
            }
            Err(err) => {
                warn!("settings save failed: {err}");
                self.state.lock().await.message = Some("Could not save settings.".to_string());
                self.connection.mark_down().await;
                false
            }
        }
    }

    /// Stages the defaults locally. Nothing is sent until [`Self::save`].
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.replace(&Settings::default());
        state.message = Some("Reset to defaults.".to_string());
    }

    pub async fn settings(&self) -> Settings {
        self.state.lock().await.settings.clone()
    }

    pub async fn form(&self) -> SettingsForm {
        self.state.lock().await.form.clone()
    }

    pub async fn gate(&self) -> SettingsGate {
        self.state.lock().await.form.gate()
    }

    pub async fn message(&self) -> Option<String> {
        self.state.lock().await.message.clone()
    }

    pub async fn view(&self) -> SettingsView {
        let state = self.state.lock().await;
        SettingsView {
            settings: state.settings.clone(),
            form: state.form.clone(),
            gate: state.form.gate(),
            message: state.message.clone(),
        }
    }
}
