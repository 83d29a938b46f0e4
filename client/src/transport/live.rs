use async_trait::async_trait;
use lamp_common::{
    ModeEcho, ModeRequest, Operation, Settings, SettingsPatch, StatusPatch, TransportError,
    TransportKind, API_MODE, API_PAW, API_SETTINGS,
};
use reqwest::{header::CACHE_CONTROL, Client, RequestBuilder};
use serde_json::Value;
use tracing::debug;

use super::Transport;

/// Talks to a real lamp over HTTP. Timeouts are whatever the HTTP client
/// applies; this layer adds none.
pub struct LiveTransport {
    client: Client,
    base_url: String,
}

impl LiveTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .header(CACHE_CONTROL, "no-store")
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    async fn send(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Value, TransportError> {
        let response = request
            .send()
            .await
            .map_err(|err| TransportError::unreachable(operation, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Rejected {
                operation,
                status: status.as_u16(),
            });
        }

        let body = response.json::<Value>().await.map_err(|err| {
            if err.is_decode() {
                TransportError::Decode {
                    operation,
                    message: err.to_string(),
                }
            } else {
                TransportError::unreachable(operation, err.to_string())
            }
        })?;

        debug!("{} {operation} ok", self.base_url);
        Ok(body)
    }
}

#[async_trait]
impl Transport for LiveTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Live
    }

    async fn status(&self) -> Result<StatusPatch, TransportError> {
        let body = self.send(Operation::StatusFetch, self.get(API_PAW)).await?;
        Ok(StatusPatch::from_value(&body))
    }

    async fn set_led(&self, on: bool) -> Result<StatusPatch, TransportError> {
        let state = if on { "on" } else { "off" };
        let request = self.post(API_PAW).form(&[("state", state)]);
        let body = self.send(Operation::Toggle, request).await?;
        Ok(StatusPatch::from_value(&body))
    }

    async fn settings(&self) -> Result<SettingsPatch, TransportError> {
        let body = self
            .send(Operation::SettingsFetch, self.get(API_SETTINGS))
            .await?;
        Ok(SettingsPatch::from_value(&body))
    }

    async fn save_settings(&self, payload: &Settings) -> Result<SettingsPatch, TransportError> {
        let request = self.post(API_SETTINGS).json(payload);
        let body = self.send(Operation::SettingsSave, request).await?;
        Ok(SettingsPatch::from_value(&body))
    }

    async fn set_mode(&self, mode: &str) -> Result<ModeEcho, TransportError> {
        let request = self.post(API_MODE).json(&ModeRequest {
            mode: mode.to_string(),
        });
        let body = self.send(Operation::ModeSync, request).await?;
        Ok(ModeEcho::from_value(&body))
    }
}
