use std::sync::Arc;

use lamp_common::{DeviceState, DeviceView, StatusPatch};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{connection::ConnectionMonitor, mode::ModeController, transport::Transport};

/// Keeps the locally shown lamp state in line with the device.
///
/// Polls and toggles run as independent tasks. Each applies its own result
/// when it resolves, so whichever completes last wins. Nothing here is
/// optimistic: `led_on` only ever reflects a confirmed device answer.
#[derive(Clone)]
pub struct StatusSynchronizer {
    transport: Arc<dyn Transport>,
    connection: ConnectionMonitor,
    mode: ModeController,
    device: Arc<Mutex<DeviceState>>,
}

impl StatusSynchronizer {
    pub fn new(
        transport: Arc<dyn Transport>,
        connection: ConnectionMonitor,
        mode: ModeController,
    ) -> Self {
        Self {
            transport,
            connection,
            mode,
            device: Arc::new(Mutex::new(DeviceState::default())),
        }
    }

    /// One status round trip. On failure the last applied fields stay
    /// visible and the next tick is the only retry.
    pub async fn poll(&self) -> bool {
        match self.transport.status().await {
            Ok(patch) => {
                self.connection.mark_reachable().await;
                self.apply(&patch).await;
                true
            }
            Err(err) => {
                warn!("status poll failed: {err}");
                self.connection.mark_down().await;
                false
            }
        }
    }

    /// Asks the lamp for `desired` and applies its answer.
    pub async fn request_led_state(&self, desired: bool) -> bool {
        match self.transport.set_led(desired).await {
            Ok(patch) => {
                self.connection.mark_reachable().await;
                self.apply(&patch).await;
                true
            }
            Err(err) => {
                warn!("led {} request failed: {err}", if desired { "on" } else { "off" });
                self.connection.mark_down().await;
                false
            }
        }
    }

    /// Flips the lamp relative to the last confirmed state.
    pub async fn toggle(&self) -> bool {
        let desired = !self.led_on().await;
        self.request_led_state(desired).await
    }

    pub async fn led_on(&self) -> bool {
        self.device.lock().await.led_on()
    }

    pub async fn view(&self) -> DeviceView {
        self.device.lock().await.view()
    }

    async fn apply(&self, patch: &StatusPatch) {
        let mut device = self.device.lock().await;
        device.apply(patch);
        debug!(
            "applied status led_on={} uptime_s={:?}",
            device.led_on(),
            device.uptime_s()
        );

        // Device before mode, always, so the two stay consistent.
        self.mode
            .machine()
            .lock()
            .await
            .observe(device.led_on(), patch.mode.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use lamp_common::{ConnectionState, ModePhase, Operation, TransportKind, KNOWN_MODES};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{lamp_status, rejected, ScriptedTransport};

    fn synchronizer(transport: Arc<ScriptedTransport>) -> (StatusSynchronizer, ConnectionMonitor) {
        let connection = ConnectionMonitor::new(transport.kind());
        let mode = ModeController::new(
            transport.clone(),
            KNOWN_MODES.iter().map(|mode| mode.to_string()).collect(),
        );
        let sync = StatusSynchronizer::new(transport, connection.clone(), mode);
        (sync, connection)
    }

    #[tokio::test]
    async fn toggle_success_enables_mode_selection() {
        let transport = Arc::new(ScriptedTransport::new(TransportKind::Live));
        let (sync, connection) = synchronizer(transport.clone());
        transport.reply_led(Ok(StatusPatch {
            led_on: Some(true),
            uptime_s: Some(12),
            ssid: None,
            mode: Some("static".to_string()),
        }));

        assert!(sync.request_led_state(true).await);
        assert_eq!(connection.state().await, ConnectionState::Ok);
        assert_eq!(sync.mode.phase().await, ModePhase::Idle);
        assert!(sync.mode.view().await.enabled);
        assert_eq!(sync.view().await.uptime.as_deref(), Some("0m"));
    }

    #[tokio::test]
    async fn failed_toggle_is_not_optimistic() {
        let transport = Arc::new(ScriptedTransport::new(TransportKind::Live));
        let (sync, connection) = synchronizer(transport.clone());
        transport.reply_status(Ok(lamp_status(false, 30, "static")));
        transport.reply_led(Err(rejected(Operation::Toggle)));

        assert!(sync.poll().await);
        assert!(!sync.toggle().await);
        assert!(!sync.led_on().await);
        assert_eq!(connection.state().await, ConnectionState::Down);
    }

    #[tokio::test]
    async fn failed_poll_keeps_stale_fields() {
        let transport = Arc::new(ScriptedTransport::new(TransportKind::Simulated));
        let (sync, connection) = synchronizer(transport.clone());
        transport.reply_status(Ok(lamp_status(true, 3_700, "purr")));

        assert!(sync.poll().await);
        assert_eq!(connection.state().await, ConnectionState::Mock);

        assert!(!sync.poll().await);
        assert_eq!(connection.state().await, ConnectionState::Down);

        let view = sync.view().await;
        assert!(view.led_on);
        assert_eq!(view.uptime.as_deref(), Some("1h 1m"));
        assert_eq!(view.ssid.as_deref(), Some("MeowMeow"));
        assert_eq!(sync.mode.value().await, "purr");
    }

    #[tokio::test]
    async fn poll_landing_mid_toggle_wins_when_toggle_fails() {
        let transport = Arc::new(ScriptedTransport::new(TransportKind::Live));
        let (sync, connection) = synchronizer(transport.clone());
        assert!(!sync.led_on().await);

        let release = transport.hold_led();
        let toggle = tokio::spawn({
            let sync = sync.clone();
            async move { sync.request_led_state(false).await }
        });
        tokio::task::yield_now().await;

        transport.reply_status(Ok(lamp_status(true, 60, "static")));
        assert!(sync.poll().await);
        assert!(sync.led_on().await);

        release.send(Err(rejected(Operation::Toggle))).unwrap();
        assert!(!toggle.await.unwrap());

        assert!(sync.led_on().await);
        assert_eq!(connection.state().await, ConnectionState::Down);
        assert_eq!(transport.calls(), vec![Operation::Toggle, Operation::StatusFetch]);
    }

    #[tokio::test]
    async fn late_toggle_success_overrides_earlier_poll() {
        let transport = Arc::new(ScriptedTransport::new(TransportKind::Live));
        let (sync, _) = synchronizer(transport.clone());

        let release = transport.hold_led();
        let toggle = tokio::spawn({
            let sync = sync.clone();
            async move { sync.request_led_state(true).await }
        });
        tokio::task::yield_now().await;

        transport.reply_status(Ok(lamp_status(false, 60, "static")));
        sync.poll().await;
        assert!(!sync.led_on().await);

        release.send(Ok(lamp_status(true, 61, "static"))).unwrap();
        assert!(toggle.await.unwrap());
        assert!(sync.led_on().await);
    }

    #[tokio::test]
    async fn lamp_turning_off_disables_mode() {
        let transport = Arc::new(ScriptedTransport::new(TransportKind::Live));
        let (sync, _) = synchronizer(transport.clone());
        transport.reply_status(Ok(lamp_status(true, 1, "blink")));
        transport.reply_status(Ok(lamp_status(false, 6, "blink")));

        sync.poll().await;
        assert_eq!(sync.mode.phase().await, ModePhase::Idle);
        assert_eq!(sync.mode.value().await, "blink");

        sync.poll().await;
        assert_eq!(sync.mode.phase().await, ModePhase::Disabled);
        assert_eq!(sync.view().await.toggle_caption, "Paw to switch on");
    }
}
