use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;
use lamp_common::{
    ModeEcho, Operation, Settings, SettingsPatch, StatusPatch, TransportError, TransportKind,
};
use tokio::sync::oneshot;

use crate::transport::Transport;

type Reply<T> = Result<T, TransportError>;

/// FIFO of replies for one operation. A reply can be ready up front or held
/// until the test releases it.
struct Script<T> {
    operation: Operation,
    queue: Mutex<VecDeque<oneshot::Receiver<Reply<T>>>>,
}

impl<T> Script<T> {
    fn new(operation: Operation) -> Self {
        Self {
            operation,
            queue: Mutex::new(VecDeque::new()),
        }
    }

    fn push(&self, reply: Reply<T>) {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(reply);
        self.queue.lock().unwrap().push_back(rx);
    }

    fn hold(&self) -> oneshot::Sender<Reply<T>> {
        let (tx, rx) = oneshot::channel();
        self.queue.lock().unwrap().push_back(rx);
        tx
    }

    async fn next(&self) -> Reply<T> {
        let pending = self.queue.lock().unwrap().pop_front();
        match pending {
            Some(rx) => rx.await.unwrap_or_else(|_| {
                Err(TransportError::unreachable(self.operation, "reply dropped"))
            }),
            None => Err(TransportError::unreachable(
                self.operation,
                "no scripted reply",
            )),
        }
    }
}

/// Transport whose replies and their timing are chosen by the test.
/// Calls without a queued reply fail as unreachable.
pub(crate) struct ScriptedTransport {
    kind: TransportKind,
    calls: Mutex<Vec<Operation>>,
    status: Script<StatusPatch>,
    set_led: Script<StatusPatch>,
    settings: Script<SettingsPatch>,
    save_settings: Script<SettingsPatch>,
    set_mode: Script<ModeEcho>,
    saved: Mutex<Vec<Settings>>,
}

impl ScriptedTransport {
    pub(crate) fn new(kind: TransportKind) -> Self {
        Self {
            kind,
            calls: Mutex::new(Vec::new()),
            status: Script::new(Operation::StatusFetch),
            set_led: Script::new(Operation::Toggle),
            settings: Script::new(Operation::SettingsFetch),
            save_settings: Script::new(Operation::SettingsSave),
            set_mode: Script::new(Operation::ModeSync),
            saved: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Operation> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn saved_payloads(&self) -> Vec<Settings> {
        self.saved.lock().unwrap().clone()
    }

    pub(crate) fn reply_status(&self, reply: Reply<StatusPatch>) {
        self.status.push(reply);
    }

    pub(crate) fn reply_led(&self, reply: Reply<StatusPatch>) {
        self.set_led.push(reply);
    }

    pub(crate) fn hold_led(&self) -> oneshot::Sender<Reply<StatusPatch>> {
        self.set_led.hold()
    }

    pub(crate) fn reply_settings(&self, reply: Reply<SettingsPatch>) {
        self.settings.push(reply);
    }

    pub(crate) fn reply_save(&self, reply: Reply<SettingsPatch>) {
        self.save_settings.push(reply);
    }

    pub(crate) fn reply_mode(&self, reply: Reply<ModeEcho>) {
        self.set_mode.push(reply);
    }

    pub(crate) fn hold_mode(&self) -> oneshot::Sender<Reply<ModeEcho>> {
        self.set_mode.hold()
    }

    fn record(&self, operation: Operation) {
        self.calls.lock().unwrap().push(operation);
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    async fn status(&self) -> Result<StatusPatch, TransportError> {
        self.record(Operation::StatusFetch);
        self.status.next().await
    }

    async fn set_led(&self, _on: bool) -> Result<StatusPatch, TransportError> {
        self.record(Operation::Toggle);
        self.set_led.next().await
    }

    async fn settings(&self) -> Result<SettingsPatch, TransportError> {
        self.record(Operation::SettingsFetch);
        self.settings.next().await
    }

    async fn save_settings(&self, payload: &Settings) -> Result<SettingsPatch, TransportError> {
        self.record(Operation::SettingsSave);
        self.saved.lock().unwrap().push(payload.clone());
        self.save_settings.next().await
    }

    async fn set_mode(&self, _mode: &str) -> Result<ModeEcho, TransportError> {
        self.record(Operation::ModeSync);
        self.set_mode.next().await
    }
}

pub(crate) fn lamp_status(led_on: bool, uptime_s: u64, mode: &str) -> StatusPatch {
    StatusPatch {
        led_on: Some(led_on),
        uptime_s: Some(uptime_s),
        ssid: Some("MeowMeow".to_string()),
        mode: Some(mode.to_string()),
    }
}

pub(crate) fn rejected(operation: Operation) -> TransportError {
    TransportError::Rejected {
        operation,
        status: 500,
    }
}
