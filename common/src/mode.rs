use serde::{Deserialize, Serialize};

pub const DEFAULT_MODE: &str = "static";
pub const KNOWN_MODES: [&str; 4] = [DEFAULT_MODE, "purr", "bzzz", "blink"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModePhase {
    /// Lamp is off; selection is inert.
    Disabled,
    Idle,
    /// A selection was sent and its response has not arrived.
    Pending,
    /// The latest selection could not be synced; the local value stays.
    Failed,
}

/// Identifies one outstanding mode request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTicket(u64);

/// Glow-mode state machine. Holds no I/O; callers send the request for the
/// ticket returned by [`ModeMachine::select`] and report its outcome.
#[derive(Debug, Clone)]
pub struct ModeMachine {
    known_modes: Vec<String>,
    simulated: bool,
    phase: ModePhase,
    value: String,
    latest_ticket: u64,
}

impl ModeMachine {
    pub fn new(known_modes: Vec<String>, simulated: bool) -> Self {
        Self {
            known_modes,
            simulated,
            phase: ModePhase::Disabled,
            value: DEFAULT_MODE.to_string(),
            latest_ticket: 0,
        }
    }

    pub fn phase(&self) -> ModePhase {
        self.phase
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn known_modes(&self) -> &[String] {
        &self.known_modes
    }

    pub fn is_known(&self, mode: &str) -> bool {
        self.known_modes.iter().any(|known| known == mode)
    }

    pub fn is_enabled(&self) -> bool {
        self.phase != ModePhase::Disabled
    }

    pub fn hint(&self) -> &'static str {
        match self.phase {
            ModePhase::Disabled => "Turn the lamp on to choose a mood.",
            ModePhase::Idle | ModePhase::Pending => "Choose how I glow.",
            ModePhase::Failed if self.simulated => "Mock mode: no device to sync.",
            ModePhase::Failed => "Mode will sync once the lamp is ready.",
        }
    }

    /// Optimistically switches to `mode`. Returns the ticket to send under,
    /// or `None` when selection is not allowed.
    pub fn select(&mut self, mode: &str) -> Option<ModeTicket> {
        if self.phase == ModePhase::Disabled || !self.is_known(mode) {
            return None;
        }

        self.value = mode.to_string();
        self.latest_ticket += 1;
        self.enter(ModePhase::Pending);
        Some(ModeTicket(self.latest_ticket))
    }

    /// Records a successful sync. Superseded tickets do not move the phase.
    pub fn complete(&mut self, ticket: ModeTicket, echoed: Option<&str>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        if let Some(mode) = echoed.filter(|mode| self.is_known(mode)) {
            self.value = mode.to_string();
        }
        self.enter(ModePhase::Idle);
        true
    }

    /// Records a failed sync. The optimistic value is kept.
    pub fn fail(&mut self, ticket: ModeTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        self.enter(ModePhase::Failed);
        true
    }

    /// Folds in a freshly applied device status.
    pub fn observe(&mut self, led_on: bool, reported_mode: Option<&str>) {
        if self.phase != ModePhase::Pending {
            if let Some(mode) = reported_mode {
                self.value = mode.to_string();
            }
        }

        let next = match self.phase {
            _ if !led_on => ModePhase::Disabled,
            ModePhase::Disabled => ModePhase::Idle,
            phase => phase,
        };
        self.enter(next);
    }

    fn is_current(&self, ticket: ModeTicket) -> bool {
        ticket.0 == self.latest_ticket && self.phase == ModePhase::Pending
    }

    fn enter(&mut self, phase: ModePhase) {
        self.phase = phase;
        if !self.is_known(&self.value) {
            self.value = DEFAULT_MODE.to_string();
        }
    }
}
