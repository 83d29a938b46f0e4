pub mod app;
pub mod connection;
pub mod mode;
pub mod poll;
pub mod settings;
pub mod status;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use app::{LampApp, LampView};
pub use connection::ConnectionMonitor;
pub use mode::{ModeController, ModeView};
pub use poll::PollTask;
pub use settings::{SettingsReconciler, SettingsView};
pub use status::StatusSynchronizer;
pub use transport::{LiveTransport, SimulatedTransport, Transport};
