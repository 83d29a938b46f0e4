use std::fmt;

/// Transport operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    StatusFetch,
    Toggle,
    SettingsFetch,
    SettingsSave,
    ModeSync,
}

impl Operation {
    /// Short wire-level tag; both settings calls share `settings`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::StatusFetch => "status",
            Self::Toggle => "toggle",
            Self::SettingsFetch | Self::SettingsSave => "settings",
            Self::ModeSync => "mode",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StatusFetch => "status fetch",
            Self::Toggle => "toggle",
            Self::SettingsFetch => "settings fetch",
            Self::SettingsSave => "settings save",
            Self::ModeSync => "mode sync",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("{operation} rejected with HTTP {status}")]
    Rejected { operation: Operation, status: u16 },
    #[error("{operation} failed: {message}")]
    Unreachable {
        operation: Operation,
        message: String,
    },
    #[error("{operation} returned an undecodable body: {message}")]
    Decode {
        operation: Operation,
        message: String,
    },
}

impl TransportError {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Rejected { operation, .. }
            | Self::Unreachable { operation, .. }
            | Self::Decode { operation, .. } => *operation,
        }
    }

    pub fn unreachable(operation: Operation, message: impl Into<String>) -> Self {
        Self::Unreachable {
            operation,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_calls_share_a_tag() {
        assert_eq!(Operation::SettingsFetch.tag(), "settings");
        assert_eq!(Operation::SettingsSave.tag(), "settings");
        assert_eq!(Operation::ModeSync.tag(), "mode");
    }

    #[test]
    fn error_message_names_operation() {
        let err = TransportError::Rejected {
            operation: Operation::Toggle,
            status: 503,
        };
        assert_eq!(err.to_string(), "toggle rejected with HTTP 503");
        assert_eq!(err.operation(), Operation::Toggle);
    }
}
