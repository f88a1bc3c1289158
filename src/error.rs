//! # Error Types
//!
//! Custom error types for JoyLink using `thiserror`.
//!
//! The taxonomy distinguishes recoverable errors (a malformed telemetry
//! line) from fatal ones (missing hardware, a cancelled port selection, a
//! failed transmit). The main loop consults [`JoyLinkError::is_recoverable`]
//! instead of guessing from context.

use thiserror::Error;

/// Main error type for JoyLink
#[derive(Debug, Error)]
pub enum JoyLinkError {
    /// No game controller connected at startup
    #[error("no game controller detected")]
    ControllerNotFound,

    /// Controller backend errors (init failure, device I/O)
    #[error("controller error: {0}")]
    Controller(String),

    /// Serial port enumeration returned an empty list
    #[error("no serial ports found")]
    NoSerialPorts,

    /// Port selection was cancelled or named a port outside the enumerated set
    #[error("invalid port selection: {0}")]
    InvalidSelection(String),

    /// Malformed inbound telemetry line (recoverable)
    #[error("telemetry parse error: {0}")]
    Parse(String),

    /// Outbound serial write failed (fatal, no retry)
    #[error("serial transmission error: {0}")]
    Transmission(String),

    /// Serial port open/read errors
    #[error("serial port error: {0}")]
    Serial(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl JoyLinkError {
    /// Whether the loop may log this error and continue.
    ///
    /// Only a telemetry parse failure is recoverable; everything else
    /// terminates the program.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, JoyLinkError::Parse(_))
    }
}

/// Result type alias for JoyLink
pub type Result<T> = std::result::Result<T, JoyLinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_recoverable() {
        let err = JoyLinkError::Parse("bad field".to_string());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_fatal_errors_are_not_recoverable() {
        let fatal = [
            JoyLinkError::ControllerNotFound,
            JoyLinkError::Controller("init failed".to_string()),
            JoyLinkError::NoSerialPorts,
            JoyLinkError::InvalidSelection("cancelled".to_string()),
            JoyLinkError::Transmission("write failed".to_string()),
            JoyLinkError::Serial("open failed".to_string()),
        ];

        for err in fatal {
            assert!(!err.is_recoverable(), "{err} should be fatal");
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err: JoyLinkError = io.into();
        assert!(matches!(err, JoyLinkError::Io(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            JoyLinkError::ControllerNotFound.to_string(),
            "no game controller detected"
        );
        assert_eq!(
            JoyLinkError::NoSerialPorts.to_string(),
            "no serial ports found"
        );
    }
}
