//! # Port Enumeration
//!
//! Lists the serial ports the OS knows about and validates port choices
//! against that list. The interactive picker lives in [`crate::tui::picker`];
//! everything here is non-interactive so the empty-list failure happens
//! before any dialog is shown.

use tokio_serial::SerialPortInfo;

use crate::error::{JoyLinkError, Result};

/// Enumerate available serial ports
///
/// # Returns
///
/// * `Result<Vec<SerialPortInfo>>` - Ports sorted by device name for a
///   deterministic selection order
///
/// # Errors
///
/// - `Serial`: the OS enumeration itself failed
/// - `NoSerialPorts`: enumeration succeeded but found nothing
pub fn enumerate_ports() -> Result<Vec<SerialPortInfo>> {
    let ports = tokio_serial::available_ports()
        .map_err(|e| JoyLinkError::Serial(format!("failed to enumerate ports: {}", e)))?;

    sorted_non_empty(ports)
}

/// Sort an enumerated port list, rejecting an empty one
fn sorted_non_empty(mut ports: Vec<SerialPortInfo>) -> Result<Vec<SerialPortInfo>> {
    if ports.is_empty() {
        return Err(JoyLinkError::NoSerialPorts);
    }

    ports.sort_by(|a, b| a.port_name.cmp(&b.port_name));
    Ok(ports)
}

/// Resolve a `--port` override against the enumerated set
///
/// The override must name one of the enumerated ports; anything else is an
/// `InvalidSelection`, same as cancelling the interactive picker.
pub fn resolve_port_override<'a>(
    ports: &'a [SerialPortInfo],
    path: &str,
) -> Result<&'a SerialPortInfo> {
    ports
        .iter()
        .find(|p| p.port_name == path)
        .ok_or_else(|| JoyLinkError::InvalidSelection(format!("{} is not an enumerated port", path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_serial::SerialPortType;

    fn port(name: &str) -> SerialPortInfo {
        SerialPortInfo {
            port_name: name.to_string(),
            port_type: SerialPortType::Unknown,
        }
    }

    #[test]
    fn test_empty_enumeration_fails_before_any_dialog() {
        let result = sorted_non_empty(vec![]);
        assert!(matches!(result, Err(JoyLinkError::NoSerialPorts)));
    }

    #[test]
    fn test_enumeration_is_sorted_by_name() {
        let ports = sorted_non_empty(vec![
            port("/dev/ttyUSB1"),
            port("/dev/ttyACM0"),
            port("/dev/ttyUSB0"),
        ])
        .unwrap();

        let names: Vec<_> = ports.iter().map(|p| p.port_name.as_str()).collect();
        assert_eq!(names, ["/dev/ttyACM0", "/dev/ttyUSB0", "/dev/ttyUSB1"]);
    }

    #[test]
    fn test_resolve_override_accepts_enumerated_port() {
        let ports = vec![port("/dev/ttyACM0"), port("/dev/ttyUSB0")];
        let resolved = resolve_port_override(&ports, "/dev/ttyUSB0").unwrap();
        assert_eq!(resolved.port_name, "/dev/ttyUSB0");
    }

    #[test]
    fn test_resolve_override_rejects_unknown_port() {
        let ports = vec![port("/dev/ttyACM0")];
        let result = resolve_port_override(&ports, "/dev/ttyS99");
        assert!(matches!(result, Err(JoyLinkError::InvalidSelection(_))));
    }
}
