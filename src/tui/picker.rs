//! Modal serial port picker
//!
//! A blocking list dialog drawn inside the already-configured terminal.
//! Up/Down move the selection, Enter confirms, `q`/`Esc`/Ctrl-C cancel.
//! The first enumerated port is preselected.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tokio_serial::{SerialPortInfo, SerialPortType};

use super::Term;
use crate::error::{JoyLinkError, Result};

/// Run the modal port-selection dialog
///
/// Blocks until the user confirms or cancels. The returned descriptor is
/// always a member of `ports`.
///
/// # Errors
///
/// - `NoSerialPorts`: called with an empty list (enumeration normally
///   rejects this earlier, before any dialog is shown)
/// - `InvalidSelection`: the user cancelled
pub fn pick_port(terminal: &mut Term, ports: &[SerialPortInfo]) -> Result<SerialPortInfo> {
    if ports.is_empty() {
        return Err(JoyLinkError::NoSerialPorts);
    }

    // Default preselection is the first enumerated port
    let mut selected = 0usize;

    loop {
        terminal.draw(|frame| render_picker(frame, ports, selected))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Up => selected = move_selection(selected, ports.len(), -1),
                KeyCode::Down => selected = move_selection(selected, ports.len(), 1),
                KeyCode::Enter => return Ok(ports[selected].clone()),
                KeyCode::Esc | KeyCode::Char('q') => {
                    return Err(JoyLinkError::InvalidSelection(
                        "selection cancelled".to_string(),
                    ));
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Err(JoyLinkError::InvalidSelection(
                        "selection interrupted".to_string(),
                    ));
                }
                _ => {}
            }
        }
    }
}

/// Move the selection by `delta`, clamped to the list bounds
fn move_selection(selected: usize, len: usize, delta: isize) -> usize {
    selected
        .saturating_add_signed(delta)
        .min(len.saturating_sub(1))
}

/// Short label for a port's transport type
fn port_type_label(port_type: &SerialPortType) -> &'static str {
    match port_type {
        SerialPortType::UsbPort(_) => "usb",
        SerialPortType::BluetoothPort => "bluetooth",
        SerialPortType::PciPort => "pci",
        SerialPortType::Unknown => "",
    }
}

/// Render the picker dialog
fn render_picker(frame: &mut Frame, ports: &[SerialPortInfo], selected: usize) {
    let area = centered_rect(60, 50, frame.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Select Serial Port ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = ports
        .iter()
        .enumerate()
        .map(|(i, port)| {
            let marker = if i == selected { "> " } else { "  " };
            let type_label = port_type_label(&port.port_type);
            let text = if type_label.is_empty() {
                format!("{}{}", marker, port.port_name)
            } else {
                format!("{}{} ({})", marker, port.port_name, type_label)
            };
            let style = if i == selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(Span::styled(text, style))
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Up/Down move | Enter select | Esc cancel",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Helper to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
