//! Visualization rendering
//!
//! Draws the controller state on a canvas of 400×400 logical units: the
//! left stick as a circle offset from the left-quadrant center, the right
//! stick from the right-quadrant center, and one square per button along
//! the bottom. Canvas y grows upward, so the screen-space geometry of the
//! original layout is flipped about the horizontal midline.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine, Rectangle};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::SessionStatus;
use crate::controller::InputState;

/// Logical canvas width
pub const CANVAS_WIDTH: f64 = 400.0;

/// Logical canvas height
pub const CANVAS_HEIGHT: f64 = 400.0;

/// Stick marker radius
const STICK_RADIUS: f64 = 20.0;

/// Button square edge length
const BUTTON_SIZE: f64 = 30.0;

/// Horizontal distance between button squares
const BUTTON_SPACING: f64 = 40.0;

const LEFT_STICK_COLOR: Color = Color::Rgb(0, 128, 255);
const LEFT_LINE_COLOR: Color = Color::Rgb(200, 200, 200);
const RIGHT_STICK_COLOR: Color = Color::Rgb(255, 128, 0);
const RIGHT_LINE_COLOR: Color = Color::Rgb(255, 180, 80);
const BUTTON_PRESSED_COLOR: Color = Color::Rgb(0, 200, 0);
const BUTTON_RELEASED_COLOR: Color = Color::Rgb(100, 100, 100);

/// A stick indicator: quadrant center and deflected tip, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickMarker {
    pub center: (f64, f64),
    pub tip: (f64, f64),
}

/// Render the entire frame: canvas plus status bar
pub fn render(frame: &mut Frame, state: &InputState, status: &SessionStatus) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Canvas
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    render_canvas(frame, state, chunks[0]);
    render_status_bar(frame, status, chunks[1]);
}

/// Render the controller canvas
fn render_canvas(frame: &mut Frame, state: &InputState, area: Rect) {
    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(" Controller "))
        .x_bounds([0.0, CANVAS_WIDTH])
        .y_bounds([0.0, CANVAS_HEIGHT])
        .paint(|ctx| {
            if let Some(marker) = left_stick_marker(&state.axes) {
                draw_stick(ctx, marker, LEFT_LINE_COLOR, LEFT_STICK_COLOR);
            }

            if let Some(marker) = right_stick_marker(&state.axes) {
                draw_stick(ctx, marker, RIGHT_LINE_COLOR, RIGHT_STICK_COLOR);
            }

            for (index, &pressed) in state.buttons.iter().enumerate() {
                ctx.draw(&button_rect(index, pressed));
            }
        });

    frame.render_widget(canvas, area);
}

/// Draw one stick marker: connecting line from center to tip, then the tip circle
fn draw_stick(ctx: &mut Context, marker: StickMarker, line_color: Color, stick_color: Color) {
    ctx.draw(&CanvasLine {
        x1: marker.center.0,
        y1: marker.center.1,
        x2: marker.tip.0,
        y2: marker.tip.1,
        color: line_color,
    });
    ctx.draw(&Circle {
        x: marker.tip.0,
        y: marker.tip.1,
        radius: STICK_RADIUS,
        color: stick_color,
    });
}

/// Left stick indicator for axes 0..=1, if present
///
/// Anchored at the left-quadrant center (W/4, H/2), deflected by
/// (a0·W/6, a1·H/3). Positive axis y means "stick down", which is a smaller
/// canvas y.
pub fn left_stick_marker(axes: &[f32]) -> Option<StickMarker> {
    if axes.len() < 2 {
        return None;
    }
    Some(stick_marker(CANVAS_WIDTH / 4.0, axes[0], axes[1]))
}

/// Right stick indicator for axes 2..=3, if present
pub fn right_stick_marker(axes: &[f32]) -> Option<StickMarker> {
    if axes.len() < 4 {
        return None;
    }
    Some(stick_marker(3.0 * CANVAS_WIDTH / 4.0, axes[2], axes[3]))
}

fn stick_marker(center_x: f64, ax: f32, ay: f32) -> StickMarker {
    let center_y = CANVAS_HEIGHT / 2.0;
    StickMarker {
        center: (center_x, center_y),
        tip: (
            center_x + ax as f64 * CANVAS_WIDTH / 6.0,
            center_y - ay as f64 * CANVAS_HEIGHT / 3.0,
        ),
    }
}

/// Square for button `index` in the bottom row
///
/// In screen terms the row starts 40 logical units above the bottom edge,
/// spaced 40 units apart from x = 40. With canvas y growing upward the
/// squares span canvas y 10..=40.
pub fn button_rect(index: usize, pressed: bool) -> Rectangle {
    Rectangle {
        x: BUTTON_SPACING + index as f64 * BUTTON_SPACING,
        y: BUTTON_SPACING - BUTTON_SIZE,
        width: BUTTON_SIZE,
        height: BUTTON_SIZE,
        color: if pressed {
            BUTTON_PRESSED_COLOR
        } else {
            BUTTON_RELEASED_COLOR
        },
    }
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, status: &SessionStatus, area: Rect) {
    let telemetry = match &status.last_telemetry {
        Some(values) => format!(
            "[{}]",
            values
                .iter()
                .map(|v| format!("{:.2}", v))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        None => "-".to_string(),
    };

    let status_line = Line::from(vec![
        Span::styled(&status.controller, Style::default().fg(Color::Cyan)),
        Span::raw(" → "),
        Span::styled(&status.port, Style::default().fg(Color::Green)),
        Span::raw(format!(" | frames: {}", status.frames_sent)),
        Span::raw(format!(" | telemetry: {}", telemetry)),
        Span::raw(" | "),
        Span::styled("q quit", Style::default().fg(Color::DarkGray)),
    ]);

    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(status_line), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_markers_below_two_axes() {
        assert_eq!(left_stick_marker(&[]), None);
        assert_eq!(left_stick_marker(&[0.5]), None);
        assert_eq!(right_stick_marker(&[0.5]), None);
    }

    #[test]
    fn test_exactly_two_axes_draws_left_only() {
        let axes = [0.5, -0.5];
        assert!(left_stick_marker(&axes).is_some());
        assert_eq!(right_stick_marker(&axes), None);
    }

    #[test]
    fn test_four_axes_draws_both() {
        let axes = [0.0, 0.0, 0.0, 0.0];
        assert!(left_stick_marker(&axes).is_some());
        assert!(right_stick_marker(&axes).is_some());
    }

    #[test]
    fn test_centered_axes_put_tip_on_center() {
        let marker = left_stick_marker(&[0.0, 0.0]).unwrap();
        assert_eq!(marker.tip, marker.center);
        assert_eq!(marker.center, (100.0, 200.0));

        let marker = right_stick_marker(&[0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(marker.center, (300.0, 200.0));
    }

    #[test]
    fn test_full_deflection_scaling() {
        // Full right: W/6 to the right of the quadrant center
        let marker = left_stick_marker(&[1.0, 0.0]).unwrap();
        assert!((marker.tip.0 - (100.0 + 400.0 / 6.0)).abs() < 1e-9);
        assert_eq!(marker.tip.1, 200.0);
    }

    #[test]
    fn test_stick_down_lowers_canvas_y() {
        // Positive axis y is "stick down"; canvas y grows upward
        let marker = left_stick_marker(&[0.0, 1.0]).unwrap();
        assert!(marker.tip.1 < marker.center.1);
        assert!((marker.tip.1 - (200.0 - 400.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_button_row_positions() {
        let first = button_rect(0, false);
        assert_eq!(first.x, 40.0);
        assert_eq!(first.y, 10.0);
        assert_eq!(first.width, 30.0);
        assert_eq!(first.height, 30.0);

        let second = button_rect(1, false);
        assert_eq!(second.x, 80.0);
        assert_eq!(second.y, first.y);
    }

    #[test]
    fn test_button_colors_track_pressed_state() {
        assert_eq!(button_rect(0, true).color, BUTTON_PRESSED_COLOR);
        assert_eq!(button_rect(0, false).color, BUTTON_RELEASED_COLOR);
    }
}
