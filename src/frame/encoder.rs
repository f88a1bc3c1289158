//! # Frame Encoder
//!
//! Encodes controller state into outbound text frames.

use crate::controller::InputState;

/// Encode controller state into a complete outbound frame
///
/// Axes are formatted with exactly two decimal digits (fixed point, never
/// scientific notation), buttons as the literal digit `1` or `0`. All axis
/// fields come first, then all button fields, comma-joined, with a single
/// trailing newline. The receiver relies on the field count and order
/// matching the sampler's fixed layout; there is no length prefix.
///
/// # Arguments
///
/// * `state` - Sampled axis and button state
///
/// # Returns
///
/// * `String` - One newline-terminated frame
///
/// # Examples
///
/// ```
/// use joylink::controller::InputState;
/// use joylink::frame::encode_frame;
///
/// let state = InputState {
///     axes: vec![0.1234, -1.0],
///     buttons: vec![true, false],
/// };
/// assert_eq!(encode_frame(&state), "0.12,-1.00,1,0\n");
/// ```
pub fn encode_frame(state: &InputState) -> String {
    let axes = state
        .axes
        .iter()
        .map(|v| format!("{:.2}", v))
        .collect::<Vec<_>>()
        .join(",");

    let buttons = state
        .buttons
        .iter()
        .map(|&b| if b { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(",");

    format!("{},{}\n", axes, buttons)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(axes: Vec<f32>, buttons: Vec<bool>) -> InputState {
        InputState { axes, buttons }
    }

    #[test]
    fn test_encode_frame_reference_values() {
        let frame = encode_frame(&state(vec![0.1234, -1.0], vec![true, false]));
        assert_eq!(frame, "0.12,-1.00,1,0\n");
    }

    #[test]
    fn test_encode_frame_two_decimal_fixed_point() {
        let frame = encode_frame(&state(vec![0.0, 1.0, -0.5], vec![false]));
        // Never scientific notation, always two digits after the point
        assert_eq!(frame, "0.00,1.00,-0.50,0\n");
    }

    #[test]
    fn test_encode_frame_field_order_axes_then_buttons() {
        let frame = encode_frame(&state(vec![0.5, -0.5], vec![true, true, false]));
        assert_eq!(frame, "0.50,-0.50,1,1,0\n");
    }

    #[test]
    fn test_encode_frame_single_trailing_newline() {
        let frame = encode_frame(&state(vec![0.25], vec![true]));
        assert!(frame.ends_with('\n'));
        assert_eq!(frame.matches('\n').count(), 1);
    }

    #[test]
    fn test_encode_frame_field_count_mirrors_state() {
        let frame = encode_frame(&state(vec![0.1, 0.2, 0.3, 0.4], vec![false; 8]));
        let fields = frame.trim_end().split(',').count();
        assert_eq!(fields, 4 + 8);
    }

    #[test]
    fn test_encode_frame_rounds_to_two_decimals() {
        let frame = encode_frame(&state(vec![0.999, -0.994], vec![true]));
        assert_eq!(frame, "1.00,-0.99,1\n");
    }
}
