//! Sampled controller state.

/// One sample of the controller's axes and buttons
///
/// Axis values are normalized to [-1.0, 1.0]; buttons are pressed flags.
/// Both sequences keep the fixed order captured when the controller was
/// opened, which is also the field order of the outbound wire frame.
/// Produced fresh each loop iteration and not retained.
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    pub axes: Vec<f32>,
    pub buttons: Vec<bool>,
}

impl InputState {
    /// State with all axes centered and all buttons released
    pub fn neutral(axis_count: usize, button_count: usize) -> Self {
        Self {
            axes: vec![0.0; axis_count],
            buttons: vec![false; button_count],
        }
    }
}
