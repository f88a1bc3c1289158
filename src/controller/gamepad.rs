//! # Gamepad Sampler
//!
//! Detects the first connected gamepad via gilrs and samples its state.
//!
//! ## Layout
//!
//! gilrs exposes gamepad state keyed by `Axis`/`Button`, not as ordered
//! sequences. The layout (which axes and buttons exist, and in what order
//! they appear on the wire and in the visualization) is captured once at
//! open time by probing the candidate lists below against the hardware, and
//! never changes mid-run.

use gilrs::{Axis, Button, Gilrs};
use tracing::{debug, info};

use crate::controller::state::InputState;
use crate::error::{JoyLinkError, Result};

/// Candidate axes, in wire/display order. Sticks first so axes 0..=1 are
/// the left stick and 2..=3 the right stick.
const AXIS_LAYOUT: [Axis; 6] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::RightStickX,
    Axis::RightStickY,
    Axis::LeftZ,
    Axis::RightZ,
];

/// Candidate buttons, in wire/display order.
const BUTTON_LAYOUT: [Button; 17] = [
    Button::South,
    Button::East,
    Button::North,
    Button::West,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::Mode,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
];

/// Game controller handle
///
/// Represents an active connection to the first detected gamepad, together
/// with the fixed axis/button layout captured at open time.
pub struct Controller {
    gilrs: Gilrs,
    id: gilrs::GamepadId,
    name: String,
    axes: Vec<Axis>,
    buttons: Vec<Button>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("name", &self.name)
            .field("axes", &self.axes.len())
            .field("buttons", &self.buttons.len())
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Detect and open the first connected gamepad
    ///
    /// # Returns
    ///
    /// Returns `Ok(Controller)` if a gamepad is found.
    ///
    /// # Errors
    ///
    /// - `Controller`: the gilrs backend failed to initialize
    /// - `ControllerNotFound`: zero gamepads connected
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use joylink::controller::Controller;
    ///
    /// let mut controller = Controller::open()?;
    /// println!("Connected to: {}", controller.name());
    /// # Ok::<(), joylink::error::JoyLinkError>(())
    /// ```
    pub fn open() -> Result<Self> {
        let mut gilrs = Gilrs::new().map_err(|e| {
            JoyLinkError::Controller(format!("failed to initialize gamepad backend: {}", e))
        })?;

        // Drain startup events so freshly connected pads are visible
        while gilrs.next_event().is_some() {}

        let (id, name) = gilrs
            .gamepads()
            .find(|(_, gamepad)| gamepad.is_connected())
            .map(|(id, gamepad)| (id, gamepad.name().to_string()))
            .ok_or(JoyLinkError::ControllerNotFound)?;

        let gamepad = gilrs.gamepad(id);
        let axes: Vec<Axis> = AXIS_LAYOUT
            .iter()
            .copied()
            .filter(|&axis| gamepad.axis_code(axis).is_some())
            .collect();
        let buttons: Vec<Button> = BUTTON_LAYOUT
            .iter()
            .copied()
            .filter(|&button| gamepad.button_code(button).is_some())
            .collect();

        info!(
            "Found gamepad \"{}\" ({} axes, {} buttons)",
            name,
            axes.len(),
            buttons.len()
        );
        debug!("Axis layout: {:?}", axes);
        debug!("Button layout: {:?}", buttons);

        Ok(Self {
            gilrs,
            id,
            name,
            axes,
            buttons,
        })
    }

    /// Sample the current axis and button state
    ///
    /// Drains the gilrs event queue first (gilrs only updates its cached
    /// gamepad state while events are being pumped), then reads every axis
    /// and button of the fixed layout from the cached state. Axes that have
    /// not reported yet read 0.0 (centered); values are clamped to
    /// [-1.0, 1.0].
    pub fn sample(&mut self) -> InputState {
        while self.gilrs.next_event().is_some() {}

        let gamepad = self.gilrs.gamepad(self.id);

        let axes = self
            .axes
            .iter()
            .map(|&axis| {
                gamepad
                    .axis_data(axis)
                    .map(|data| data.value().clamp(-1.0, 1.0))
                    .unwrap_or(0.0)
            })
            .collect();

        let buttons = self
            .buttons
            .iter()
            .map(|&button| gamepad.is_pressed(button))
            .collect();

        InputState { axes, buttons }
    }

    /// Human-readable name of the connected gamepad
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of axes in the fixed layout
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Number of buttons in the fixed layout
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }
}
