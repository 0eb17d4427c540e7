use shared::{RenderParameters, ITERATION_STEP};
use tracing::debug;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;

use crate::state::SharedParameters;

/// Pixel scroll deltas (touchpads) are converted to wheel lines at this rate.
const PIXELS_PER_LINE: f64 = 20.0;

/// Held during scrolling to change the iteration count instead of zooming.
const ITERATION_MODIFIER: KeyCode = KeyCode::KeyS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    ZoomIn,
    ZoomOut,
    MoreIterations,
    FewerIterations,
    ToggleAutoZoom,
    Reset,
    ToggleFrequency,
    ToggleUv,
    NextPalette,
    PrintSnapshot,
    ToggleFps,
    Exit,
}

impl Command {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        let command = match code {
            KeyCode::NumpadAdd => Command::ZoomIn,
            KeyCode::NumpadSubtract => Command::ZoomOut,
            KeyCode::KeyE => Command::MoreIterations,
            KeyCode::KeyQ => Command::FewerIterations,
            KeyCode::KeyZ => Command::ToggleAutoZoom,
            KeyCode::KeyR => Command::Reset,
            KeyCode::KeyF => Command::ToggleFrequency,
            KeyCode::KeyG => Command::ToggleUv,
            KeyCode::KeyN => Command::NextPalette,
            KeyCode::KeyP => Command::PrintSnapshot,
            KeyCode::KeyA => Command::ToggleFps,
            KeyCode::Escape => Command::Exit,
            _ => return None,
        };
        Some(command)
    }
}

/// Turns window input into parameter changes. Commands that need the GPU
/// side (palette switch), the frame counter or the event loop (exit) are
/// handed back to the caller.
pub struct InputDispatcher {
    params: SharedParameters,
    cursor: PhysicalPosition<f64>,
    modifier_held: bool,
}

impl InputDispatcher {
    pub fn new(params: SharedParameters) -> Self {
        Self {
            params,
            cursor: PhysicalPosition::new(0.0, 0.0),
            modifier_held: false,
        }
    }

    /// Handles a key transition. Auto-repeat and releases never trigger a
    /// command.
    pub fn key(&mut self, code: KeyCode, state: ElementState, repeat: bool) -> Option<Command> {
        if code == ITERATION_MODIFIER {
            self.modifier_held = state == ElementState::Pressed;
        }

        if state != ElementState::Pressed || repeat {
            return None;
        }

        let command = Command::from_key(code)?;
        self.apply(command);
        Some(command)
    }

    fn apply(&self, command: Command) {
        self.params.update(|params| match command {
            Command::ZoomIn => params.zoom_in(),
            Command::ZoomOut => params.zoom_out(),
            Command::MoreIterations => params.add_iterations(ITERATION_STEP),
            Command::FewerIterations => params.add_iterations(-ITERATION_STEP),
            Command::ToggleAutoZoom => {
                params.toggle_auto_zoom();
                debug!(on = params.auto_zoom, "auto zoom");
            }
            Command::Reset => params.reset(),
            Command::ToggleFrequency => {
                params.toggle_frequency_animation();
                debug!(on = params.animate_frequency, "frequency animation");
            }
            Command::ToggleUv => {
                params.toggle_uv_animation();
                debug!(on = params.animate_uv, "uv animation");
            }
            Command::PrintSnapshot => println!("{params}"),
            Command::NextPalette | Command::ToggleFps | Command::Exit => {}
        });
    }

    pub fn mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }

        let PhysicalPosition { x, y } = self.cursor;
        self.params.update(|params| match state {
            ElementState::Pressed => params.begin_drag(x, y),
            ElementState::Released => params.end_drag(),
        });
    }

    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = position;
        self.params
            .update(|params| params.drag_to(position.x, position.y));
    }

    pub fn scroll(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y as f64,
            MouseScrollDelta::PixelDelta(position) => position.y / PIXELS_PER_LINE,
        };

        if self.modifier_held {
            self.params.update(|params| params.scroll_iterations(lines));
        } else {
            self.params.update(|params| params.scroll_zoom(lines));
        }
    }

    /// Drops held keys and any drag, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.modifier_held = false;
        self.params.update(RenderParameters::end_drag);
    }
}
