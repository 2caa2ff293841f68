use renderer::{FlyCamera, WaveCount};
use winit::keyboard::KeyCode;

/// What a key press asks the scene to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    SetWaves(WaveCount),
    TogglePolygonMode,
    Quit,
}

pub fn action_for(code: KeyCode) -> Option<InputAction> {
    let waves = |count: u32| WaveCount::try_from(count).ok().map(InputAction::SetWaves);
    match code {
        KeyCode::KeyW => Some(InputAction::MoveForward),
        KeyCode::KeyS => Some(InputAction::MoveBackward),
        KeyCode::KeyA => Some(InputAction::MoveLeft),
        KeyCode::KeyD => Some(InputAction::MoveRight),
        KeyCode::Digit1 => waves(1),
        KeyCode::Digit2 => waves(2),
        KeyCode::Digit3 => waves(3),
        KeyCode::Digit4 => waves(4),
        KeyCode::Tab => Some(InputAction::TogglePolygonMode),
        KeyCode::Escape => Some(InputAction::Quit),
        _ => None,
    }
}

/// Movement keys currently held down; applied once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
}

impl HeldKeys {
    /// Records a press or release. Returns false for non-movement actions.
    pub fn update(&mut self, action: InputAction, pressed: bool) -> bool {
        let slot = match action {
            InputAction::MoveForward => &mut self.forward,
            InputAction::MoveBackward => &mut self.backward,
            InputAction::MoveLeft => &mut self.left,
            InputAction::MoveRight => &mut self.right,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    pub fn apply_movement(&self, camera: &mut FlyCamera, speed: f32) {
        if self.forward {
            camera.move_forward(speed);
        }
        if self.backward {
            camera.move_backward(speed);
        }
        if self.left {
            camera.move_left(speed);
        }
        if self.right {
            camera.move_right(speed);
        }
    }
}

pub const CONTROLS_HELP: &[&str] = &[
    "W / S      move forward / backward",
    "A / D      strafe left / right",
    "mouse      look around",
    "1 - 4      number of summed waves",
    "Tab        toggle wireframe",
    "Esc        quit",
];
