use std::collections::HashSet;

use nalgebra::*;
use winit::{
    event::*,
    keyboard::{KeyCode, PhysicalKey},
};

use crate::render::camera::Projection;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyInput {
    Keyboard(KeyCode),
    Mouse(MouseButton),
}

macro_rules! impl_from_for_keyinput {
    ($ty:ty, $key:ident) => {
        impl From<$ty> for KeyInput {
            fn from(value: $ty) -> Self {
                KeyInput::$key(value)
            }
        }
    };
}
impl_from_for_keyinput!(MouseButton, Mouse);
impl_from_for_keyinput!(KeyCode, Keyboard);

/// Pixels per line for touchpads that report pixel deltas.
const PIXELS_PER_LINE: f32 = 20.0;

/// Input merged over one frame: presses ignore key repeat, deltas add up.
#[derive(Debug, Default)]
pub struct Input {
    mouse_dpos: Vector2<f32>,
    mouse_dwheel: Vector2<f32>,

    pressed: HashSet<KeyInput>,
    just_pressed: HashSet<KeyInput>,
    just_released: HashSet<KeyInput>,
}

impl Input {
    /// Call once the frame has consumed the input.
    pub fn end_frame(&mut self) {
        self.mouse_dpos = Vector2::zeros();
        self.mouse_dwheel = Vector2::zeros();
        self.just_pressed.clear();
        self.just_released.clear();
    }

    pub fn handle_event<T>(&mut self, event: &Event<T>) {
        match event {
            Event::WindowEvent { event, .. } => self.handle_window_event(event),
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => {
                self.mouse_dpos += Vector2::new(delta.0 as f32, delta.1 as f32);
            }
            _ => {}
        }
    }

    fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if *repeat {
                    return;
                }
                match state {
                    ElementState::Pressed => self.record_pressed(*code),
                    ElementState::Released => self.record_released(*code),
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.record_pressed(*button),
                ElementState::Released => self.record_released(*button),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(x, y) => Vector2::new(*x, *y),
                    MouseScrollDelta::PixelDelta(p) => {
                        Vector2::new(p.x as f32, p.y as f32) / PIXELS_PER_LINE
                    }
                };
                self.mouse_dwheel += lines;
            }
            WindowEvent::Focused(false) => {
                // releases are lost while unfocused
                let held: Vec<_> = self.pressed.iter().copied().collect();
                for key in held {
                    self.record_released(key);
                }
            }
            _ => {}
        }
    }

    fn record_pressed(&mut self, key: impl Into<KeyInput>) {
        let key: KeyInput = key.into();
        if self.pressed.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    fn record_released(&mut self, key: impl Into<KeyInput>) {
        let key: KeyInput = key.into();
        if self.pressed.remove(&key) {
            self.just_released.insert(key);
        }
    }
}

impl Input {
    pub fn is_pressed(&self, key: impl Into<KeyInput>) -> bool {
        self.pressed.contains(&key.into())
    }
    pub fn is_just_pressed(&self, key: impl Into<KeyInput>) -> bool {
        self.just_pressed.contains(&key.into())
    }
    pub fn is_just_released(&self, key: impl Into<KeyInput>) -> bool {
        self.just_released.contains(&key.into())
    }
    pub fn get_mouse_delta_pos(&self) -> Vector2<f32> {
        self.mouse_dpos
    }
    pub fn get_mouse_delta_wheel(&self) -> Vector2<f32> {
        self.mouse_dwheel
    }
}

/// Movement keys: +x right, +y up, -z forward, in camera space.
const MOVE_KEYS: [(KeyCode, usize, f32); 6] = [
    (KeyCode::KeyW, 2, -1.0),
    (KeyCode::KeyS, 2, 1.0),
    (KeyCode::KeyA, 0, -1.0),
    (KeyCode::KeyD, 0, 1.0),
    (KeyCode::KeyQ, 1, -1.0),
    (KeyCode::KeyE, 1, 1.0),
];

/// Held keys turned into camera actions.
#[derive(Debug, Default)]
pub struct InputAction {
    move_hold: Vec<KeyCode>,
    pos_move: Vector3<f32>,
    projection: Option<Projection>,
}

impl InputAction {
    pub fn update(&mut self, input: &Input) {
        for (key, _, _) in MOVE_KEYS {
            if input.is_just_pressed(key) && !self.move_hold.contains(&key) {
                self.move_hold.push(key);
            }
            if !input.is_pressed(key) {
                self.move_hold.retain(|k| *k != key);
            }
        }

        // on an opposing pair the most recent press wins
        self.pos_move = Vector3::zeros();
        for held in self.move_hold.iter().rev() {
            if let Some((_, axis, sign)) = MOVE_KEYS.iter().find(|(k, _, _)| k == held) {
                if self.pos_move[*axis] == 0.0 {
                    self.pos_move[*axis] = *sign;
                }
            }
        }

        self.projection = if input.is_just_pressed(KeyCode::KeyP) {
            Some(Projection::Perspective)
        } else if input.is_just_pressed(KeyCode::KeyO) {
            Some(Projection::Orthographic)
        } else {
            None
        };
    }

    pub fn get_move(&self) -> Vector3<f32> {
        self.pos_move
    }

    pub fn get_projection(&self) -> Option<Projection> {
        self.projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presses_are_per_frame() {
        let mut input = Input::default();
        input.record_pressed(KeyCode::KeyW);
        input.record_pressed(KeyCode::KeyW);
        assert!(input.is_just_pressed(KeyCode::KeyW));
        input.end_frame();
        assert!(input.is_pressed(KeyCode::KeyW));
        assert!(!input.is_just_pressed(KeyCode::KeyW));
        input.record_released(KeyCode::KeyW);
        assert!(input.is_just_released(KeyCode::KeyW));
        assert!(!input.is_pressed(KeyCode::KeyW));
    }

    #[test]
    fn losing_focus_releases_held_keys() {
        let mut input = Input::default();
        input.record_pressed(KeyCode::KeyW);
        input.record_pressed(MouseButton::Left);
        input.end_frame();
        input.handle_window_event(&WindowEvent::Focused(false));
        assert!(!input.is_pressed(KeyCode::KeyW));
        assert!(input.is_just_released(KeyCode::KeyW));
        assert!(input.is_just_released(MouseButton::Left));
        input.handle_window_event(&WindowEvent::Focused(true));
        assert!(input.is_just_released(KeyCode::KeyW));
    }

    #[test]
    fn latest_of_opposing_keys_wins() {
        let mut input = Input::default();
        let mut action = InputAction::default();

        input.record_pressed(KeyCode::KeyD);
        action.update(&input);
        input.end_frame();
        assert_eq!(action.get_move(), Vector3::new(1.0, 0.0, 0.0));

        input.record_pressed(KeyCode::KeyA);
        input.record_pressed(KeyCode::KeyW);
        action.update(&input);
        input.end_frame();
        assert_eq!(action.get_move(), Vector3::new(-1.0, 0.0, -1.0));

        input.record_released(KeyCode::KeyA);
        action.update(&input);
        input.end_frame();
        assert_eq!(action.get_move(), Vector3::new(1.0, 0.0, -1.0));

        input.record_released(KeyCode::KeyD);
        input.record_released(KeyCode::KeyW);
        input.record_pressed(KeyCode::KeyE);
        action.update(&input);
        assert_eq!(action.get_move(), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn projection_keys() {
        let mut input = Input::default();
        let mut action = InputAction::default();
        input.record_pressed(KeyCode::KeyO);
        action.update(&input);
        assert_eq!(action.get_projection(), Some(Projection::Orthographic));
        input.end_frame();
        action.update(&input);
        assert_eq!(action.get_projection(), None);
    }
}
