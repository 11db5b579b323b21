//! Action-based input state
//!
//! The platform layer translates raw key and mouse events into actions and
//! feeds them into the [`InputState`] resource; controller systems only ever
//! read actions.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Jump,
    Fire,
    ZoomIn,
    ZoomOut,
    Pause,
}

/// Current state of all inputs for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Actions that were just pressed this frame
    pub just_pressed: HashSet<InputAction>,
    /// Actions that were just released this frame
    pub just_released: HashSet<InputAction>,
    /// Mouse movement delta for this frame
    pub mouse_delta: Vec2,
    /// Scroll wheel delta for this frame
    pub scroll_delta: f32,
    /// Whether the cursor is captured (invisible, locked)
    pub cursor_captured: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    pub fn is_just_released(&self, action: InputAction) -> bool {
        self.just_released.contains(&action)
    }

    /// Record a press. Repeats while held do not count as a new press.
    pub fn press(&mut self, action: InputAction) {
        if self.held.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    pub fn release(&mut self, action: InputAction) {
        if self.held.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Accumulate mouse motion; ignored unless the cursor is captured.
    pub fn add_mouse_motion(&mut self, delta: Vec2) {
        if self.cursor_captured {
            self.mouse_delta += delta;
        }
    }

    pub fn add_scroll(&mut self, delta: f32) {
        self.scroll_delta += delta;
        if delta > 0.0 {
            self.just_pressed.insert(InputAction::ZoomIn);
        } else if delta < 0.0 {
            self.just_pressed.insert(InputAction::ZoomOut);
        }
    }

    /// Held movement as (right, forward), each in `[-1, 1]`
    pub fn movement_axis(&self) -> Vec2 {
        let axis = |pos: InputAction, neg: InputAction| {
            (self.is_held(pos) as i8 - self.is_held(neg) as i8) as f32
        };
        Vec2::new(
            axis(InputAction::MoveRight, InputAction::MoveLeft),
            axis(InputAction::MoveForward, InputAction::MoveBackward),
        )
    }

    /// Clear frame-specific data (call at end of frame)
    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    pub fn clear_all(&mut self) {
        self.held.clear();
        self.clear_frame();
    }
}
