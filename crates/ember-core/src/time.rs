//! Time system for the Ember engine
//!
//! Handles the per-frame clock and the fixed-step accumulator that decouples
//! the simulation rate from the render frame rate.

use serde::{Deserialize, Serialize};

/// How the simulation chooses the length of one sub-step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "seconds", rename_all = "snake_case")]
pub enum StepMode {
    /// Each sub-step lasts exactly this many seconds; only the iteration
    /// count varies between frames.
    Constant(f32),
    /// The sub-step equals the clamped frame delta, so the step length varies
    /// from frame to frame but never exceeds the frame clamp.
    FrameClamped,
}

impl Default for StepMode {
    fn default() -> Self {
        StepMode::Constant(1.0 / 60.0)
    }
}

/// Leftover simulated time carried between frames.
///
/// Usage per frame: [`begin_frame`](Self::begin_frame), then pull sub-steps
/// with [`next_step`](Self::next_step) until it returns `None`, then read
/// [`alpha`](Self::alpha) for render interpolation.
#[derive(Debug, Clone)]
pub struct StepAccumulator {
    mode: StepMode,
    max_frame_dt: f32,
    max_substeps: u32,
    accumulator: f32,
    step: f32,
    steps_taken: u32,
}

impl StepAccumulator {
    pub fn new(mode: StepMode, max_frame_dt: f32, max_substeps: u32) -> Self {
        Self {
            mode,
            max_frame_dt: max_frame_dt.max(0.0),
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
            step: 0.0,
            steps_taken: 0,
        }
    }

    /// Clamp the frame delta, add it to the accumulator and fix the step size
    /// for this frame. Returns the clamped delta.
    pub fn begin_frame(&mut self, frame_dt: f32) -> f32 {
        let clamped = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, self.max_frame_dt)
        } else {
            0.0
        };
        self.accumulator += clamped;
        self.step = match self.mode {
            StepMode::Constant(step) => step.max(0.0),
            StepMode::FrameClamped => clamped,
        };
        self.steps_taken = 0;
        clamped
    }

    /// Consume one sub-step from the accumulator, if a whole one is available
    /// and the per-frame iteration cap has not been reached.
    pub fn next_step(&mut self) -> Option<f32> {
        if self.step <= 0.0
            || self.accumulator < self.step
            || self.steps_taken >= self.max_substeps
        {
            return None;
        }
        self.accumulator -= self.step;
        self.steps_taken += 1;
        Some(self.step)
    }

    /// Discard any whole steps still pending after the iteration cap was hit.
    /// Returns the number of seconds dropped.
    pub fn drop_excess(&mut self) -> f32 {
        if self.step <= 0.0 || self.accumulator < self.step {
            return 0.0;
        }
        let kept = self.accumulator % self.step;
        let dropped = self.accumulator - kept;
        self.accumulator = kept;
        dropped
    }

    /// Interpolation factor between the previous and current sub-step
    pub fn alpha(&self) -> f32 {
        if self.step <= 0.0 {
            return 0.0;
        }
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }

    /// Step length fixed by the last `begin_frame`
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Sub-steps consumed since the last `begin_frame`
    pub fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    /// Simulated time not yet consumed
    pub fn accumulated(&self) -> f32 {
        self.accumulator
    }

    pub fn mode(&self) -> StepMode {
        self.mode
    }
}

/// Configuration for game time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many in-game seconds pass per real second
    pub time_scale: f32,
    /// Maximum delta time handed to systems
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delta_time: 0.25,
        }
    }
}

/// Game time tracking
#[derive(Debug, Clone, Default)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since game start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped and scaled)
    pub delta_time: f32,
    /// Unscaled delta time
    pub unscaled_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Whether the game is paused
    pub paused: bool,
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Update the game time with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.clamp(0.0, self.config.max_delta_time);
        self.frame_count += 1;

        if self.paused {
            self.delta_time = 0.0;
            return;
        }

        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
    }

    /// Pause the game
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume the game
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal, 2.0 = double speed)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}
