//! Breath Pacer - hold to inhale, release to exhale
//!
//! Core modules:
//! - `sim`: Breath state machine (radius, direction, cycle counting)
//! - `input`: Control mapping (hold/release, reset, mute, pace)
//! - `audio`: Continuous tone that tracks the circle size
//! - `renderer`: 2D surface drawing of circle, aura and ring
//! - `persistence`: Best score and sound flag storage
//! - `hud`: Label text driven by breath events
//! - `app`: Frame loop driver (tick, audio, render)
//! - `script`: Scripted hold/release runs for headless hosts

pub mod app;
pub mod audio;
pub mod hud;
pub mod input;
pub mod persistence;
pub mod renderer;
pub mod script;
pub mod settings;
pub mod sim;

pub use app::App;
pub use hud::{Hud, HudField};
pub use input::InputController;
pub use persistence::{Persistence, ScoreRecord, ScoreStore, StoreError};
pub use settings::BreathSettings;
pub use sim::{BreathEvent, BreathPhase, BreathSession};

/// Breathing configuration constants
pub mod consts {
    /// Circle radius at full exhale (px)
    pub const MIN_RADIUS: f32 = 28.0;
    /// Circle radius at full inhale (px)
    pub const MAX_RADIUS: f32 = 110.0;
    /// Radius change per tick at pace 1.0 (px)
    pub const BASE_SPEED: f32 = 0.55;
    /// Exhale runs slightly slower than inhale
    pub const EXHALE_DAMPING: f32 = 0.9;

    /// Pace selector range
    pub const PACE_MIN: f32 = 0.5;
    pub const PACE_MAX: f32 = 2.0;
    pub const PACE_DEFAULT: f32 = 1.0;

    /// Tone gain while inhaling with sound on (very soft)
    pub const TONE_GAIN: f32 = 0.05;
    /// Linear gain ramp duration (s)
    pub const GAIN_RAMP_SECS: f64 = 0.05;
    /// Frequency smoothing time constant (s)
    pub const FREQ_SMOOTHING_SECS: f64 = 0.05;
    /// Tone frequency at min radius (Hz)
    pub const FREQ_MIN_HZ: f32 = 180.0;
    /// Tone frequency at max radius (Hz)
    pub const FREQ_MAX_HZ: f32 = 260.0;
    /// Oscillator frequency before the first update (Hz)
    pub const TONE_BASE_HZ: f32 = 220.0;

    /// Logical drawing surface size (px)
    pub const SURFACE_SIZE: f32 = 260.0;
    /// Nominal frame rate the per-tick speeds were tuned for
    pub const FRAME_RATE: f32 = 60.0;
}

/// Position of `value` within `[lo, hi]`, clamped to [0, 1]
#[inline]
pub fn normalize(value: f32, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return 0.0;
    }
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp a pace value into the selector range, rejecting non-finite input
#[inline]
pub fn clamp_pace(pace: f32) -> Option<f32> {
    pace.is_finite().then(|| pace.clamp(consts::PACE_MIN, consts::PACE_MAX))
}
