//! Audio feedback engine
//!
//! One continuous sine tone that is never restarted. Size maps to pitch,
//! inhaling (with sound on) maps to a soft gain. Every change is smoothed:
//! gain ramps linearly, frequency approaches its target exponentially.
//!
//! The tone source can only be created after a user gesture, so the engine
//! starts `Uninitialized` and becomes `Ready` on the first press.

pub mod voice;
#[cfg(target_arch = "wasm32")]
pub mod web;

use thiserror::Error;

use crate::consts::*;
use crate::lerp;

pub use voice::SineVoice;
#[cfg(target_arch = "wasm32")]
pub use web::WebTone;

/// Audio failures. Never fatal - the engine goes quiet instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    #[error("Audio context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("Audio node error: {0}")]
    Node(String),
}

/// A continuous tone generator with automatable frequency and gain
pub trait ToneBackend {
    /// Cancel pending gain changes and ramp linearly to `target` over `ramp_secs`
    fn ramp_gain(&mut self, target: f32, ramp_secs: f64) -> Result<(), AudioError>;
    /// Approach `target_hz` exponentially with the given time constant
    fn approach_frequency(&mut self, target_hz: f32, time_constant: f64) -> Result<(), AudioError>;
    /// Stop the tone and release platform resources
    fn stop(&mut self);
}

/// Tone source lifecycle
#[derive(Debug)]
pub enum ToneState<B> {
    /// Waiting for the first user gesture
    Uninitialized,
    /// Tone running (possibly silent)
    Ready(B),
    /// Platform refused audio; stays silent for the session
    Failed,
    /// Torn down
    Stopped,
}

/// Map a normalized size in [0, 1] to the tone frequency range
#[inline]
pub fn frequency_for(normalized: f32) -> f32 {
    lerp(FREQ_MIN_HZ, FREQ_MAX_HZ, normalized.clamp(0.0, 1.0))
}

/// Gain the tone should head toward
#[inline]
pub fn gain_for(active: bool, sound_enabled: bool) -> f32 {
    if active && sound_enabled { TONE_GAIN } else { 0.0 }
}

/// Drives a `ToneBackend` from breath state
#[derive(Debug)]
pub struct AudioEngine<B> {
    state: ToneState<B>,
    sound_enabled: bool,
    active: bool,
    gain_target: f32,
    frequency_target: f32,
    /// A frequency update already failed and was logged
    frequency_warned: bool,
}

impl<B: ToneBackend> Default for AudioEngine<B> {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<B: ToneBackend> AudioEngine<B> {
    pub fn new(sound_enabled: bool) -> Self {
        Self {
            state: ToneState::Uninitialized,
            sound_enabled,
            active: false,
            gain_target: 0.0,
            frequency_target: TONE_BASE_HZ,
            frequency_warned: false,
        }
    }

    /// Start the tone source on first call; later calls are no-ops.
    /// Returns true when the tone is running.
    pub fn ensure_started<F>(&mut self, start: F) -> bool
    where
        F: FnOnce() -> Result<B, AudioError>,
    {
        if matches!(self.state, ToneState::Uninitialized) {
            self.state = match start() {
                Ok(backend) => {
                    log::info!("Tone started");
                    ToneState::Ready(backend)
                }
                Err(e) => {
                    log::warn!("Audio disabled: {}", e);
                    ToneState::Failed
                }
            };
        }
        self.is_ready()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ToneState::Ready(_))
    }

    pub fn state(&self) -> &ToneState<B> {
        &self.state
    }

    pub fn backend_mut(&mut self) -> Option<&mut B> {
        match &mut self.state {
            ToneState::Ready(backend) => Some(backend),
            _ => None,
        }
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Change the sound flag and re-target gain for the current activity
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
        self.set_active(self.active);
    }

    /// Last requested gain target
    pub fn gain_target(&self) -> f32 {
        self.gain_target
    }

    /// Last requested frequency target
    pub fn frequency_target(&self) -> f32 {
        self.frequency_target
    }

    /// Ramp toward the soft gain when active and sound is on, else to silence
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.gain_target = gain_for(active, self.sound_enabled);
        let target = self.gain_target;
        if let ToneState::Ready(backend) = &mut self.state {
            if let Err(e) = backend.ramp_gain(target, GAIN_RAMP_SECS) {
                log::warn!("Gain ramp failed: {}", e);
            }
        }
    }

    /// Track the circle size (called once per frame)
    pub fn update_frequency(&mut self, normalized: f32) {
        self.frequency_target = frequency_for(normalized);
        let target = self.frequency_target;
        if let ToneState::Ready(backend) = &mut self.state {
            // Runs every frame: report the first failure only
            if let Err(e) = backend.approach_frequency(target, FREQ_SMOOTHING_SECS) {
                if !self.frequency_warned {
                    log::warn!("Frequency update failed: {}", e);
                    self.frequency_warned = true;
                }
            }
        }
    }

    /// Stop the tone for good
    pub fn teardown(&mut self) {
        if let ToneState::Ready(mut backend) = std::mem::replace(&mut self.state, ToneState::Stopped) {
            backend.stop();
            log::info!("Tone stopped");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Backend call log for assertions
    #[derive(Debug, Clone, PartialEq)]
    pub enum ToneCall {
        Gain(f32, f64),
        Frequency(f32, f64),
        Stop,
    }

    #[derive(Debug, Default)]
    pub struct RecordingTone {
        pub calls: Vec<ToneCall>,
    }

    impl RecordingTone {
        pub fn last_gain(&self) -> Option<f32> {
            self.calls.iter().rev().find_map(|c| match c {
                ToneCall::Gain(g, _) => Some(*g),
                _ => None,
            })
        }
    }

    impl ToneBackend for RecordingTone {
        fn ramp_gain(&mut self, target: f32, ramp_secs: f64) -> Result<(), AudioError> {
            self.calls.push(ToneCall::Gain(target, ramp_secs));
            Ok(())
        }
        fn approach_frequency(&mut self, target_hz: f32, time_constant: f64) -> Result<(), AudioError> {
            self.calls.push(ToneCall::Frequency(target_hz, time_constant));
            Ok(())
        }
        fn stop(&mut self) {
            self.calls.push(ToneCall::Stop);
        }
    }

    /// Backend whose frequency automation always fails
    #[derive(Debug, Default)]
    struct BrokenTone {
        attempts: u32,
    }

    impl ToneBackend for BrokenTone {
        fn ramp_gain(&mut self, _target: f32, _ramp_secs: f64) -> Result<(), AudioError> {
            Ok(())
        }
        fn approach_frequency(&mut self, _target_hz: f32, _time_constant: f64) -> Result<(), AudioError> {
            self.attempts += 1;
            Err(AudioError::Node("frequency param detached".into()))
        }
        fn stop(&mut self) {}
    }

    fn started() -> AudioEngine<RecordingTone> {
        let mut engine = AudioEngine::new(true);
        assert!(engine.ensure_started(|| Ok(RecordingTone::default())));
        engine
    }

    #[test]
    fn test_frequency_mapping() {
        assert_eq!(frequency_for(0.0), 180.0);
        assert_eq!(frequency_for(1.0), 260.0);
        assert_eq!(frequency_for(0.5), 220.0);
        assert_eq!(frequency_for(4.0), 260.0);
    }

    #[test]
    fn test_ensure_started_runs_once() {
        let mut engine = started();
        let mut called = false;
        engine.ensure_started(|| {
            called = true;
            Ok(RecordingTone::default())
        });
        assert!(!called);
    }

    #[test]
    fn test_failed_start_is_silent() {
        let mut engine: AudioEngine<RecordingTone> = AudioEngine::new(true);
        assert!(!engine.ensure_started(|| Err(AudioError::ContextUnavailable("blocked".into()))));
        assert!(matches!(engine.state(), ToneState::Failed));
        // Guarded calls do nothing, targets still tracked
        engine.set_active(true);
        engine.update_frequency(1.0);
        assert_eq!(engine.gain_target(), TONE_GAIN);
        assert_eq!(engine.frequency_target(), 260.0);
        // No second attempt
        assert!(!engine.ensure_started(|| Ok(RecordingTone::default())));
    }

    #[test]
    fn test_calls_before_start_are_noops() {
        let mut engine: AudioEngine<RecordingTone> = AudioEngine::new(true);
        engine.set_active(true);
        engine.update_frequency(0.3);
        engine.teardown();
        assert!(matches!(engine.state(), ToneState::Uninitialized));
    }

    #[test]
    fn test_active_ramps_with_fixed_duration() {
        let mut engine = started();
        engine.set_active(true);
        engine.set_active(false);
        let backend = engine.backend_mut().unwrap();
        assert_eq!(
            backend.calls,
            vec![
                ToneCall::Gain(TONE_GAIN, GAIN_RAMP_SECS),
                ToneCall::Gain(0.0, GAIN_RAMP_SECS)
            ]
        );
    }

    #[test]
    fn test_mute_targets_silence_while_active() {
        let mut engine = started();
        engine.set_active(true);
        engine.set_sound_enabled(false);
        assert_eq!(engine.gain_target(), 0.0);
        assert_eq!(engine.backend_mut().unwrap().last_gain(), Some(0.0));
        // Tone keeps running
        assert!(engine.is_ready());
        engine.set_sound_enabled(true);
        assert_eq!(engine.gain_target(), TONE_GAIN);
    }

    #[test]
    fn test_frequency_uses_smoothing() {
        let mut engine = started();
        engine.update_frequency(0.25);
        assert_eq!(
            engine.backend_mut().unwrap().calls,
            vec![ToneCall::Frequency(200.0, FREQ_SMOOTHING_SECS)]
        );
    }

    #[test]
    fn test_frequency_failure_flagged_once_and_retried() {
        let mut engine: AudioEngine<BrokenTone> = AudioEngine::new(true);
        assert!(engine.ensure_started(|| Ok(BrokenTone::default())));
        assert!(!engine.frequency_warned);

        engine.update_frequency(0.2);
        assert!(engine.frequency_warned);
        engine.update_frequency(0.4);
        engine.update_frequency(0.6);

        // Every frame still tries, and targets keep tracking
        assert_eq!(engine.backend_mut().unwrap().attempts, 3);
        assert!(engine.frequency_warned);
        assert_eq!(engine.frequency_target(), frequency_for(0.6));
        assert!(engine.is_ready());
    }

    #[test]
    fn test_teardown_stops_once() {
        let mut engine = started();
        engine.teardown();
        engine.teardown();
        assert!(matches!(engine.state(), ToneState::Stopped));
        // Cannot be restarted after teardown
        assert!(!engine.ensure_started(|| Ok(RecordingTone::default())));
    }
}
