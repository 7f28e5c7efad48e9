//! Input controller
//!
//! Maps the single hold control and the auxiliary controls (reset, mute,
//! pace) onto session, score and audio mutations.

use crate::audio::{AudioEngine, AudioError, ToneBackend};
use crate::consts::PACE_DEFAULT;
use crate::persistence::{Persistence, ScoreRecord, ScoreStore, ScoreUpdate};
use crate::sim::{BreathEvent, BreathPhase, BreathSession};

/// `KeyboardEvent.code` of the hold control
pub const CONTROL_KEY_CODE: &str = "Space";

/// Keyboard signal after repeat filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySignal {
    Press,
    Release,
}

impl KeySignal {
    /// Classify a key event. Auto-repeat and other keys map to `None`.
    pub fn from_key(code: &str, pressed: bool, repeat: bool) -> Option<Self> {
        if code != CONTROL_KEY_CODE {
            return None;
        }
        match (pressed, repeat) {
            (true, false) => Some(KeySignal::Press),
            (true, true) => None,
            (false, _) => Some(KeySignal::Release),
        }
    }
}

/// Holds control state and the live pace value
#[derive(Debug, Clone)]
pub struct InputController {
    control_held: bool,
    pace: f32,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new(PACE_DEFAULT)
    }
}

impl InputController {
    pub fn new(pace: f32) -> Self {
        Self {
            control_held: false,
            pace: crate::clamp_pace(pace).unwrap_or(PACE_DEFAULT),
        }
    }

    pub fn control_held(&self) -> bool {
        self.control_held
    }

    /// Pace read by the next tick
    pub fn pace(&self) -> f32 {
        self.pace
    }

    /// Start inhaling. Ignored while already held. Lazily starts the tone.
    /// Returns true when the press was accepted.
    pub fn on_control_press<B, F>(
        &mut self,
        session: &mut BreathSession,
        audio: &mut AudioEngine<B>,
        start_tone: F,
    ) -> bool
    where
        B: ToneBackend,
        F: FnOnce() -> Result<B, AudioError>,
    {
        if self.control_held {
            return false;
        }
        self.control_held = true;
        audio.ensure_started(start_tone);
        session.set_phase(BreathPhase::Inhaling);
        audio.set_active(true);
        true
    }

    /// Start exhaling
    pub fn on_control_release<B: ToneBackend>(
        &mut self,
        session: &mut BreathSession,
        audio: &mut AudioEngine<B>,
    ) {
        self.control_held = false;
        session.set_phase(BreathPhase::Exhaling);
        audio.set_active(false);
    }

    /// Clear the session count. The best score is untouched.
    pub fn on_reset(&mut self, session: &mut BreathSession) -> BreathEvent {
        session.reset_count();
        log::debug!("Breath count reset");
        BreathEvent::CountReset
    }

    /// Flip the sound flag, persist it and re-target the tone gain
    pub fn on_toggle_sound<B: ToneBackend, S: ScoreStore>(
        &mut self,
        score: &mut ScoreRecord,
        audio: &mut AudioEngine<B>,
        persistence: &Persistence<S>,
    ) -> BreathEvent {
        score.sound_enabled = !score.sound_enabled;
        persistence.save(ScoreUpdate::SoundEnabled(score.sound_enabled));
        // Gain follows immediately, even mid-inhale
        audio.set_sound_enabled(score.sound_enabled);
        log::info!("Sound {}", if score.sound_enabled { "on" } else { "off" });
        BreathEvent::SoundToggled {
            enabled: score.sound_enabled,
        }
    }

    /// Store a new pace, clamped to the selector range. Non-finite values
    /// are ignored. Returns the pace now in effect.
    pub fn set_pace(&mut self, value: f32) -> f32 {
        match crate::clamp_pace(value) {
            Some(pace) => self.pace = pace,
            None => log::warn!("Ignoring invalid pace {}", value),
        }
        self.pace
    }

    /// Parse and store a pace from a text control value
    pub fn set_pace_str(&mut self, value: &str) -> f32 {
        match value.trim().parse::<f32>() {
            Ok(pace) => self.set_pace(pace),
            Err(_) => {
                log::warn!("Ignoring non-numeric pace {:?}", value);
                self.pace
            }
        }
    }
}
