//! Heads-up display text
//!
//! Labels change only when a `BreathEvent` says so, never on a timer.

use crate::sim::BreathEvent;

/// A text element of the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudField {
    Breaths,
    Best,
    Sound,
}

impl HudField {
    pub const ALL: [HudField; 3] = [HudField::Breaths, HudField::Best, HudField::Sound];

    /// DOM element id on the web host
    pub fn element_id(&self) -> &'static str {
        match self {
            HudField::Breaths => "breaths",
            HudField::Best => "best",
            HudField::Sound => "mute",
        }
    }
}

/// Displayed values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub breaths: u32,
    pub best: u32,
    pub sound_enabled: bool,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            breaths: 0,
            best: 0,
            sound_enabled: true,
        }
    }
}

impl Hud {
    /// Update from an event, returning the fields whose text changed
    pub fn apply(&mut self, event: &BreathEvent) -> &'static [HudField] {
        match *event {
            BreathEvent::PeakReached => &[],
            BreathEvent::BreathCompleted { count } => {
                self.breaths = count;
                &[HudField::Breaths]
            }
            BreathEvent::NewBest { best } => {
                self.best = best;
                &[HudField::Best]
            }
            BreathEvent::CountReset => {
                self.breaths = 0;
                &[HudField::Breaths]
            }
            BreathEvent::SoundToggled { enabled } => {
                self.sound_enabled = enabled;
                &[HudField::Sound]
            }
            BreathEvent::ScoreLoaded {
                best,
                sound_enabled,
            } => {
                self.best = best;
                self.sound_enabled = sound_enabled;
                &[HudField::Best, HudField::Sound]
            }
        }
    }

    pub fn text(&self, field: HudField) -> String {
        match field {
            HudField::Breaths => format!("Breaths: {}", self.breaths),
            HudField::Best => format!("Best: {}", self.best),
            HudField::Sound => {
                format!("Sound: {}", if self.sound_enabled { "On" } else { "Off" })
            }
        }
    }

    /// `aria-pressed` value for the mute toggle (pressed = muted)
    pub fn mute_pressed(&self) -> &'static str {
        if self.sound_enabled { "false" } else { "true" }
    }
}
