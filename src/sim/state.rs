//! Breath session state and events
//!
//! Everything the per-frame tick mutates lives here. Score and sound
//! preferences are kept in `persistence::ScoreRecord`.

use crate::settings::BreathSettings;

/// Direction the circle is moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreathPhase {
    /// Control held, circle growing
    Inhaling,
    /// Control released, circle shrinking
    #[default]
    Exhaling,
}

/// Something the host may want to react to (HUD text, logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathEvent {
    /// Radius reached max while inhaling (once per inhale)
    PeakReached,
    /// Full inhale followed by full exhale
    BreathCompleted { count: u32 },
    /// Session count beat the stored best
    NewBest { best: u32 },
    /// Session count cleared by the reset control
    CountReset,
    /// Sound preference flipped
    SoundToggled { enabled: bool },
    /// Stored score arrived from persistence
    ScoreLoaded { best: u32, sound_enabled: bool },
}

/// The breathing circle and its cycle counter
#[derive(Debug, Clone, PartialEq)]
pub struct BreathSession {
    /// Current circle radius (always within [min_radius, max_radius])
    pub radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Radius change per tick at pace 1.0
    pub base_speed: f32,
    /// Exhale speed multiplier
    pub exhale_damping: f32,
    /// Current direction
    pub phase: BreathPhase,
    /// Max radius was reached since the last counted breath
    pub completed_inhale: bool,
    /// Completed breaths since start or last reset
    pub breath_count: u32,
}

impl Default for BreathSession {
    fn default() -> Self {
        Self::new(&BreathSettings::default())
    }
}

impl BreathSession {
    /// Fresh session at rest: exhaling, radius at minimum
    pub fn new(settings: &BreathSettings) -> Self {
        let settings = settings.sanitized();
        Self {
            radius: settings.min_radius,
            min_radius: settings.min_radius,
            max_radius: settings.max_radius,
            base_speed: settings.base_speed,
            exhale_damping: settings.exhale_damping,
            phase: BreathPhase::Exhaling,
            completed_inhale: false,
            breath_count: 0,
        }
    }

    #[inline]
    pub fn is_inhaling(&self) -> bool {
        self.phase == BreathPhase::Inhaling
    }

    /// Normalized radius in [0, 1] (drives glow and tone frequency)
    #[inline]
    pub fn glow(&self) -> f32 {
        crate::normalize(self.radius, self.min_radius, self.max_radius)
    }

    /// Change direction. Returns false if already moving that way.
    pub fn set_phase(&mut self, phase: BreathPhase) -> bool {
        if self.phase == phase {
            return false;
        }
        self.phase = phase;
        true
    }

    /// Clear the breath counter (partial progress toward the next breath is kept)
    pub fn reset_count(&mut self) {
        self.breath_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_at_rest() {
        let s = BreathSession::default();
        assert_eq!(s.phase, BreathPhase::Exhaling);
        assert_eq!(s.radius, s.min_radius);
        assert_eq!(s.breath_count, 0);
        assert!(!s.completed_inhale);
        assert_eq!(s.glow(), 0.0);
    }

    #[test]
    fn test_set_phase_reports_change() {
        let mut s = BreathSession::default();
        assert!(s.set_phase(BreathPhase::Inhaling));
        assert!(!s.set_phase(BreathPhase::Inhaling));
        assert!(s.is_inhaling());
        assert!(s.set_phase(BreathPhase::Exhaling));
    }

    #[test]
    fn test_glow_at_max() {
        let mut s = BreathSession::default();
        s.radius = s.max_radius;
        assert_eq!(s.glow(), 1.0);
    }
}
