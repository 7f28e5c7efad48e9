//! Breathing tuning settings
//!
//! Defaults match the `consts` module. The native runner can load an override
//! from a JSON file; the web host always uses defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable parameters for a breathing session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreathSettings {
    /// Radius at full exhale (px)
    pub min_radius: f32,
    /// Radius at full inhale (px)
    pub max_radius: f32,
    /// Radius change per tick at pace 1.0
    pub base_speed: f32,
    /// Exhale speed multiplier (0 < damping < 1)
    pub exhale_damping: f32,
    /// Pace the selector starts at
    pub start_pace: f32,
}

impl Default for BreathSettings {
    fn default() -> Self {
        Self {
            min_radius: MIN_RADIUS,
            max_radius: MAX_RADIUS,
            base_speed: BASE_SPEED,
            exhale_damping: EXHALE_DAMPING,
            start_pace: PACE_DEFAULT,
        }
    }
}

impl BreathSettings {
    /// Repair invalid values, falling back to defaults field by field
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut out = self;

        let radii_ok = out.min_radius.is_finite()
            && out.max_radius.is_finite()
            && out.min_radius >= 0.0
            && out.min_radius < out.max_radius;
        if !radii_ok {
            log::warn!(
                "Invalid radius range [{}, {}], using defaults",
                out.min_radius,
                out.max_radius
            );
            out.min_radius = defaults.min_radius;
            out.max_radius = defaults.max_radius;
        }

        if !out.base_speed.is_finite() || out.base_speed <= 0.0 {
            log::warn!("Invalid base speed {}, using default", out.base_speed);
            out.base_speed = defaults.base_speed;
        }

        if !out.exhale_damping.is_finite()
            || out.exhale_damping <= 0.0
            || out.exhale_damping >= 1.0
        {
            log::warn!("Invalid exhale damping {}, using default", out.exhale_damping);
            out.exhale_damping = defaults.exhale_damping;
        }

        out.start_pace = crate::clamp_pace(out.start_pace).unwrap_or(defaults.start_pace);
        out
    }

    /// Ticks needed to grow from min to max radius at the given pace
    pub fn inhale_ticks(&self, pace: f32) -> u32 {
        let span = self.max_radius - self.min_radius;
        (span / (self.base_speed * pace)).ceil() as u32
    }

    /// Ticks needed to shrink from max to min radius at the given pace
    pub fn exhale_ticks(&self, pace: f32) -> u32 {
        let span = self.max_radius - self.min_radius;
        (span / (self.base_speed * pace * self.exhale_damping)).ceil() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let s = BreathSettings::default();
        assert_eq!(s.min_radius, 28.0);
        assert_eq!(s.max_radius, 110.0);
        assert_eq!(s.base_speed, 0.55);
        assert_eq!(s.sanitized(), s);
    }

    #[test]
    fn test_sanitize_repairs_bad_values() {
        let bad = BreathSettings {
            min_radius: 120.0,
            max_radius: 100.0,
            base_speed: -1.0,
            exhale_damping: 1.5,
            start_pace: f32::NAN,
        };
        assert_eq!(bad.sanitized(), BreathSettings::default());
    }

    #[test]
    fn test_sanitize_rejects_unit_damping() {
        // Exhale must stay slower than inhale
        let s = BreathSettings {
            exhale_damping: 1.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(s.exhale_damping, EXHALE_DAMPING);

        let ok = BreathSettings {
            exhale_damping: 0.99,
            ..Default::default()
        };
        assert_eq!(ok.sanitized(), ok);
    }

    #[test]
    fn test_sanitize_clamps_pace() {
        let s = BreathSettings {
            start_pace: 3.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(s.start_pace, PACE_MAX);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s: BreathSettings = serde_json::from_str(r#"{"base_speed": 1.1}"#).unwrap();
        assert_eq!(s.base_speed, 1.1);
        assert_eq!(s.min_radius, MIN_RADIUS);
        assert_eq!(s.exhale_damping, EXHALE_DAMPING);
    }

    #[test]
    fn test_cycle_tick_estimates() {
        let s = BreathSettings::default();
        assert_eq!(s.inhale_ticks(1.0), 150);
        assert_eq!(s.exhale_ticks(1.0), 166);
        assert!(s.inhale_ticks(2.0) < s.inhale_ticks(1.0));
    }
}
