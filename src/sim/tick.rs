//! Per-frame breath tick
//!
//! Advances the session by one fixed increment. Called exactly once per
//! animation frame, before audio and rendering.

use super::state::{BreathEvent, BreathPhase, BreathSession};
use crate::consts::PACE_DEFAULT;

/// Inputs sampled for a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Pace multiplier (already clamped by the input controller)
    pub pace: f32,
    /// Best count known so far (loaded or earned)
    pub best_breath_count: u32,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            pace: PACE_DEFAULT,
            best_breath_count: 0,
        }
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Max radius reached for the first time this inhale
    pub peak_reached: bool,
    /// New breath count, when a breath completed
    pub breath_completed: Option<u32>,
    /// New best, when the completed breath beat it
    pub new_best: Option<u32>,
}

impl TickOutcome {
    /// Events in the order they happened
    pub fn events(&self) -> impl Iterator<Item = BreathEvent> + use<> {
        let peak = self.peak_reached.then_some(BreathEvent::PeakReached);
        let breath = self
            .breath_completed
            .map(|count| BreathEvent::BreathCompleted { count });
        let best = self.new_best.map(|best| BreathEvent::NewBest { best });
        peak.into_iter().chain(breath).chain(best)
    }
}

/// Advance the session by one tick
pub fn tick(session: &mut BreathSession, input: &TickInput) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    let speed = session.base_speed * input.pace;

    match session.phase {
        BreathPhase::Inhaling => {
            session.radius += speed;
            if session.radius >= session.max_radius {
                session.radius = session.max_radius;
                outcome.peak_reached = !session.completed_inhale;
                session.completed_inhale = true;
            }
        }
        BreathPhase::Exhaling => {
            session.radius -= speed * session.exhale_damping;
            if session.radius <= session.min_radius {
                session.radius = session.min_radius;
                // Only a full inhale followed by a full exhale counts
                if session.completed_inhale {
                    session.completed_inhale = false;
                    session.breath_count += 1;
                    outcome.breath_completed = Some(session.breath_count);
                    if session.breath_count > input.best_breath_count {
                        outcome.new_best = Some(session.breath_count);
                    }
                }
            }
        }
    }

    session.radius = session.radius.clamp(session.min_radius, session.max_radius);
    outcome
}
