//! Breath state machine
//!
//! All breathing logic lives here. This module is pure and deterministic:
//! - Fixed per-tick increments (no delta-time scaling)
//! - No rendering, audio or storage dependencies
//! - Persistence of a new best is reported, never performed

pub mod state;
pub mod tick;

pub use state::{BreathEvent, BreathPhase, BreathSession};
pub use tick::{TickInput, TickOutcome, tick};
