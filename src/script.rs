//! Scripted breathing runs
//!
//! Drives an `App` through a fixed number of hold/release cycles without a
//! keyboard. Used by the native host and by tests.

use crate::app::App;
use crate::audio::{AudioError, ToneBackend};
use crate::persistence::ScoreStore;
use crate::renderer::Surface;

/// Upper bound on frames spent in one phase when waiting for a radius limit
const MAX_PHASE_FRAMES: u32 = 10_000;

/// How to breathe
#[derive(Debug, Clone, PartialEq)]
pub struct BreathScript {
    /// Hold/release cycles to perform
    pub cycles: u32,
    /// Pace applied before the first cycle
    pub pace: f32,
    /// Frames to hold; `None` holds until the circle is full
    pub hold_frames: Option<u32>,
    /// Frames to release; `None` releases until the circle is empty
    pub release_frames: Option<u32>,
}

impl Default for BreathScript {
    fn default() -> Self {
        Self {
            cycles: 3,
            pace: crate::consts::PACE_DEFAULT,
            hold_frames: None,
            release_frames: None,
        }
    }
}

/// Result of a scripted run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub frames: u64,
    pub breaths: u32,
    pub best: u32,
}

impl BreathScript {
    /// Run the script. `start_tone` builds the tone backend on the first
    /// press; `after_frame` runs once per frame (audio rendering, HUD).
    pub fn run<B, S, Sf, F, G>(
        &self,
        app: &mut App<B, S>,
        surface: &mut Sf,
        mut start_tone: F,
        mut after_frame: G,
    ) -> RunSummary
    where
        B: ToneBackend,
        S: ScoreStore,
        Sf: Surface,
        F: FnMut() -> Result<B, AudioError>,
        G: FnMut(&mut App<B, S>),
    {
        let pace = app.set_pace(self.pace);
        log::info!("Running {} cycles at pace {}", self.cycles, pace);

        let mut frames = 0u64;
        let mut step = |app: &mut App<B, S>, surface: &mut Sf| {
            app.frame(surface);
            after_frame(app);
            frames += 1;
        };

        for _ in 0..self.cycles {
            app.press(&mut start_tone);
            match self.hold_frames {
                Some(n) => {
                    for _ in 0..n {
                        step(app, surface);
                    }
                }
                None => {
                    for _ in 0..MAX_PHASE_FRAMES {
                        let session = app.session();
                        if session.radius >= session.max_radius {
                            break;
                        }
                        step(app, surface);
                    }
                }
            }

            app.release();
            match self.release_frames {
                Some(n) => {
                    for _ in 0..n {
                        step(app, surface);
                    }
                }
                None => {
                    for _ in 0..MAX_PHASE_FRAMES {
                        let session = app.session();
                        if session.radius <= session.min_radius {
                            break;
                        }
                        step(app, surface);
                    }
                }
            }
        }

        RunSummary {
            frames,
            breaths: app.session().breath_count,
            best: app.score().best_breath_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::tests::RecordingTone;
    use crate::persistence::MemoryStore;
    use crate::renderer::DisplayList;
    use crate::settings::BreathSettings;
    use glam::Vec2;

    fn run(script: &BreathScript) -> (RunSummary, u64) {
        let mut app: App<RecordingTone, MemoryStore> =
            App::new(&BreathSettings::default(), MemoryStore::new());
        let mut surface = DisplayList::new(Vec2::splat(260.0));
        let mut callbacks = 0u64;
        let summary = script.run(
            &mut app,
            &mut surface,
            || Ok(RecordingTone::default()),
            |_| callbacks += 1,
        );
        assert_eq!(surface.frames(), summary.frames);
        (summary, callbacks)
    }

    #[test]
    fn test_default_script_counts_every_cycle() {
        let (summary, callbacks) = run(&BreathScript::default());
        assert_eq!(summary.breaths, 3);
        assert_eq!(summary.best, 3);
        assert_eq!(summary.frames, 3 * (150 + 166));
        assert_eq!(callbacks, summary.frames);
    }

    #[test]
    fn test_short_holds_never_count() {
        let script = BreathScript {
            hold_frames: Some(100),
            ..BreathScript::default()
        };
        let (summary, _) = run(&script);
        assert_eq!(summary.breaths, 0);
        assert_eq!(summary.best, 0);
    }

    #[test]
    fn test_partial_release_still_holds_each_cycle() {
        let script = BreathScript {
            release_frames: Some(45),
            ..BreathScript::default()
        };
        let mut app: App<RecordingTone, MemoryStore> =
            App::new(&BreathSettings::default(), MemoryStore::new());
        let mut surface = DisplayList::new(Vec2::splat(260.0));
        let mut holds: Vec<u32> = Vec::new();
        let mut was_inhaling = false;
        let summary = script.run(
            &mut app,
            &mut surface,
            || Ok(RecordingTone::default()),
            |app| {
                let inhaling = app.session().is_inhaling();
                if inhaling {
                    if !was_inhaling {
                        holds.push(0);
                    }
                    if let Some(n) = holds.last_mut() {
                        *n += 1;
                    }
                }
                was_inhaling = inhaling;
            },
        );

        // 45 release frames shrink 22.275px, refilled in 41 frames
        assert_eq!(holds, vec![150, 41, 41]);
        assert_eq!(summary.frames, 150 + 41 + 41 + 3 * 45);
        // Never back to min radius, so nothing counts
        assert_eq!(summary.breaths, 0);
    }

    #[test]
    fn test_fast_pace_takes_fewer_frames() {
        let slow = run(&BreathScript {
            cycles: 1,
            pace: 0.5,
            ..BreathScript::default()
        })
        .0;
        let fast = run(&BreathScript {
            cycles: 1,
            pace: 2.0,
            ..BreathScript::default()
        })
        .0;
        assert_eq!(slow.breaths, 1);
        assert_eq!(fast.breaths, 1);
        assert!(fast.frames < slow.frames);
    }

    #[test]
    fn test_zero_cycles_is_idle() {
        let (summary, _) = run(&BreathScript {
            cycles: 0,
            ..BreathScript::default()
        });
        assert_eq!(summary, RunSummary::default());
    }
}
