//! Frame loop driver
//!
//! Owns the session, score, input, audio and persistence. A host calls
//! `frame` once per animation frame (tick, audio, render, in that order) and
//! forwards input events between frames. Everything runs on one thread, so
//! no locking is needed.

use crate::audio::{AudioEngine, AudioError, ToneBackend};
use crate::input::InputController;
use crate::persistence::{Persistence, ScoreRecord, ScoreStore, ScoreUpdate};
use crate::renderer::{FrameStyle, Surface, draw_breath};
use crate::settings::BreathSettings;
use crate::sim::{BreathEvent, BreathSession, TickInput, tick};

pub struct App<B, S> {
    session: BreathSession,
    score: ScoreRecord,
    input: InputController,
    audio: AudioEngine<B>,
    persistence: Persistence<S>,
    /// Events since the last drain
    events: Vec<BreathEvent>,
    /// Sound flag was changed by the user before the stored one arrived
    sound_toggled: bool,
}

impl<B: ToneBackend, S: ScoreStore> App<B, S> {
    /// New app with default score; call `load_score` (possibly deferred) to
    /// pull in the stored one.
    pub fn new(settings: &BreathSettings, store: S) -> Self {
        let settings = settings.sanitized();
        let score = ScoreRecord::default();
        Self {
            session: BreathSession::new(&settings),
            score,
            input: InputController::new(settings.start_pace),
            audio: AudioEngine::new(score.sound_enabled),
            persistence: Persistence::new(store),
            events: Vec::new(),
            sound_toggled: false,
        }
    }

    pub fn session(&self) -> &BreathSession {
        &self.session
    }

    pub fn score(&self) -> ScoreRecord {
        self.score
    }

    pub fn input(&self) -> &InputController {
        &self.input
    }

    pub fn audio(&self) -> &AudioEngine<B> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioEngine<B> {
        &mut self.audio
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Read the stored score and merge it in
    pub fn load_score(&mut self) {
        let record = self.persistence.load();
        self.apply_loaded(record);
    }

    /// Merge a loaded record. The best never goes down; a sound toggle made
    /// before the load completed wins over the stored flag.
    pub fn apply_loaded(&mut self, record: ScoreRecord) {
        if record.best_breath_count >= self.score.best_breath_count {
            self.score.best_breath_count = record.best_breath_count;
        } else {
            // Breaths earned before the load beat the stored best
            self.persistence
                .save(ScoreUpdate::BestBreathCount(self.score.best_breath_count));
        }
        if !self.sound_toggled {
            self.score.sound_enabled = record.sound_enabled;
            self.audio.set_sound_enabled(record.sound_enabled);
        }
        self.events.push(BreathEvent::ScoreLoaded {
            best: self.score.best_breath_count,
            sound_enabled: self.score.sound_enabled,
        });
    }

    /// One animation frame: tick, then audio, then render
    pub fn frame<Sf: Surface>(&mut self, surface: &mut Sf) -> FrameStyle {
        let input = TickInput {
            pace: self.input.pace(),
            best_breath_count: self.score.best_breath_count,
        };
        let outcome = tick(&mut self.session, &input);

        if let Some(count) = outcome.breath_completed {
            log::debug!("Breath {} completed", count);
        }
        if let Some(best) = outcome.new_best {
            self.score.best_breath_count = best;
            self.persistence.save(ScoreUpdate::BestBreathCount(best));
            log::info!("New best: {}", best);
        }
        self.events.extend(outcome.events());

        self.audio.update_frequency(self.session.glow());

        draw_breath(surface, &self.session)
    }

    /// Control key down (repeats ignored). `start_tone` runs on the first
    /// accepted press only.
    pub fn press<F>(&mut self, start_tone: F) -> bool
    where
        F: FnOnce() -> Result<B, AudioError>,
    {
        self.input
            .on_control_press(&mut self.session, &mut self.audio, start_tone)
    }

    /// Control key up
    pub fn release(&mut self) {
        self.input
            .on_control_release(&mut self.session, &mut self.audio);
    }

    pub fn reset(&mut self) {
        let event = self.input.on_reset(&mut self.session);
        self.events.push(event);
    }

    pub fn toggle_sound(&mut self) {
        self.sound_toggled = true;
        let event = self
            .input
            .on_toggle_sound(&mut self.score, &mut self.audio, &self.persistence);
        self.events.push(event);
    }

    pub fn set_pace(&mut self, value: f32) -> f32 {
        self.input.set_pace(value)
    }

    pub fn set_pace_str(&mut self, value: &str) -> f32 {
        self.input.set_pace_str(value)
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<BreathEvent> {
        std::mem::take(&mut self.events)
    }

    /// Release audio resources. The app keeps working silently afterwards.
    pub fn teardown(&mut self) {
        self.audio.teardown();
    }
}
