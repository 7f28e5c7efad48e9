//! Software sine voice
//!
//! Renders the tone sample by sample with the same automation contract as
//! Web Audio: linear gain ramps and exponential frequency approach. Used by
//! the native runner (optionally recorded to WAV).

use std::f32::consts::TAU;

use super::{AudioError, ToneBackend};
use crate::consts::TONE_BASE_HZ;

/// In-flight linear gain ramp
#[derive(Debug, Clone, Copy)]
struct GainRamp {
    step: f32,
    target: f32,
    remaining: u32,
}

#[derive(Debug, Clone)]
pub struct SineVoice {
    sample_rate: u32,
    phase: f32,
    frequency: f32,
    frequency_target: f32,
    /// Per-sample fraction of the remaining distance to the target
    frequency_coeff: f32,
    gain: f32,
    ramp: Option<GainRamp>,
    stopped: bool,
}

impl SineVoice {
    pub fn new(sample_rate: u32) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::ContextUnavailable("sample rate must be non-zero".into()));
        }
        Ok(Self {
            sample_rate,
            phase: 0.0,
            frequency: TONE_BASE_HZ,
            frequency_target: TONE_BASE_HZ,
            frequency_coeff: 1.0,
            gain: 0.0,
            ramp: None,
            stopped: false,
        })
    }

    /// Current (smoothed) frequency
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Current (ramped) gain
    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Number of samples covering one frame at `frame_rate`
    pub fn samples_per_frame(&self, frame_rate: f32) -> usize {
        (self.sample_rate as f32 / frame_rate).round() as usize
    }

    /// Fill `out` with mono samples
    pub fn render(&mut self, out: &mut [f32]) {
        if self.stopped {
            out.fill(0.0);
            return;
        }
        let sr = self.sample_rate as f32;
        for sample in out.iter_mut() {
            if let Some(ramp) = self.ramp.as_mut() {
                ramp.remaining -= 1;
                if ramp.remaining == 0 {
                    self.gain = ramp.target;
                    self.ramp = None;
                } else {
                    self.gain += ramp.step;
                }
            }
            self.frequency += (self.frequency_target - self.frequency) * self.frequency_coeff;

            *sample = self.phase.sin() * self.gain;
            self.phase = (self.phase + TAU * self.frequency / sr) % TAU;
        }
    }
}

impl ToneBackend for SineVoice {
    fn ramp_gain(&mut self, target: f32, ramp_secs: f64) -> Result<(), AudioError> {
        let samples = (ramp_secs * self.sample_rate as f64).round().max(1.0) as u32;
        self.ramp = Some(GainRamp {
            step: (target - self.gain) / samples as f32,
            target,
            remaining: samples,
        });
        Ok(())
    }

    fn approach_frequency(&mut self, target_hz: f32, time_constant: f64) -> Result<(), AudioError> {
        if !target_hz.is_finite() || target_hz <= 0.0 {
            return Err(AudioError::Node(format!("invalid frequency {target_hz}")));
        }
        self.frequency_target = target_hz;
        self.frequency_coeff = if time_constant > 0.0 {
            (1.0 - (-1.0 / (time_constant * self.sample_rate as f64)).exp()) as f32
        } else {
            1.0
        };
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.ramp = None;
        self.gain = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 48_000;

    #[test]
    fn test_silent_until_ramped() {
        let mut voice = SineVoice::new(SR).unwrap();
        let mut buf = vec![1.0; 256];
        voice.render(&mut buf);
        assert!(buf.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_gain_ramp_is_gradual() {
        let mut voice = SineVoice::new(SR).unwrap();
        voice.ramp_gain(0.05, 0.05).unwrap();

        let mut buf = vec![0.0; 1];
        voice.render(&mut buf);
        assert!(voice.gain() > 0.0 && voice.gain() < 0.001);

        // 50ms at 48kHz = 2400 samples
        let mut buf = vec![0.0; 1200];
        voice.render(&mut buf);
        assert!((voice.gain() - 0.025).abs() < 0.001);

        let mut buf = vec![0.0; 1200];
        voice.render(&mut buf);
        assert_eq!(voice.gain(), 0.05);
        assert!(buf.iter().all(|s| s.abs() <= 0.05 + 1e-6));
    }

    #[test]
    fn test_frequency_approach_is_exponential() {
        let mut voice = SineVoice::new(SR).unwrap();
        voice.approach_frequency(260.0, 0.05).unwrap();

        // After one time constant about 63% of the gap is closed
        let mut buf = vec![0.0; 2400];
        voice.render(&mut buf);
        let closed = (voice.frequency() - 220.0) / 40.0;
        assert!((closed - 0.632).abs() < 0.01, "closed {closed}");

        let mut buf = vec![0.0; 48_000];
        voice.render(&mut buf);
        assert!((voice.frequency() - 260.0).abs() < 0.01);
    }

    #[test]
    fn test_samples_per_frame() {
        let voice = SineVoice::new(SR).unwrap();
        assert_eq!(voice.samples_per_frame(60.0), 800);
        assert_eq!(SineVoice::new(44_100).unwrap().samples_per_frame(60.0), 735);
    }

    #[test]
    fn test_stop_renders_silence() {
        let mut voice = SineVoice::new(SR).unwrap();
        voice.ramp_gain(0.05, 0.0).unwrap();
        voice.stop();
        let mut buf = vec![1.0; 64];
        voice.render(&mut buf);
        assert!(buf.iter().all(|s| *s == 0.0));
        assert!(voice.is_stopped());
    }

    #[test]
    fn test_rejects_bad_frequency() {
        let mut voice = SineVoice::new(SR).unwrap();
        assert!(voice.approach_frequency(f32::NAN, 0.05).is_err());
        assert!(SineVoice::new(0).is_err());
    }
}
