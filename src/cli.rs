//! Command-line argument parsing.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use breath_pacer::BreathSettings;
use breath_pacer::consts::PACE_DEFAULT;
use breath_pacer::script::BreathScript;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Breath Pacer")]
#[command(about = "Hold-to-inhale breathing pacer (headless scripted run)", long_about = None)]
pub struct Args {
    /// Hold/release cycles to perform
    #[arg(long, value_name = "N", default_value = "3")]
    pub cycles: u32,

    /// Pace multiplier (clamped to 0.5..=2.0)
    #[arg(long, value_name = "PACE", default_value_t = PACE_DEFAULT)]
    pub pace: f32,

    /// Frames to hold per cycle (default: until the circle is full)
    #[arg(long, value_name = "FRAMES")]
    pub hold_frames: Option<u32>,

    /// Frames to release per cycle (default: until the circle is empty)
    #[arg(long, value_name = "FRAMES")]
    pub release_frames: Option<u32>,

    /// JSON file overriding breathing settings
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Score file (best count and sound flag)
    #[arg(long, value_name = "PATH", default_value = "breath-pacer-scores.json")]
    pub store: PathBuf,

    /// Write the tone to a WAV file
    #[arg(long, value_name = "PATH")]
    pub wav: Option<PathBuf>,

    /// Tone sample rate
    #[arg(long, value_name = "HZ", default_value = "48000")]
    pub sample_rate: u32,

    /// Turn sound off before the run (persisted like the mute button)
    #[arg(long)]
    pub mute: bool,
}

impl Args {
    pub fn script(&self) -> BreathScript {
        BreathScript {
            cycles: self.cycles,
            pace: self.pace,
            hold_frames: self.hold_frames,
            release_frames: self.release_frames,
        }
    }

    /// Settings from `--settings`, or defaults
    pub fn load_settings(&self) -> anyhow::Result<BreathSettings> {
        let Some(path) = &self.settings else {
            return Ok(BreathSettings::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        let settings: BreathSettings = serde_json::from_str(&text)
            .with_context(|| format!("Invalid settings {}", path.display()))?;
        Ok(settings.sanitized())
    }

    /// Mono float WAV at the chosen sample rate
    pub fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["breath-pacer"]);
        assert_eq!(args.script(), BreathScript::default());
        assert_eq!(args.sample_rate, 48000);
        assert!(!args.mute);
        assert_eq!(args.load_settings().unwrap(), BreathSettings::default());
    }

    #[test]
    fn test_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"max_radius": 90.0}"#).unwrap();
        let args = Args::parse_from([
            "breath-pacer",
            "--settings",
            path.to_str().unwrap(),
            "--hold-frames",
            "40",
        ]);
        let settings = args.load_settings().unwrap();
        assert_eq!(settings.max_radius, 90.0);
        assert_eq!(settings.min_radius, BreathSettings::default().min_radius);
        assert_eq!(args.script().hold_frames, Some(40));
    }

    #[test]
    fn test_missing_settings_file_is_error() {
        let args = Args::parse_from(["breath-pacer", "--settings", "/nonexistent/settings.json"]);
        assert!(args.load_settings().is_err());
    }
}
