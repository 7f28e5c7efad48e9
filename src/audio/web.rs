//! Web Audio tone backend
//!
//! Oscillator → gain → destination. The oscillator starts once and runs
//! until teardown; muting only moves the gain.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::{AudioError, ToneBackend};
use crate::consts::TONE_BASE_HZ;

fn js_err(e: wasm_bindgen::JsValue) -> AudioError {
    AudioError::Node(format!("{e:?}"))
}

pub struct WebTone {
    ctx: AudioContext,
    osc: OscillatorNode,
    gain: GainNode,
}

impl WebTone {
    /// Build and start the tone graph. Must run inside a user gesture handler.
    pub fn start() -> Result<Self, AudioError> {
        let ctx = AudioContext::new()
            .map_err(|e| AudioError::ContextUnavailable(format!("{e:?}")))?;

        let osc = ctx.create_oscillator().map_err(js_err)?;
        let gain = ctx.create_gain().map_err(js_err)?;

        osc.set_type(OscillatorType::Sine);
        osc.frequency().set_value(TONE_BASE_HZ);
        gain.gain().set_value(0.0);

        osc.connect_with_audio_node(&gain).map_err(js_err)?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(js_err)?;
        osc.start().map_err(js_err)?;

        // Some browsers create the context suspended even inside a gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        Ok(Self { ctx, osc, gain })
    }
}

impl ToneBackend for WebTone {
    fn ramp_gain(&mut self, target: f32, ramp_secs: f64) -> Result<(), AudioError> {
        let t = self.ctx.current_time();
        let param = self.gain.gain();
        param.cancel_scheduled_values(t).map_err(js_err)?;
        // Anchor the ramp at the current value so it starts from here
        param.set_value_at_time(param.value(), t).map_err(js_err)?;
        param
            .linear_ramp_to_value_at_time(target, t + ramp_secs)
            .map_err(js_err)?;
        Ok(())
    }

    fn approach_frequency(&mut self, target_hz: f32, time_constant: f64) -> Result<(), AudioError> {
        self.osc
            .frequency()
            .set_target_at_time(target_hz, self.ctx.current_time(), time_constant)
            .map_err(js_err)?;
        Ok(())
    }

    fn stop(&mut self) {
        let _ = self.osc.stop();
        let _ = self.osc.disconnect();
        let _ = self.ctx.close();
    }
}
