//! Sine tone synthesis with a linear fade envelope
//!
//! The envelope ramps over `fade_ms` on key down and key up so that
//! keyed intervals do not click.

use std::f32::consts::TAU;
use std::time::Duration;

use crate::config::ToneConfig;
use crate::pulse::{PulsePlan, TimedPulse};

/// Envelope state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    /// Output is zero
    Silent,
    /// Ramping up
    FadeIn,
    /// Full amplitude
    Sustain,
    /// Ramping down
    FadeOut,
}

/// Keyed sine oscillator
#[derive(Debug, Clone)]
pub struct ToneGenerator {
    /// Phase in cycles, 0.0..1.0
    phase: f32,
    /// Phase advance per sample in cycles
    phase_inc: f32,
    volume: f32,
    fade_pos: u32,
    fade_len: u32,
    rising: bool,
    sample_rate: u32,
}

impl ToneGenerator {
    /// Create a generator from tone settings
    pub fn new(config: &ToneConfig) -> Self {
        let sample_rate = config.sample_rate.max(1);
        let fade_len = u32::try_from(
            u64::from(config.fade_ms) * u64::from(sample_rate) / 1000,
        )
        .unwrap_or(u32::MAX)
        .max(1);

        Self {
            phase: 0.0,
            phase_inc: Self::calc_phase_inc(config.frequency_hz, sample_rate),
            volume: config.volume.clamp(0.0, 1.0),
            fade_pos: 0,
            fade_len,
            rising: false,
            sample_rate,
        }
    }

    #[allow(clippy::cast_precision_loss)] // audio-range frequencies fit in f32
    fn calc_phase_inc(freq_hz: u32, sample_rate: u32) -> f32 {
        freq_hz as f32 / sample_rate as f32
    }

    /// Output sample rate in Hz
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Current envelope state
    pub const fn fade_state(&self) -> FadeState {
        if self.fade_pos == 0 {
            FadeState::Silent
        } else if self.fade_pos >= self.fade_len {
            FadeState::Sustain
        } else if self.rising {
            FadeState::FadeIn
        } else {
            FadeState::FadeOut
        }
    }

    /// Number of samples covering `duration`
    pub fn samples_for(&self, duration: Duration) -> usize {
        let samples = duration.as_nanos() * u128::from(self.sample_rate) / 1_000_000_000;
        usize::try_from(samples).unwrap_or(usize::MAX)
    }

    /// Generate the next sample, in -1.0..=1.0
    #[allow(clippy::cast_precision_loss)] // envelope positions are small
    pub fn next_sample(&mut self, key_down: bool) -> f32 {
        self.rising = key_down;
        if key_down {
            if self.fade_pos < self.fade_len {
                self.fade_pos += 1;
            }
        } else if self.fade_pos > 0 {
            self.fade_pos -= 1;
        }

        if self.fade_pos == 0 {
            self.phase = 0.0;
            return 0.0;
        }

        let envelope = self.fade_pos as f32 / self.fade_len as f32;
        let sample = (self.phase * TAU).sin() * self.volume * envelope;
        self.phase = (self.phase + self.phase_inc).fract();
        sample
    }

    /// Append samples for one interval
    pub fn render_into(&mut self, pulse: &TimedPulse, out: &mut Vec<f32>) {
        let count = self.samples_for(pulse.duration);
        let key_down = pulse.is_on();
        out.reserve(count);
        for _ in 0..count {
            out.push(self.next_sample(key_down));
        }
    }
}

/// Render a whole plan to mono samples
pub fn synthesize(plan: PulsePlan<'_>, config: &ToneConfig) -> Vec<f32> {
    let mut generator = ToneGenerator::new(config);
    let mut samples = Vec::new();
    for pulse in plan {
        generator.render_into(&pulse, &mut samples);
    }
    tracing::debug!(samples = samples.len(), "plan synthesized");
    samples
}
