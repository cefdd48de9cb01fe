use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::{
    traits::{Consumer, Observer, Producer, Split},
    HeapProd, HeapRb,
};
use tracing::{info, warn};

use super::tone::ToneGenerator;
use super::PulseSink;
use crate::config::ToneConfig;
use crate::pulse::TimedPulse;

/// Seconds of audio the ring buffer can hold ahead of the device
const BUFFER_SECS: usize = 2;

/// Live beeps on the default output device
///
/// Each pulse is synthesized when it begins and queued in a lock-free ring
/// buffer that the device callback drains.
pub struct SpeakerSink {
    /// Kept alive to keep the device running
    _stream: cpal::Stream,
    producer: HeapProd<f32>,
    tone: ToneGenerator,
    scratch: Vec<f32>,
}

impl SpeakerSink {
    /// Open the default output device
    ///
    /// # Errors
    /// Returns error if no output device is available or stream creation fails
    pub fn open(config: &ToneConfig) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no output device available")?;

        let device_name = device.name().unwrap_or_else(|_| "unknown".to_owned());
        info!("using output device: {}", device_name);

        let supported_config = device
            .default_output_config()
            .context("failed to get default output config")?;

        let device_sample_rate = supported_config.sample_rate().0;
        let device_channels = usize::from(supported_config.channels());
        info!(
            "device config: {} Hz, {} channels",
            device_sample_rate, device_channels
        );

        let ring_buffer = HeapRb::<f32>::new(device_sample_rate as usize * BUFFER_SECS);
        let (producer, mut consumer) = ring_buffer.split();

        let stream_config = supported_config.into();
        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    // mono source duplicated across channels
                    for frame in data.chunks_mut(device_channels) {
                        let sample = consumer.try_pop().unwrap_or(0.0);
                        frame.fill(sample);
                    }
                },
                move |err| {
                    warn!("audio stream error: {}", err);
                },
                None,
            )
            .context("failed to build output stream")?;

        stream.play().context("failed to start output stream")?;

        let tone = ToneGenerator::new(&ToneConfig {
            sample_rate: device_sample_rate,
            ..config.clone()
        });

        Ok(Self {
            _stream: stream,
            producer,
            tone,
            scratch: Vec::new(),
        })
    }
}

impl PulseSink for SpeakerSink {
    fn begin(&mut self, pulse: &TimedPulse) -> Result<()> {
        self.scratch.clear();
        self.tone.render_into(pulse, &mut self.scratch);

        let pushed = self.producer.push_slice(&self.scratch);
        if pushed < self.scratch.len() {
            warn!(
                "ring buffer full, dropped {} samples",
                self.scratch.len() - pushed
            );
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        info!(queued = self.producer.occupied_len(), "speaker playback finished");
        Ok(())
    }
}
