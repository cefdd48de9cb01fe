use anyhow::{Context, Result};
use hound::{WavSpec, WavWriter};
use std::path::Path;
use tracing::{debug, info};

use super::tone;
use crate::config::ToneConfig;
use crate::pulse::PulsePlan;

/// Write mono f32 samples to a WAV file
///
/// # Errors
/// Returns error if directory creation or file write fails
pub fn write_wav(samples: &[f32], sample_rate: u32, path: &Path) -> Result<()> {
    debug!("writing WAV file: {:?}", path);

    // Create parent directory if needed
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("failed to create output directory")?;
        }
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec).context("failed to create WAV file")?;

    for &sample in samples {
        writer
            .write_sample(sample)
            .context("failed to write sample")?;
    }

    writer.finalize().context("failed to finalize WAV file")?;

    info!("saved WAV file: {:?} ({} samples)", path, samples.len());
    Ok(())
}

/// Synthesize a plan and write it as a WAV file
///
/// # Errors
/// Returns error if the file cannot be written
pub fn export_plan(plan: PulsePlan<'_>, config: &ToneConfig, path: &Path) -> Result<usize> {
    let samples = tone::synthesize(plan, config);
    write_wav(&samples, config.sample_rate, path)?;
    Ok(samples.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse;
    use std::env;
    use std::fs;
    use std::time::Duration;

    #[test]
    fn test_wav_spec() {
        let samples = vec![0.1, 0.2, 0.3, 0.4, 0.5];
        let wav_path = env::temp_dir().join("morse_beacon_spec.wav");
        let _ = fs::remove_file(&wav_path);

        write_wav(&samples, 8000, &wav_path).unwrap();
        assert!(wav_path.exists());

        let reader = hound::WavReader::open(&wav_path).unwrap();
        let spec = reader.spec();

        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 8000);
        assert_eq!(spec.bits_per_sample, 32);
        assert_eq!(spec.sample_format, hound::SampleFormat::Float);
        assert_eq!(reader.len() as usize, samples.len());

        let _ = fs::remove_file(wav_path);
    }

    #[test]
    fn test_write_wav_empty_samples() {
        let wav_path = env::temp_dir().join("morse_beacon_empty.wav");
        let _ = fs::remove_file(&wav_path);

        write_wav(&[], 8000, &wav_path).unwrap();
        assert!(wav_path.exists());

        let _ = fs::remove_file(wav_path);
    }

    #[test]
    fn test_write_wav_creates_parent_dir() {
        let dir = env::temp_dir().join("morse_beacon_nested");
        let _ = fs::remove_dir_all(&dir);
        let nested_path = dir.join("out.wav");

        write_wav(&[0.0, 0.1], 8000, &nested_path).unwrap();
        assert!(nested_path.exists());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_export_plan_duration() {
        let config = ToneConfig {
            frequency_hz: 600,
            sample_rate: 8000,
            volume: 0.5,
            fade_ms: 2,
        };
        let wav_path = env::temp_dir().join("morse_beacon_export.wav");
        let _ = fs::remove_file(&wav_path);

        // "/" is 700ms + 100ms of silence
        let written =
            export_plan(pulse::plan("/", Duration::from_millis(100)), &config, &wav_path).unwrap();
        assert_eq!(written, 6400);

        let reader = hound::WavReader::open(&wav_path).unwrap();
        assert_eq!(reader.duration(), 6400);

        let _ = fs::remove_file(wav_path);
    }
}
