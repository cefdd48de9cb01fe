use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use morse_beacon::codec::{self, DecodedChar};
use morse_beacon::config::{Config, ToneConfig, MAX_UNIT_MS};
use morse_beacon::phrasebook;
use morse_beacon::pulse::{self, Level};
use morse_beacon::render::{pacer, trace, wav, LogSink, SinkSet, StopHandle, TraceSink};
use morse_beacon::speech::{speak_translation, CommandSpeech, Language, SpeechEngine};
use morse_beacon::telemetry;

/// Morse Beacon - convert text to Morse code and back, with beeps and pulse traces
#[derive(Parser)]
#[command(name = "morse-beacon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.morse-beacon.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode text as Morse code
    Encode {
        /// Text to encode
        text: String,
    },

    /// Decode Morse code (words separated by " / ") to text
    Decode {
        /// Morse document
        morse: String,
    },

    /// Print the on/off intervals for a Morse document
    Plan {
        /// Morse document
        morse: String,

        /// Override the unit length in milliseconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_UNIT_MS))]
        unit_ms: Option<u64>,
    },

    /// Draw the pulse waveform for text
    Trace {
        /// Text to encode (or Morse with --morse)
        text: String,

        /// Treat the input as Morse code
        #[arg(long)]
        morse: bool,
    },

    /// Play text as beeps with a live pulse trace (Ctrl+C stops)
    Play {
        /// Text to encode (or Morse with --morse)
        text: String,

        /// Treat the input as Morse code
        #[arg(long)]
        morse: bool,

        /// Do not open the audio device
        #[arg(long)]
        silent: bool,
    },

    /// Render text as beeps into a WAV file
    Wav {
        /// Text to encode (or Morse with --morse)
        text: String,

        /// Output WAV path
        #[arg(short, long)]
        output: PathBuf,

        /// Treat the input as Morse code
        #[arg(long)]
        morse: bool,
    },

    /// Look up the fixed Urdu phrase for text
    Translate {
        /// English phrase
        text: String,

        /// Speak the result in Urdu
        #[arg(long)]
        speak: bool,
    },

    /// Speak text with the external synthesizer
    Speak {
        /// Text to speak
        text: String,

        /// Voice language
        #[arg(long, value_enum, default_value = "en")]
        language: Language,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    telemetry::init(config.telemetry.enabled, &config.telemetry.log_path, cli.verbose)?;
    tracing::debug!("morse-beacon starting");

    match cli.command {
        Commands::Encode { text } => {
            let report = codec::report(&text);
            if !report.is_clean() {
                tracing::warn!(
                    unsupported = ?report.unsupported,
                    "unsupported characters encoded as '?'"
                );
            }
            println!("{}", codec::encode(&text));
        }
        Commands::Decode { morse } => {
            let unrecognized: Vec<String> = codec::decode_words(&morse)
                .into_iter()
                .flatten()
                .filter_map(|c| match c {
                    DecodedChar::Unrecognized(token) => Some(token),
                    DecodedChar::Char(_) => None,
                })
                .collect();
            if !unrecognized.is_empty() {
                tracing::warn!(tokens = ?unrecognized, "unrecognized tokens decoded as '?'");
            }
            println!("{}", codec::decode(&morse));
        }
        Commands::Plan { morse, unit_ms } => {
            let unit = unit_ms.map_or_else(|| config.timing.unit(), std::time::Duration::from_millis);
            let plan = pulse::plan(morse.as_str(), unit);
            let total = plan.total_duration();
            for step in plan.steps() {
                for p in [step.mark, step.gap] {
                    let level = match p.level {
                        Level::On => "ON ",
                        Level::Off => "OFF",
                    };
                    println!("{:?}\t{level}\t{}u\t{:?}", step.symbol, p.units, p.duration);
                }
            }
            println!("total\t{total:?}");
        }
        Commands::Trace { text, morse } => {
            let doc = to_morse(text, morse);
            println!("{doc}");
            println!("{}", trace::render_plan(pulse::plan(doc.as_str(), config.timing.unit())));
        }
        Commands::Play {
            text,
            morse,
            silent,
        } => {
            let doc = to_morse(text, morse);
            println!("{doc}");

            let sinks = SinkSet::new().with(TraceSink::echoing(std::io::stdout()));
            let mut sinks = with_audio(sinks, &config.tone, silent);

            let stop = StopHandle::new();
            let ctrl_c_stop = stop.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("shutdown signal received");
                    ctrl_c_stop.stop();
                }
            });

            let plan = pulse::plan(doc.as_str(), config.timing.unit());
            let outcome = pacer::run(plan, &mut sinks, &stop)
                .await
                .context("playback failed")?;
            tracing::info!(?outcome, "playback done");
        }
        Commands::Wav {
            text,
            output,
            morse,
        } => {
            let doc = to_morse(text, morse);
            let plan = pulse::plan(doc.as_str(), config.timing.unit());
            let samples = wav::export_plan(plan, &config.tone, &output)?;
            println!(
                "✓ Wrote {} ({} samples at {} Hz)",
                output.display(),
                samples,
                config.tone.sample_rate
            );
        }
        Commands::Translate { text, speak } => {
            let translation = phrasebook::translate(&text, &config.phrasebook);
            println!("{}", translation.text());
            if speak {
                let engine = CommandSpeech::new(&config.speech);
                tokio::task::spawn_blocking(move || speak_translation(&engine, &translation))
                    .await
                    .context("speech task panicked")?;
            }
        }
        Commands::Speak { text, language } => {
            say(&config, text, language).await?;
        }
    }

    Ok(())
}

fn to_morse(text: String, is_morse: bool) -> String {
    if is_morse {
        text
    } else {
        codec::encode(&text)
    }
}

async fn say(config: &Config, text: String, language: Language) -> Result<()> {
    let engine = CommandSpeech::new(&config.speech);
    tokio::task::spawn_blocking(move || engine.speak(&text, language))
        .await
        .context("speech task panicked")?
        .context("speech failed")
}

#[cfg(feature = "speaker")]
fn with_audio(sinks: SinkSet, tone: &ToneConfig, silent: bool) -> SinkSet {
    use morse_beacon::render::speaker::SpeakerSink;

    if silent {
        return sinks.with(LogSink::new());
    }
    match SpeakerSink::open(tone) {
        Ok(speaker) => sinks.with(speaker),
        Err(e) => {
            tracing::warn!(error = %e, "audio output unavailable, playing silently");
            sinks.with(LogSink::new())
        }
    }
}

#[cfg(not(feature = "speaker"))]
fn with_audio(sinks: SinkSet, _tone: &ToneConfig, silent: bool) -> SinkSet {
    if !silent {
        tracing::info!("built without the `speaker` feature, playing silently");
    }
    sinks.with(LogSink::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_unit_must_be_positive() {
        assert!(Cli::try_parse_from(["morse-beacon", "plan", "...", "--unit-ms", "0"]).is_err());
        assert!(Cli::try_parse_from(["morse-beacon", "plan", "...", "--unit-ms", "80"]).is_ok());
    }

    #[test]
    fn test_plan_unit_upper_bound() {
        let too_long = (MAX_UNIT_MS + 1).to_string();
        let args = ["morse-beacon", "plan", "...", "--unit-ms", too_long.as_str()];
        assert!(Cli::try_parse_from(args).is_err());
        assert!(Cli::try_parse_from([
            "morse-beacon",
            "plan",
            "...",
            "--unit-ms",
            "18446744073709551615"
        ])
        .is_err());
    }
}
