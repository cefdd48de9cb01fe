use std::io;
use std::process::{Command, Stdio};
use thiserror::Error;

use crate::config::SpeechConfig;
use crate::phrasebook::Translation;

/// Language of the text being spoken
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Language {
    /// English
    #[value(name = "en")]
    English,
    /// Urdu
    #[value(name = "ur")]
    Urdu,
}

/// Errors from the external synthesizer
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Synthesizer program not installed
    #[error("speech program `{program}` is not available")]
    Unavailable {
        /// Program name
        program: String,
    },

    /// Synthesizer exited unsuccessfully
    #[error("speech program `{program}` failed: {status}")]
    Failed {
        /// Program name
        program: String,
        /// Exit status description
        status: String,
    },

    /// Synthesizer could not be started
    #[error("failed to start speech program")]
    Spawn(#[from] io::Error),

    /// Nothing to say
    #[error("text is empty")]
    EmptyText,
}

/// Text-to-speech backend
#[cfg_attr(test, mockall::automock)]
pub trait SpeechEngine: Send + Sync {
    /// Speak `text` aloud, blocking until done
    ///
    /// # Errors
    /// Returns error if the backend is missing or fails
    fn speak(&self, text: &str, language: Language) -> Result<(), SpeechError>;
}

/// Speech through an external command such as `espeak-ng`
///
/// Invoked as `<program> -v <voice> <text>`.
#[derive(Debug, Clone)]
pub struct CommandSpeech {
    program: String,
    english_voice: String,
    urdu_voice: String,
}

impl CommandSpeech {
    /// Build from config
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            program: config.program.clone(),
            english_voice: config.english_voice.clone(),
            urdu_voice: config.urdu_voice.clone(),
        }
    }

    /// Voice passed for `language`
    pub fn voice(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english_voice,
            Language::Urdu => &self.urdu_voice,
        }
    }

    /// True if the program can be started
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    fn command(&self, text: &str, language: Language) -> Command {
        let mut command = Command::new(&self.program);
        command.arg("-v").arg(self.voice(language)).arg(text);
        command
    }
}

impl SpeechEngine for CommandSpeech {
    fn speak(&self, text: &str, language: Language) -> Result<(), SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        tracing::debug!(program = %self.program, ?language, chars = text.chars().count(), "speaking");

        let status = self.command(text, language).status().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                SpeechError::Unavailable {
                    program: self.program.clone(),
                }
            } else {
                SpeechError::Spawn(e)
            }
        })?;

        if !status.success() {
            return Err(SpeechError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }

        tracing::info!(?language, "speech finished");
        Ok(())
    }
}

/// Speak text, falling back to a log line when speech is unavailable
///
/// Returns whether the text was spoken.
pub fn speak_or_log(engine: &dyn SpeechEngine, text: &str, language: Language) -> bool {
    match engine.speak(text, language) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "speech skipped");
            false
        }
    }
}

/// Speak a phrase lookup result in Urdu
///
/// A miss speaks the fallback message, so the listener always hears an answer.
pub fn speak_translation(engine: &dyn SpeechEngine, translation: &Translation) -> bool {
    if !translation.is_found() {
        tracing::info!("no phrase found, speaking the fallback message");
    }
    speak_or_log(engine, translation.text(), Language::Urdu)
}
