//! Renderers that consume a pulse plan
//!
//! Audio and visual renderers implement [`PulseSink`] and are driven by the
//! same [`pacer`] loop so they stay in step with one another.

use anyhow::Result;

use crate::pulse::TimedPulse;

/// Real-time playback loop
pub mod pacer;
/// Tracing-only fallback sink
pub mod log_sink;
/// Live playback on the default output device
#[cfg(feature = "speaker")]
pub mod speaker;
/// Sine tone synthesis
pub mod tone;
/// Visual pulse trace
pub mod trace;
/// WAV export
pub mod wav;

pub use log_sink::LogSink;
pub use pacer::{PlaybackError, PlaybackOutcome, StopHandle};
pub use trace::TraceSink;

/// Receives intervals as playback reaches them
///
/// `begin` is called when an interval starts; the pacer then waits for the
/// interval's duration before the next call.
#[cfg_attr(test, mockall::automock)]
pub trait PulseSink {
    /// An interval starts now
    ///
    /// # Errors
    /// Returns error if the renderer cannot present the interval
    fn begin(&mut self, pulse: &TimedPulse) -> Result<()>;

    /// Playback ended, either completed or stopped
    ///
    /// # Errors
    /// Returns error if the renderer fails to flush
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Fans every interval out to several sinks
#[derive(Default)]
pub struct SinkSet {
    sinks: Vec<Box<dyn PulseSink>>,
}

impl SinkSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink
    #[must_use]
    pub fn with(mut self, sink: impl PulseSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Number of sinks
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// True when no sinks are attached
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl PulseSink for SinkSet {
    fn begin(&mut self, pulse: &TimedPulse) -> Result<()> {
        for sink in &mut self.sinks {
            sink.begin(pulse)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        for sink in &mut self.sinks {
            sink.finish()?;
        }
        Ok(())
    }
}
