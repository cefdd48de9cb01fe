use anyhow::Result;
use tracing::{debug, info};

use super::PulseSink;
use crate::pulse::TimedPulse;

/// Sink that only logs, used when no audio output is available
#[derive(Debug, Default)]
pub struct LogSink {
    keyed: usize,
}

impl LogSink {
    /// New silent sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyed intervals seen so far
    pub const fn keyed(&self) -> usize {
        self.keyed
    }
}

impl PulseSink for LogSink {
    fn begin(&mut self, pulse: &TimedPulse) -> Result<()> {
        if pulse.is_on() {
            self.keyed += 1;
        }
        debug!(
            level = ?pulse.level,
            units = pulse.units,
            duration_ms = pulse.duration.as_secs_f64() * 1000.0,
            "pulse"
        );
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        info!(keyed = self.keyed, "silent playback finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse;
    use std::time::Duration;

    #[test]
    fn test_counts_keyed_pulses() {
        let mut sink = LogSink::new();
        for p in pulse::plan("... ---", Duration::from_millis(1)) {
            sink.begin(&p).unwrap();
        }
        sink.finish().unwrap();
        assert_eq!(sink.keyed(), 6);
    }
}
