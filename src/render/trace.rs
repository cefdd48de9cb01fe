use anyhow::{Context, Result};
use std::io::Write;

use super::PulseSink;
use crate::pulse::{Level, PulsePlan, TimedPulse};

/// Glyph for a keyed unit
pub const ON_GLYPH: char = '█';
/// Glyph for a silent unit
pub const OFF_GLYPH: char = '▁';

/// Unit-resolution waveform of the pulses it receives
///
/// Optionally echoes glyphs to a writer as each pulse begins, which gives a
/// live strip chart when driven by the pacer.
#[derive(Default)]
pub struct TraceSink {
    levels: Vec<u8>,
    echo: Option<Box<dyn Write + Send>>,
}

impl TraceSink {
    /// Buffer-only trace
    pub fn new() -> Self {
        Self::default()
    }

    /// Trace that also writes glyphs to `out` as pulses arrive
    pub fn echoing(out: impl Write + Send + 'static) -> Self {
        Self {
            levels: Vec::new(),
            echo: Some(Box::new(out)),
        }
    }

    /// One entry per unit: 1 keyed, 0 silent
    pub fn levels(&self) -> &[u8] {
        &self.levels
    }

    /// Waveform as a glyph strip
    pub fn render(&self) -> String {
        self.levels.iter().map(|&l| glyph(l)).collect()
    }
}

const fn glyph(level: u8) -> char {
    if level == 0 {
        OFF_GLYPH
    } else {
        ON_GLYPH
    }
}

impl PulseSink for TraceSink {
    fn begin(&mut self, pulse: &TimedPulse) -> Result<()> {
        let level = u8::from(pulse.level == Level::On);
        let start = self.levels.len();
        self.levels
            .extend(std::iter::repeat_n(level, pulse.units as usize));

        if let Some(out) = self.echo.as_mut() {
            let strip: String = self.levels[start..].iter().map(|&l| glyph(l)).collect();
            out.write_all(strip.as_bytes())
                .and_then(|()| out.flush())
                .context("failed to write trace")?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(out) = self.echo.as_mut() {
            writeln!(out).context("failed to write trace")?;
        }
        Ok(())
    }
}

/// Render a whole plan as a glyph strip without pacing
pub fn render_plan(plan: PulsePlan<'_>) -> String {
    let mut sink = TraceSink::new();
    for pulse in plan {
        // buffer-only sinks never fail
        let _ = sink.begin(&pulse);
    }
    sink.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[test]
    fn test_levels_match_python_style_pulses() {
        let mut sink = TraceSink::new();
        for p in pulse::plan(".-", Duration::from_millis(100)) {
            sink.begin(&p).unwrap();
        }
        assert_eq!(sink.levels(), &[1, 0, 1, 1, 1, 0]);
    }

    #[test]
    fn test_render_plan() {
        let strip = render_plan(pulse::plan(". /", Duration::from_millis(1)));
        assert_eq!(strip, "█▁▁▁▁▁▁▁▁▁▁▁▁▁");
        assert_eq!(strip.chars().count(), 2 + 4 + 8);
    }

    #[test]
    fn test_empty_plan_renders_nothing() {
        assert_eq!(render_plan(pulse::plan("", Duration::from_millis(1))), "");
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_echo_writes_as_pulses_begin() {
        let buf = SharedBuf::default();
        let mut sink = TraceSink::echoing(buf.clone());

        let mut plan = pulse::plan("-", Duration::from_millis(1));
        sink.begin(&plan.next().unwrap()).unwrap();
        assert_eq!(String::from_utf8(buf.0.lock().unwrap().clone()).unwrap(), "███");

        sink.begin(&plan.next().unwrap()).unwrap();
        sink.finish().unwrap();
        assert_eq!(
            String::from_utf8(buf.0.lock().unwrap().clone()).unwrap(),
            "███▁\n"
        );
    }
}
