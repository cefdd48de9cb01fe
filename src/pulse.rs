//! Pulse timing for Morse documents
//!
//! A [`PulsePlan`] walks the raw characters of a Morse document and yields
//! on/off intervals lazily, one character at a time, so a consumer can pace
//! playback against a real clock. Every character emits one interval (its
//! mark) followed by a one-unit gap:
//!
//! | char  | mark          |
//! |-------|---------------|
//! | `.`   | on, 1 unit    |
//! | `-`   | on, 3 units   |
//! | space | off, 3 units  |
//! | `/`   | off, 7 units  |
//! | other | off, 1 unit   |
//!
//! The gap after `/` is not merged into the word space, so a word separator
//! is off for 7 units and then off for 1 more.

use std::borrow::Cow;
use std::time::Duration;

/// Reference unit (100 ms per dot)
pub const DEFAULT_UNIT: Duration = Duration::from_millis(100);

/// Signal level of an interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Transmitter keyed
    On,
    /// Transmitter silent
    Off,
}

/// Interval measured in units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    /// Signal level
    pub level: Level,
    /// Length in units
    pub units: u32,
}

impl Pulse {
    /// Keyed interval
    pub const fn on(units: u32) -> Self {
        Self {
            level: Level::On,
            units,
        }
    }

    /// Silent interval
    pub const fn off(units: u32) -> Self {
        Self {
            level: Level::Off,
            units,
        }
    }

    /// Mark emitted for one document character
    pub const fn mark_for(symbol: char) -> Self {
        match symbol {
            '.' => Self::on(1),
            '-' => Self::on(3),
            ' ' => Self::off(3),
            '/' => Self::off(7),
            _ => Self::off(1),
        }
    }

    /// Gap appended after every mark
    pub const fn gap() -> Self {
        Self::off(1)
    }

    /// Wall-clock length for the given unit, saturating at [`Duration::MAX`]
    pub fn duration(&self, unit: Duration) -> Duration {
        unit.saturating_mul(self.units)
    }

    /// Attach the wall-clock length for the given unit
    pub fn timed(self, unit: Duration) -> TimedPulse {
        TimedPulse {
            level: self.level,
            units: self.units,
            duration: self.duration(unit),
        }
    }
}

/// Interval with its wall-clock length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedPulse {
    /// Signal level
    pub level: Level,
    /// Length in units
    pub units: u32,
    /// Length in time
    pub duration: Duration,
}

impl TimedPulse {
    /// True when the transmitter is keyed
    pub fn is_on(&self) -> bool {
        self.level == Level::On
    }
}

/// Intervals produced for one document character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseStep {
    /// Document character
    pub symbol: char,
    /// Interval for the character itself
    pub mark: TimedPulse,
    /// Trailing inter-symbol gap
    pub gap: TimedPulse,
}

/// Lazy, restartable sequence of intervals for a Morse document
#[derive(Debug, Clone)]
pub struct PulsePlan<'a> {
    doc: Cow<'a, str>,
    unit: Duration,
    cursor: usize,
    pending_gap: Option<TimedPulse>,
}

/// Plan intervals for a Morse document
///
/// Nothing is computed until the plan is iterated. An empty document
/// yields an empty plan.
pub fn plan<'a>(doc: impl Into<Cow<'a, str>>, unit: Duration) -> PulsePlan<'a> {
    PulsePlan {
        doc: doc.into(),
        unit,
        cursor: 0,
        pending_gap: None,
    }
}

impl<'a> PulsePlan<'a> {
    /// Base unit of the plan
    pub const fn unit(&self) -> Duration {
        self.unit
    }

    /// Document being planned
    pub fn document(&self) -> &str {
        &self.doc
    }

    /// Rewind to the first interval
    pub fn restart(&mut self) {
        self.cursor = 0;
        self.pending_gap = None;
    }

    /// Detach the plan from the borrowed document
    pub fn into_owned(self) -> PulsePlan<'static> {
        PulsePlan {
            doc: Cow::Owned(self.doc.into_owned()),
            unit: self.unit,
            cursor: self.cursor,
            pending_gap: self.pending_gap,
        }
    }

    /// Remaining whole characters as steps
    ///
    /// A gap already pending from [`Iterator::next`] is not included.
    pub fn steps(&self) -> Steps<'_> {
        Steps {
            rest: &self.doc[self.cursor..],
            unit: self.unit,
        }
    }

    /// Total length of the intervals not yet yielded, saturating at [`Duration::MAX`]
    pub fn total_duration(&self) -> Duration {
        self.clone()
            .map(|pulse| pulse.duration)
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Total units of the intervals not yet yielded
    pub fn total_units(&self) -> u64 {
        self.clone().map(|pulse| u64::from(pulse.units)).sum()
    }

    fn next_step(&mut self) -> Option<PulseStep> {
        let symbol = self.doc[self.cursor..].chars().next()?;
        self.cursor += symbol.len_utf8();
        Some(step_for(symbol, self.unit))
    }
}

impl Iterator for PulsePlan<'_> {
    type Item = TimedPulse;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(gap) = self.pending_gap.take() {
            return Some(gap);
        }
        let step = self.next_step()?;
        self.pending_gap = Some(step.gap);
        Some(step.mark)
    }
}

/// Per-character view of a plan
#[derive(Debug, Clone)]
pub struct Steps<'p> {
    rest: &'p str,
    unit: Duration,
}

impl Iterator for Steps<'_> {
    type Item = PulseStep;

    fn next(&mut self) -> Option<Self::Item> {
        let mut chars = self.rest.chars();
        let symbol = chars.next()?;
        self.rest = chars.as_str();
        Some(step_for(symbol, self.unit))
    }
}

fn step_for(symbol: char, unit: Duration) -> PulseStep {
    PulseStep {
        symbol,
        mark: Pulse::mark_for(symbol).timed(unit),
        gap: Pulse::gap().timed(unit),
    }
}

/// Unit length for a speed in words per minute (PARIS timing)
///
/// Returns `None` for zero.
pub fn unit_from_wpm(wpm: u32) -> Option<Duration> {
    Duration::from_millis(1200).checked_div(wpm)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn shape(plan: PulsePlan<'_>) -> Vec<(Level, Duration)> {
        plan.map(|p| (p.level, p.duration)).collect()
    }

    #[test]
    fn test_dot_dash_plan() {
        let plan = plan(".-", ms(100));
        assert_eq!(plan.total_duration(), ms(600));
        assert_eq!(
            shape(plan),
            vec![
                (Level::On, ms(100)),
                (Level::Off, ms(100)),
                (Level::On, ms(300)),
                (Level::Off, ms(100)),
            ]
        );
    }

    #[test]
    fn test_word_separator_gap_not_merged() {
        assert_eq!(
            shape(plan("/", ms(100))),
            vec![(Level::Off, ms(700)), (Level::Off, ms(100))]
        );
    }

    #[test]
    fn test_letter_space() {
        assert_eq!(
            shape(plan(" ", ms(100))),
            vec![(Level::Off, ms(300)), (Level::Off, ms(100))]
        );
    }

    #[test]
    fn test_other_characters_are_short_silence() {
        assert_eq!(
            shape(plan("?", ms(10))),
            vec![(Level::Off, ms(10)), (Level::Off, ms(10))]
        );
        assert_eq!(plan("é", ms(10)).count(), 2);
    }

    #[test]
    fn test_empty_plan() {
        let plan = plan("", DEFAULT_UNIT);
        assert_eq!(plan.total_duration(), Duration::ZERO);
        assert_eq!(plan.count(), 0);
    }

    #[test]
    fn test_plan_is_lazy_and_restartable() {
        let mut plan = plan("..", ms(50));
        assert_eq!(plan.next().map(|p| p.level), Some(Level::On));
        assert_eq!(plan.total_units(), 3);

        plan.restart();
        assert_eq!(plan.total_units(), 4);
        assert_eq!(plan.count(), 4);
    }

    #[test]
    fn test_steps_one_per_character() {
        let plan = plan("- /", ms(100));
        let steps: Vec<PulseStep> = plan.steps().collect();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].symbol, '-');
        assert_eq!(steps[0].mark.duration, ms(300));
        assert_eq!(steps[1].mark.units, 3);
        assert_eq!(steps[2].mark.units, 7);
        assert!(steps.iter().all(|s| s.gap == Pulse::gap().timed(ms(100))));
    }

    #[test]
    fn test_into_owned_keeps_position() {
        let doc = String::from(".-");
        let mut plan = plan(doc.as_str(), ms(100));
        plan.next();
        let owned = plan.into_owned();
        drop(doc);
        assert_eq!(owned.count(), 3);
    }

    #[test]
    fn test_sos_total_units() {
        // 3 dots, 3 dashes, 2 letter spaces, each followed by a gap
        let plan = plan("... --- ...", DEFAULT_UNIT);
        assert_eq!(plan.total_units(), 3 * 2 + 3 * 4 + 3 * 2 + 2 * 4);
    }

    #[test]
    fn test_huge_unit_saturates() {
        let plan = plan("/", Duration::from_secs(u64::MAX / 4));
        assert_eq!(plan.clone().count(), 2);
        assert_eq!(plan.clone().next().map(|p| p.duration), Some(Duration::MAX));

        let long = "/".repeat(200);
        let plan = super::plan(long.as_str(), Duration::from_millis(u64::MAX));
        assert_eq!(plan.total_duration(), Duration::MAX);
        assert_eq!(plan.total_units(), 200 * 8);
    }

    #[test]
    fn test_unit_from_wpm() {
        assert_eq!(unit_from_wpm(12), Some(ms(100)));
        assert_eq!(unit_from_wpm(20), Some(ms(60)));
        assert_eq!(unit_from_wpm(0), None);
    }
}
