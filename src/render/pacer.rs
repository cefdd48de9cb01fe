use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::PulseSink;
use crate::pulse::PulsePlan;

/// How a playback run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Every interval was played
    Completed {
        /// Intervals started
        pulses: usize,
    },
    /// A stop was requested before the plan ran out
    Stopped {
        /// Intervals started before the stop
        pulses: usize,
    },
}

impl PlaybackOutcome {
    /// Intervals started
    pub const fn pulses(&self) -> usize {
        match self {
            Self::Completed { pulses } | Self::Stopped { pulses } => *pulses,
        }
    }
}

/// Errors raised while driving a sink
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Sink rejected an interval
    #[error("sink failed at pulse {index}: {source}")]
    Sink {
        /// Position of the interval in the plan
        index: usize,
        /// Underlying error
        source: anyhow::Error,
    },

    /// Sink failed to finish
    #[error("sink failed to finish: {0}")]
    Finish(anyhow::Error),
}

/// Requests that an in-progress playback stop
///
/// Cloned handles share one signal. Dropping every handle does not stop
/// playback.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StopHandle {
    /// New handle, not yet stopped
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Stop playback at the next opportunity
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    /// True once [`stop`](Self::stop) was called
    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Play a plan into a sink, pacing each interval against the tokio clock
///
/// # Errors
/// Returns error if the sink fails; the sink is not finished in that case
pub async fn run<S>(
    plan: PulsePlan<'_>,
    sink: &mut S,
    stop: &StopHandle,
) -> Result<PlaybackOutcome, PlaybackError>
where
    S: PulseSink + ?Sized,
{
    let mut signal = stop.subscribe();
    debug!(unit = ?plan.unit(), "playback starting");

    let mut pulses = 0;
    let mut outcome = None;
    for pulse in plan {
        if *signal.borrow_and_update() {
            outcome = Some(PlaybackOutcome::Stopped { pulses });
            break;
        }

        sink.begin(&pulse)
            .map_err(|source| PlaybackError::Sink {
                index: pulses,
                source,
            })?;
        pulses += 1;

        if stopped_while_waiting(&mut signal, pulse.duration).await {
            outcome = Some(PlaybackOutcome::Stopped { pulses });
            break;
        }
    }

    sink.finish().map_err(PlaybackError::Finish)?;

    let outcome = outcome.unwrap_or(PlaybackOutcome::Completed { pulses });
    info!(?outcome, "playback finished");
    Ok(outcome)
}

/// Run playback on its own tokio task
pub fn spawn<S>(
    plan: PulsePlan<'static>,
    mut sink: S,
    stop: StopHandle,
) -> JoinHandle<Result<PlaybackOutcome, PlaybackError>>
where
    S: PulseSink + Send + 'static,
{
    tokio::spawn(async move { run(plan, &mut sink, &stop).await })
}

/// Sleep for `duration`, returning early with `true` if a stop arrives
async fn stopped_while_waiting(signal: &mut watch::Receiver<bool>, duration: Duration) -> bool {
    let sleep = tokio::time::sleep(duration);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            () = &mut sleep => return false,
            changed = signal.changed() => match changed {
                Ok(()) => {
                    if *signal.borrow_and_update() {
                        return true;
                    }
                }
                Err(_) => {
                    // sender gone; nobody can stop us any more
                    sleep.as_mut().await;
                    return false;
                }
            },
        }
    }
}
