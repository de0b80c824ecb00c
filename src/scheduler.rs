/*!
 * Time-driven playback of a subtitle set.
 *
 * The scheduler replays cues against a host clock and emits one display key
 * per cue once its start offset has elapsed. It runs as a cooperative task:
 * waiting is done with short sleeps on the tokio timer, racing a
 * cancellation token, so it never blocks a thread.
 */

use std::time::Duration;
use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::errors::EmitError;
use crate::subtitle_keys::line_key;
use crate::subtitle_processor::SubtitleEntry;

// @const: How often the clock is re-checked while waiting for a deadline
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Monotonic time source in seconds since an arbitrary origin
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Host sink that displays one subtitle line by key
pub trait DisplaySink: Send + Sync {
    fn emit(&self, display_key: &str) -> Result<(), EmitError>;
}

/// Clock backed by the tokio timer, so paused-time tests can drive it
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: tokio::time::Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Terminal state of one playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Every entry was emitted (emit failures included)
    Completed { emitted: usize },
    /// Cancellation was observed before the schedule finished
    Cancelled { emitted: usize },
}

impl PlaybackOutcome {
    /// Number of entries handed to the sink
    pub fn emitted(&self) -> usize {
        match self {
            Self::Completed { emitted } | Self::Cancelled { emitted } => *emitted,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Stateless per invocation; the caller keeps at most one playback per key.
#[derive(Debug, Clone)]
pub struct SubtitleScheduler {
    poll_interval: Duration,
}

impl Default for SubtitleScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SubtitleScheduler {
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Use a different clock re-check interval. Zero is clamped to 1ms.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Play `entries` for `base_key`, emitting `line_key(base_key, i)` for
    /// each entry once `origin + entry.start` has been reached.
    ///
    /// Late entries are emitted late, never dropped. Cancellation stops the
    /// playback before the next emission.
    pub async fn play<C, S>(
        &self,
        base_key: &str,
        entries: &[SubtitleEntry],
        clock: &C,
        sink: &S,
        cancel: &CancellationToken,
    ) -> PlaybackOutcome
    where
        C: Clock + ?Sized,
        S: DisplaySink + ?Sized,
    {
        let origin = clock.now();
        debug!("Playing {} line(s) for '{}'", entries.len(), base_key);

        for (i, entry) in entries.iter().enumerate() {
            let deadline = origin + entry.start;

            while clock.now() < deadline {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("Playback of '{}' cancelled after {} line(s)", base_key, i);
                        return PlaybackOutcome::Cancelled { emitted: i };
                    }
                    _ = tokio::time::sleep(self.poll_interval) => {}
                }
            }

            if cancel.is_cancelled() {
                debug!("Playback of '{}' cancelled after {} line(s)", base_key, i);
                return PlaybackOutcome::Cancelled { emitted: i };
            }

            let key = line_key(base_key, i);
            if let Err(e) = sink.emit(&key) {
                warn!("Failed to add subtitle for key {}: {}", key, e);
            }
        }

        PlaybackOutcome::Completed {
            emitted: entries.len(),
        }
    }
}
