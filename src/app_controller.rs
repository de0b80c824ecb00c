use log::{debug, info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::app_config::Config;
use crate::catalog::{SubtitleCatalog, TextSink};
use crate::errors::{DuplicateRegistrationError, EmitError, LoadError};
use crate::scheduler::{Clock, DisplaySink, PlaybackOutcome, SubtitleScheduler};
use crate::subtitle_keys::{has_prefix, is_line_key, strip_prefix};

// @module: Wiring between the subtitle core and the host

/// Host journal of log entries that carry subtitles
pub trait LogBook: Send + Sync {
    fn contains(&self, key: &str) -> bool;
    fn add(&self, key: &str) -> Result<(), EmitError>;
}

struct ActivePlayback {
    id: u64,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    // @field: Set once by the task when the schedule ends
    outcome: watch::Receiver<Option<PlaybackOutcome>>,
}

/// Owns the catalog and keeps at most one running playback per base key
pub struct Controller {
    // @field: Loaded subtitle sets, shared with playback tasks
    catalog: Arc<SubtitleCatalog>,

    scheduler: SubtitleScheduler,
    clock: Arc<dyn Clock>,
    display: Arc<dyn DisplaySink>,

    // @field: Playback task per base key
    active: Mutex<HashMap<String, ActivePlayback>>,
    next_id: AtomicU64,
}

impl Controller {
    pub fn new(catalog: SubtitleCatalog, clock: Arc<dyn Clock>, display: Arc<dyn DisplaySink>) -> Self {
        Self::from_parts(catalog, SubtitleScheduler::new(), clock, display)
    }

    fn from_parts(
        catalog: SubtitleCatalog,
        scheduler: SubtitleScheduler,
        clock: Arc<dyn Clock>,
        display: Arc<dyn DisplaySink>,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            scheduler,
            clock,
            display,
            active: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    // @method: Load the configured directory and register every text with the host
    pub fn with_config(
        config: &Config,
        clock: Arc<dyn Clock>,
        display: Arc<dyn DisplaySink>,
        texts: &dyn TextSink,
    ) -> Result<Self, LoadError> {
        let catalog = SubtitleCatalog::load(&config.subtitles_dir)?;
        catalog.register_texts(texts);

        let scheduler = SubtitleScheduler::new().with_poll_interval(config.poll_interval());
        Ok(Self::from_parts(catalog, scheduler, clock, display))
    }

    pub fn catalog(&self) -> &SubtitleCatalog {
        &self.catalog
    }

    pub fn scheduler(&self) -> &SubtitleScheduler {
        &self.scheduler
    }

    /// Display filter for the host subtitle queue.
    ///
    /// Full keys only exist for the combined log text and are never shown
    /// as a single subtitle; line keys and foreign keys pass through.
    pub fn should_display(key: &str) -> bool {
        !has_prefix(key) || is_line_key(key)
    }

    /// Add a log entry and start its subtitles.
    ///
    /// Returns `Ok(false)` when no subtitles are loaded for the key.
    pub fn add_log_entry(&self, key: &str, log_book: &dyn LogBook) -> Result<bool, DuplicateRegistrationError> {
        if log_book.contains(key) {
            warn!("Log entry for key {} already exists. Skipping add.", key);
            return Err(DuplicateRegistrationError(key.to_string()));
        }

        let base_key = strip_prefix(key);
        if self.catalog.entries_for(base_key).is_empty() {
            warn!("No subtitles loaded for key: {}", key);
            return Ok(false);
        }

        if let Err(e) = log_book.add(key) {
            warn!("Failed to add log entry for key {}: {}", key, e);
        }

        Ok(self.start_playback(base_key))
    }

    /// Start playing a set, replacing any playback already running for it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_playback(&self, base_key: &str) -> bool {
        if self.catalog.entries_for(base_key).is_empty() {
            warn!("No subtitles loaded for key: {}", base_key);
            return false;
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let (outcome_tx, outcome) = watch::channel(None);
        let catalog = Arc::clone(&self.catalog);
        let clock = Arc::clone(&self.clock);
        let display = Arc::clone(&self.display);
        let scheduler = self.scheduler.clone();
        let key = base_key.to_string();

        let handle = tokio::spawn(async move {
            let entries = catalog.entries_for(&key);
            let result = scheduler
                .play(&key, entries, clock.as_ref(), display.as_ref(), &token)
                .await;
            debug!("Playback of '{}' finished: {:?}", key, result);
            outcome_tx.send_replace(Some(result));
        });

        info!("Started subtitles for '{}'", base_key);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.install(base_key, ActivePlayback { id, cancel, handle, outcome });
        true
    }

    /// Record `playback` as the one running for `base_key`, cancelling any
    /// playback it replaces under the same lock.
    fn install(&self, base_key: &str, playback: ActivePlayback) {
        if let Some(previous) = self.active.lock().insert(base_key.to_string(), playback) {
            previous.cancel.cancel();
            debug!("Replaced running subtitles for '{}'", base_key);
        }
    }

    /// Cancel the playback of a set. Returns true if one was still running.
    pub fn stop_playback(&self, base_key: &str) -> bool {
        let Some(playback) = self.active.lock().remove(base_key) else {
            return false;
        };
        let running = !playback.handle.is_finished();
        playback.cancel.cancel();
        if running {
            debug!("Stopped subtitles for '{}'", base_key);
        }
        running
    }

    /// React to the host toggling a log entry's audio.
    ///
    /// Only prefixed keys are handled. When the entry's audio is the one
    /// currently playing the subtitles stop, otherwise they (re)start.
    /// Returns whether subtitles are playing afterwards.
    pub fn toggle_playback(&self, entry_key: &str, audio_is_current: bool) -> bool {
        if !has_prefix(entry_key) {
            return false;
        }

        let base_key = strip_prefix(entry_key);
        if audio_is_current {
            self.stop_playback(base_key);
            false
        } else {
            self.start_playback(base_key)
        }
    }

    pub fn is_playing(&self, base_key: &str) -> bool {
        self.active
            .lock()
            .get(base_key)
            .is_some_and(|playback| !playback.handle.is_finished())
    }

    /// Wait for the current playback of a set to end.
    ///
    /// The playback stays registered while waiting, so it can still be
    /// stopped or replaced from elsewhere.
    pub async fn wait_idle(&self, base_key: &str) -> Option<PlaybackOutcome> {
        let (id, mut outcome) = {
            let active = self.active.lock();
            let playback = active.get(base_key)?;
            (playback.id, playback.outcome.clone())
        };

        let result = match outcome.wait_for(Option::is_some).await {
            Ok(value) => *value,
            Err(_) => {
                warn!("Playback task for '{}' ended without an outcome", base_key);
                None
            }
        };

        let mut active = self.active.lock();
        if active.get(base_key).is_some_and(|playback| playback.id == id) {
            active.remove(base_key);
        }
        result
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        for (_, playback) in self.active.get_mut().drain() {
            playback.cancel.cancel();
        }
    }
}
