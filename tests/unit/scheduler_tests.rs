/*!
 * Tests for time-driven subtitle playback
 */

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use srtcue::{line_key, MonotonicClock, PlaybackOutcome, SubtitleEntry, SubtitleScheduler};
use crate::common::mock_hosts::{ManualClock, RecordingDisplay};

fn entries(starts: &[f64]) -> Arc<Vec<SubtitleEntry>> {
    Arc::new(
        starts
            .iter()
            .enumerate()
            .map(|(i, s)| SubtitleEntry::new(*s, s + 0.5, format!("line {}", i)))
            .collect(),
    )
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

/// Nothing fires before the clock reaches each deadline
#[tokio::test(start_paused = true)]
async fn test_play_withManualClock_shouldWaitForEachDeadline() {
    let clock = ManualClock::default();
    clock.set(10.0);
    let display = Arc::new(RecordingDisplay::default());
    let cues = entries(&[1.0, 2.0]);

    let task = {
        let (clock, display, cues) = (clock.clone(), Arc::clone(&display), Arc::clone(&cues));
        tokio::spawn(async move {
            SubtitleScheduler::new()
                .play("log1", &cues, &clock, display.as_ref(), &CancellationToken::new())
                .await
        })
    };

    settle().await;
    assert!(display.keys().is_empty());

    clock.set(11.0);
    settle().await;
    assert_eq!(display.keys(), vec![line_key("log1", 0)]);

    clock.set(11.9);
    settle().await;
    assert_eq!(display.keys().len(), 1);

    clock.set(15.0);
    let outcome = task.await.expect("playback task");

    assert_eq!(outcome, PlaybackOutcome::Completed { emitted: 2 });
    assert_eq!(display.keys(), vec![line_key("log1", 0), line_key("log1", 1)]);
}

/// A clock that jumps far ahead still fires every entry, in order
#[tokio::test(start_paused = true)]
async fn test_play_whenLate_shouldFireAllEntriesInOrder() {
    let clock = ManualClock::default();
    let display = Arc::new(RecordingDisplay::default());
    let cues = entries(&[0.0, 1.0, 2.0, 3.0]);

    let task = {
        let (clock, display, cues) = (clock.clone(), Arc::clone(&display), Arc::clone(&cues));
        tokio::spawn(async move {
            SubtitleScheduler::new()
                .play("late", &cues, &clock, display.as_ref(), &CancellationToken::new())
                .await
        })
    };

    settle().await;
    clock.set(100.0);
    let outcome = task.await.expect("playback task");

    assert_eq!(outcome.emitted(), 4);
    let expected: Vec<String> = (0..4).map(|i| line_key("late", i)).collect();
    assert_eq!(display.keys(), expected);
}

/// Starts [0, 1, 5] with cancellation at 0.5s emit only the first line
#[tokio::test(start_paused = true)]
async fn test_play_whenCancelledAtHalfSecond_shouldEmitOnlyFirstLine() {
    let display = RecordingDisplay::default();
    let cancel = CancellationToken::new();
    let cues = entries(&[0.0, 1.0, 5.0]);

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        canceller.cancel();
    });

    let outcome = SubtitleScheduler::new()
        .play("log1", &cues, &MonotonicClock::new(), &display, &cancel)
        .await;

    assert_eq!(outcome, PlaybackOutcome::Cancelled { emitted: 1 });
    assert_eq!(display.keys(), vec![line_key("log1", 0)]);

    // Nothing else arrives later
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(display.keys().len(), 1);
}

/// A sink failure on one line does not stop the rest
#[tokio::test(start_paused = true)]
async fn test_play_withRejectedLine_shouldEmitRemainingLines() {
    let display = RecordingDisplay::default();
    display.reject(&line_key("log1", 0));

    let outcome = SubtitleScheduler::new()
        .with_poll_interval(Duration::from_millis(5))
        .play("log1", &entries(&[0.0, 0.2, 0.4]), &MonotonicClock::new(), &display, &CancellationToken::new())
        .await;

    assert_eq!(outcome, PlaybackOutcome::Completed { emitted: 3 });
    assert_eq!(display.keys().len(), 3);
}

/// Real-time clock: total playback lasts at least the last start offset
#[tokio::test(start_paused = true)]
async fn test_play_withMonotonicClock_shouldTakeAsLongAsLastStart() {
    let display = RecordingDisplay::default();
    let clock = MonotonicClock::new();
    let started = tokio::time::Instant::now();

    SubtitleScheduler::new()
        .play("log1", &entries(&[0.0, 0.75, 3.0]), &clock, &display, &CancellationToken::new())
        .await;

    assert!(started.elapsed() >= Duration::from_secs(3));
    assert!(started.elapsed() < Duration::from_millis(3100));
}
