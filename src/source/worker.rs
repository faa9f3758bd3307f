//! Background source worker
//!
//! Runs an [`EventSource`] on a dedicated thread with its own poll cadence.

use super::EventSource;
use crate::error::SourceError;
use crate::services::channel::EventSender;
use crate::services::shutdown::StopSignal;

use std::collections::HashSet;
use std::io;
use std::thread;
use std::time::{Duration, Instant};

/// Longest uninterrupted sleep between stop-flag checks
const STOP_POLL_SLICE: Duration = Duration::from_millis(50);

/// Ids already emitted by this worker
#[derive(Debug, Default)]
pub struct SeenIds {
    ids: HashSet<String>,
}

impl SeenIds {
    /// Record an id, returning `true` the first time it is seen
    pub fn first_sighting(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_string())
    }
}

/// Handle to a source running on its own thread
pub struct SourceWorker {
    stop: StopSignal,
    handle: Option<thread::JoinHandle<()>>,
}

impl SourceWorker {
    /// Start polling `source` every `interval`, pushing new events to `sender`
    pub fn spawn<S>(source: S, sender: EventSender, interval: Duration) -> io::Result<Self>
    where
        S: EventSource + 'static,
    {
        let stop = StopSignal::new();
        let worker_stop = stop.clone();

        let handle = thread::Builder::new()
            .name("event-source".to_string())
            .spawn(move || run_loop(source, sender, interval, worker_stop))?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Ask the worker to stop after its current cycle
    pub fn stop(&self) {
        self.stop.trigger();
    }

    /// Whether a stop was requested
    pub fn is_stopping(&self) -> bool {
        self.stop.is_triggered()
    }

    /// Whether the worker thread has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Stop and wait for the worker thread to exit
    pub fn join(mut self) {
        self.stop.trigger();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Event source thread panicked");
            }
        }
    }
}

fn run_loop<S: EventSource>(
    mut source: S,
    sender: EventSender,
    interval: Duration,
    stop: StopSignal,
) {
    log::info!("Event source '{}' started", source.name());
    let mut seen = SeenIds::default();

    while !stop.is_triggered() {
        if !sleep_unless_stopped(interval, &stop) {
            break;
        }

        match run_cycle(&mut source, &mut seen, &sender) {
            Ok(pushed) => {
                if pushed > 0 {
                    log::debug!("Source '{}' queued {} event(s)", source.name(), pushed);
                }
            }
            Err(SourceError::Disconnected) => {
                log::info!("Event channel closed, stopping source '{}'", source.name());
                break;
            }
            Err(e) => log::warn!("Source '{}' cycle failed: {}", source.name(), e),
        }
    }

    log::info!("Event source '{}' stopped", source.name());
}

/// Run one acquisition cycle, suppressing ids that were already emitted.
///
/// Returns the number of events pushed to the channel.
pub(crate) fn run_cycle<S: EventSource>(
    source: &mut S,
    seen: &mut SeenIds,
    sender: &EventSender,
) -> Result<usize, SourceError> {
    let mut pushed = 0;
    for event in source.poll()? {
        if !seen.first_sighting(&event.id) {
            log::debug!("Suppressed duplicate event {}", event.id);
            continue;
        }
        sender.push(event)?;
        pushed += 1;
    }
    Ok(pushed)
}

/// Sleep for `duration` in short slices; returns `false` if stopped meanwhile
fn sleep_unless_stopped(duration: Duration, stop: &StopSignal) -> bool {
    let deadline = Instant::now() + duration;
    loop {
        if stop.is_triggered() {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep((deadline - now).min(STOP_POLL_SLICE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Event;
    use crate::mock::ScriptedSource;
    use crate::services::channel::event_channel;

    #[test]
    fn test_seen_ids() {
        let mut seen = SeenIds::default();
        assert!(seen.first_sighting("a"));
        assert!(!seen.first_sighting("a"));
        assert!(seen.first_sighting("b"));
        assert!(!seen.first_sighting("b"));
        assert!(!seen.first_sighting("a"));
    }

    #[test]
    fn test_cycle_suppresses_duplicates_within_batch() {
        let mut source = ScriptedSource::new(vec![vec![
            Event::new("X", "t").with_text("first"),
            Event::new("X", "t").with_text("second"),
            Event::new("Y", "t"),
        ]]);
        let (tx, rx) = event_channel();
        let mut seen = SeenIds::default();

        let pushed = run_cycle(&mut source, &mut seen, &tx).unwrap();
        assert_eq!(pushed, 2);

        let events = rx.drain_all();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].text, "first");
        assert_eq!(events[1].id, "Y");
    }

    #[test]
    fn test_cycle_suppresses_duplicates_across_cycles() {
        let mut source = ScriptedSource::new(vec![
            vec![Event::new("X", "t")],
            vec![Event::new("X", "t"), Event::new("Z", "t")],
        ]);
        let (tx, rx) = event_channel();
        let mut seen = SeenIds::default();

        run_cycle(&mut source, &mut seen, &tx).unwrap();
        run_cycle(&mut source, &mut seen, &tx).unwrap();

        let ids: Vec<String> = rx.drain_all().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["X", "Z"]);
    }

    #[test]
    fn test_cycle_propagates_source_failure() {
        let mut source = ScriptedSource::failing();
        let (tx, _rx) = event_channel();
        let mut seen = SeenIds::default();

        assert!(matches!(
            run_cycle(&mut source, &mut seen, &tx),
            Err(SourceError::Decode(_))
        ));
    }

    #[test]
    fn test_worker_pushes_and_stops() {
        let source = ScriptedSource::new(vec![vec![Event::new("A", "t")], vec![Event::new("B", "t")]]);
        let (tx, rx) = event_channel();

        let worker = SourceWorker::spawn(source, tx, Duration::from_millis(5)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut received = Vec::new();
        while received.len() < 2 && Instant::now() < deadline {
            received.extend(rx.drain_all());
            thread::sleep(Duration::from_millis(5));
        }

        worker.stop();
        assert!(worker.is_stopping());
        worker.join();

        let ids: Vec<String> = received.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_worker_exits_when_receiver_dropped() {
        let source = ScriptedSource::repeating(Event::new("A", "t"));
        let (tx, rx) = event_channel();
        drop(rx);

        let worker = SourceWorker::spawn(source, tx, Duration::from_millis(1)).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while !worker.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(worker.is_finished());
    }

    #[test]
    fn test_sleep_unless_stopped() {
        let stop = StopSignal::new();
        assert!(sleep_unless_stopped(Duration::from_millis(1), &stop));
        stop.trigger();
        assert!(!sleep_unless_stopped(Duration::from_secs(60), &stop));
    }
}
