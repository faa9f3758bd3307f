//! Mock implementations for testing
//!
//! Provides scripted sources, fault-injecting stores and recording
//! notification/presentation targets for unit testing without network,
//! audio or a terminal.

use crate::alerts::Notifier;
use crate::domain::{Coordinates, Event, FilterConfig};
use crate::error::{NotifyError, SourceError, StoreError};
use crate::geocode::Geocoder;
use crate::services::presenter::Presenter;
use crate::source::EventSource;
use crate::store::{EventStore, InsertOutcome};

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Source replaying predefined batches
pub struct ScriptedSource {
    batches: VecDeque<Vec<Event>>,
    repeat: Option<Event>,
    fail: bool,
}

impl ScriptedSource {
    /// Return each batch on successive polls, then nothing
    pub fn new(batches: Vec<Vec<Event>>) -> Self {
        Self {
            batches: batches.into(),
            repeat: None,
            fail: false,
        }
    }

    /// Return the same event on every poll
    pub fn repeating(event: Event) -> Self {
        Self {
            batches: VecDeque::new(),
            repeat: Some(event),
            fail: false,
        }
    }

    /// Fail every poll
    pub fn failing() -> Self {
        Self {
            batches: VecDeque::new(),
            repeat: None,
            fail: true,
        }
    }
}

impl EventSource for ScriptedSource {
    fn poll(&mut self) -> Result<Vec<Event>, SourceError> {
        if self.fail {
            return Err(SourceError::Decode("scripted failure".to_string()));
        }
        if let Some(event) = &self.repeat {
            return Ok(vec![event.clone()]);
        }
        Ok(self.batches.pop_front().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// In-memory store that fails writes for selected ids
#[derive(Default)]
pub struct FaultyStore {
    events: Mutex<Vec<Event>>,
    failing_ids: HashSet<String>,
    fail_all: bool,
}

impl FaultyStore {
    /// Fail inserts of the given ids only
    pub fn failing_ids(ids: &[&str]) -> Self {
        Self {
            failing_ids: ids.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Fail every insert
    pub fn always_failing() -> Self {
        Self {
            fail_all: true,
            ..Default::default()
        }
    }

    /// Ids stored so far, in insertion order
    pub fn stored_ids(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.id.clone())
            .collect()
    }
}

impl EventStore for FaultyStore {
    fn insert(&self, event: &Event) -> Result<InsertOutcome, StoreError> {
        if self.fail_all || self.failing_ids.contains(&event.id) {
            return Err(StoreError::Unavailable(format!(
                "injected fault for {}",
                event.id
            )));
        }

        let mut events = self.events.lock().unwrap();
        if events.iter().any(|e| e.id == event.id) {
            return Ok(InsertOutcome::Duplicate);
        }
        events.push(event.clone());
        Ok(InsertOutcome::Inserted)
    }

    fn recent(&self, limit: Option<usize>) -> Result<Vec<Event>, StoreError> {
        let events = self.events.lock().unwrap();
        let newest_first = events.iter().rev().cloned();
        Ok(match limit {
            Some(n) => newest_first.take(n).collect(),
            None => newest_first.collect(),
        })
    }

    fn get(&self, id: &str) -> Result<Option<Event>, StoreError> {
        let events = self.events.lock().unwrap();
        Ok(events.iter().find(|e| e.id == id).cloned())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.events.lock().unwrap().len())
    }
}

/// Notifier recording the ids it was asked to announce
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notified: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every attempt fails (and records nothing)
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Ids notified so far
    pub fn notified(&self) -> Vec<String> {
        self.notified.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: &Event) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::NoBackend);
        }
        self.notified.lock().unwrap().push(event.id.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Presenter recording what it was shown
#[derive(Default)]
pub struct RecordingPresenter {
    presented: Vec<String>,
    filters: Vec<FilterConfig>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids presented so far
    pub fn presented(&self) -> Vec<String> {
        self.presented.clone()
    }

    /// Filter snapshots shown so far
    pub fn filters(&self) -> Vec<FilterConfig> {
        self.filters.clone()
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, event: &Event) {
        self.presented.push(event.id.clone());
    }

    fn filter_changed(&mut self, filter: &FilterConfig) {
        self.filters.push(*filter);
    }
}

/// Geocoder with a fixed answer
#[derive(Default)]
pub struct FixedGeocoder {
    answer: Option<Coordinates>,
    requests: Mutex<Vec<(String, Option<String>)>>,
}

impl FixedGeocoder {
    /// Resolve every postcode to `coords`
    pub fn resolving(coords: Coordinates) -> Self {
        Self {
            answer: Some(coords),
            ..Default::default()
        }
    }

    /// Resolve nothing
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Lookups performed so far
    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Geocoder for FixedGeocoder {
    fn lookup(&self, postcode: &str, house_number: Option<&str>) -> Option<Coordinates> {
        self.requests
            .lock()
            .unwrap()
            .push((postcode.to_string(), house_number.map(String::from)));
        self.answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faulty_store_behaviour() {
        let store = FaultyStore::failing_ids(&["bad"]);
        assert!(store.insert(&Event::new("bad", "t")).is_err());
        assert_eq!(
            store.insert(&Event::new("ok", "t")).unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            store.insert(&Event::new("ok", "t")).unwrap(),
            InsertOutcome::Duplicate
        );
        assert_eq!(store.count().unwrap(), 1);

        let store = FaultyStore::always_failing();
        assert!(store.insert(&Event::new("any", "t")).is_err());
    }

    #[test]
    fn test_scripted_source_exhausts() {
        let mut source = ScriptedSource::new(vec![vec![Event::new("a", "t")]]);
        assert_eq!(source.poll().unwrap().len(), 1);
        assert!(source.poll().unwrap().is_empty());
    }
}
