//! Pipeline coordinator
//!
//! Drains the event channel on a fixed cadence and moves each event through
//! filter, store, notification and presentation, one event at a time.

use crate::alerts::NotificationDispatcher;
use crate::domain::{Event, FilterConfig, FilterDecision, GeoFilter};
use crate::error::StoreError;
use crate::services::channel::EventReceiver;
use crate::services::filter_service::FilterHandle;
use crate::services::presenter::Presenter;
use crate::services::shutdown::StopSignal;
use crate::source::SourceWorker;
use crate::store::{EventStore, InsertOutcome};

use std::thread;
use std::time::Duration;

/// Coordinator lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Draining,
    Filtering,
    Persisting,
    Notifying,
    /// Terminal
    Stopped,
}

/// Configuration for the coordinator
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Interval between drain ticks
    pub tick_interval: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(300),
        }
    }
}

/// A store write that failed; the event was still notified and presented
#[derive(Debug)]
pub struct PersistFailure {
    pub event_id: String,
    pub error: StoreError,
}

/// What happened during one tick
#[derive(Debug, Default)]
pub struct TickReport {
    /// Events taken from the channel
    pub drained: usize,
    /// Ids of accepted events, in processing order
    pub accepted: Vec<String>,
    /// Events dropped by the geofence
    pub rejected: usize,
    /// Accepted events whose id was already stored
    pub duplicates: usize,
    /// Store writes that failed
    pub persist_failures: Vec<PersistFailure>,
}

/// Totals over a whole run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub persist_failures: u64,
}

impl RunSummary {
    fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.accepted += report.accepted.len() as u64;
        self.rejected += report.rejected as u64;
        self.persist_failures += report.persist_failures.len() as u64;
    }
}

/// Single-threaded consumer driving the pipeline
pub struct Coordinator<S: EventStore, P: Presenter> {
    config: CoordinatorConfig,
    receiver: EventReceiver,
    filter: FilterHandle,
    store: S,
    dispatcher: NotificationDispatcher,
    presenter: P,
    source: Option<SourceWorker>,
    state: CoordinatorState,
    shown_filter: Option<FilterConfig>,
}

impl<S: EventStore, P: Presenter> Coordinator<S, P> {
    /// Create a new coordinator
    pub fn new(
        config: CoordinatorConfig,
        receiver: EventReceiver,
        filter: FilterHandle,
        store: S,
        dispatcher: NotificationDispatcher,
        presenter: P,
    ) -> Self {
        Self {
            config,
            receiver,
            filter,
            store,
            dispatcher,
            presenter,
            source: None,
            state: CoordinatorState::Idle,
            shown_filter: None,
        }
    }

    /// Attach the source worker to stop when the coordinator stops
    pub fn with_source(mut self, worker: SourceWorker) -> Self {
        self.source = Some(worker);
        self
    }

    /// Drain and process everything currently queued
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if self.state == CoordinatorState::Stopped {
            return report;
        }

        self.state = CoordinatorState::Draining;
        let events = self.receiver.drain_all();
        report.drained = events.len();

        let filter = self.filter.snapshot();
        if self.shown_filter != Some(filter) {
            self.presenter.filter_changed(&filter);
            self.shown_filter = Some(filter);
        }

        for event in events {
            self.process(event, &filter, &mut report);
        }

        self.state = CoordinatorState::Idle;
        report
    }

    fn process(&mut self, event: Event, filter: &FilterConfig, report: &mut TickReport) {
        self.state = CoordinatorState::Filtering;
        let decision = GeoFilter::evaluate(&event, filter);
        if let FilterDecision::Outside(distance) = decision {
            log::debug!(
                "Dropped {} ({:.1} km away, radius {})",
                event.id,
                distance,
                filter.radius
            );
            report.rejected += 1;
            return;
        }

        self.state = CoordinatorState::Persisting;
        match self.store.insert(&event) {
            Ok(InsertOutcome::Inserted) => {}
            Ok(InsertOutcome::Duplicate) => {
                log::debug!("Event {} already stored", event.id);
                report.duplicates += 1;
            }
            Err(error) => {
                log::error!("Failed to store event {}: {}", event.id, error);
                report.persist_failures.push(PersistFailure {
                    event_id: event.id.clone(),
                    error,
                });
            }
        }

        self.state = CoordinatorState::Notifying;
        self.dispatcher.notify(&event);
        self.presenter.present(&event);

        match decision.distance_km() {
            Some(d) => log::info!("Alert {} accepted ({:.1} km): {}", event.id, d, event.text),
            None => log::info!("Alert {} accepted: {}", event.id, event.text),
        }
        report.accepted.push(event.id);
    }

    /// Tick on a fixed cadence until `stop` is triggered
    pub fn run(&mut self, stop: &StopSignal) -> RunSummary {
        let mut summary = RunSummary::default();
        log::info!(
            "Coordinator running (tick every {:?})",
            self.config.tick_interval
        );

        loop {
            if stop.is_triggered() {
                self.stop();
                break;
            }

            let report = self.tick();
            summary.record(&report);

            thread::sleep(self.config.tick_interval);
        }

        log::info!(
            "Coordinator stopped after {} ticks: {} accepted, {} rejected, {} store failures",
            summary.ticks,
            summary.accepted,
            summary.rejected,
            summary.persist_failures
        );
        summary
    }

    /// Enter the terminal state and signal the source to stop
    pub fn stop(&mut self) {
        self.state = CoordinatorState::Stopped;
        if let Some(source) = &self.source {
            source.stop();
        }
    }

    /// Detach the source worker, e.g. to join it after stopping
    pub fn take_source(&mut self) -> Option<SourceWorker> {
        self.source.take()
    }

    /// Current lifecycle state
    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The presentation target
    pub fn presenter(&self) -> &P {
        &self.presenter
    }
}
