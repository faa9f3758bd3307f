//! Watch command implementation
//!
//! Runs the alert pipeline until interrupted.

use super::{open_geocoder, store_path, GlobalOptions};
use crate::alerts::{NotificationDispatcher, SoundNotifier, SoundPlayer, TerminalNotifier};
use crate::cli::args::{OutputFormat, WatchArgs};
use crate::cli::output::{print_output, Message};
use crate::config::{Config, FilterSettings, NotifyConfig, SourceKind};
use crate::domain::FilterConfig;
use crate::error::{AppError, ConfigError, Result};
use crate::geocode::Geocoder;
use crate::services::{
    event_channel, ConsolePresenter, Coordinator, CoordinatorConfig, FilterActivation,
    FilterService, StopSignal,
};
use crate::source::{EventSource, FeedSource, SimulatedSource, SourceWorker};
use crate::store::SqliteStore;

use std::io;

/// How the geofence was set up at startup
#[derive(Debug)]
pub enum FilterSetup {
    /// Origin given as coordinates
    Origin(FilterConfig),
    /// Origin geocoded from a postcode
    Postcode(FilterActivation),
    /// Postcode configuration was rejected; running unfiltered
    Rejected(ConfigError),
    /// Nothing configured
    Unfiltered,
}

impl FilterSetup {
    fn message(&self) -> Message {
        match self {
            FilterSetup::Origin(filter) => Message::success(format!("Filter active {}", filter)),
            FilterSetup::Postcode(activation) => Message::success(activation.to_string()),
            FilterSetup::Rejected(e) => {
                Message::failure(format!("{}; watching without a location filter", e))
            }
            FilterSetup::Unfiltered => {
                Message::success("No location filter; every alert is accepted")
            }
        }
    }
}

/// Execute the watch command
pub fn run_watch(args: &WatchArgs, format: OutputFormat, global: &GlobalOptions) -> Result<()> {
    let builder = global
        .builder()?
        .with_tick_ms(args.tick_ms)
        .with_poll_interval(args.poll_interval)
        .with_source(args.source.map(SourceKind::from), args.feed_url.clone())
        .with_postcode(args.postcode.clone(), args.house_number.clone())
        .with_origin(args.lat, args.lon)
        .with_radius(args.radius)
        .with_sound(args.no_sound, args.sound_file.clone());
    let config = global.finish(builder)?;

    let path = store_path(&config);
    let store = SqliteStore::open(&path)?;

    let filters = FilterService::new();
    let geocoder = open_geocoder(&config.geocode)?;
    let setup = setup_filter(&config.filter, &filters, &geocoder)?;
    print_output(&setup.message(), format)?;

    log::info!("Starting alert pipeline");
    log::info!("  Source: {:?}", config.source.kind);
    log::info!("  Poll interval: {:?}", config.source.poll_interval());
    log::info!("  Tick interval: {:?}", config.general.tick_interval());
    log::info!("  Store: {}", path.display());
    log::info!("  Filter: {}", filters.current());

    let (sender, receiver) = event_channel();
    let source = build_source(&config)?;
    let worker = SourceWorker::spawn(source, sender, config.source.poll_interval())?;

    let stop = StopSignal::new();
    stop.install_ctrlc_handler()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let coordinator_config = CoordinatorConfig {
        tick_interval: config.general.tick_interval(),
    };
    let mut coordinator = Coordinator::new(
        coordinator_config,
        receiver,
        filters.handle(),
        store,
        build_dispatcher(&config.notify),
        ConsolePresenter::stdout(format == OutputFormat::Json),
    )
    .with_source(worker);

    let summary = coordinator.run(&stop);
    if let Some(worker) = coordinator.take_source() {
        worker.join();
    }

    log::info!(
        "Pipeline stopped after {} ticks ({} accepted, {} rejected, {} store failures)",
        summary.ticks,
        summary.accepted,
        summary.rejected,
        summary.persist_failures
    );

    if format != OutputFormat::Json {
        let msg = Message::success(format!(
            "Stopped: {} alerts accepted, {} outside the filter",
            summary.accepted, summary.rejected
        ));
        print_output(&msg, format)?;
    }

    Ok(())
}

/// Apply the configured geofence.
///
/// Explicit coordinates take precedence over a postcode. A postcode that
/// cannot be resolved is reported, not fatal; the filter stays unset.
pub fn setup_filter<G: Geocoder + ?Sized>(
    settings: &FilterSettings,
    filters: &FilterService,
    geocoder: &G,
) -> std::result::Result<FilterSetup, ConfigError> {
    let radius = settings.radius()?;

    if let Some(origin) = settings.origin()? {
        return Ok(FilterSetup::Origin(filters.set_origin(origin, radius)));
    }

    let Some(postcode) = &settings.postcode else {
        return Ok(FilterSetup::Unfiltered);
    };

    match filters.configure_postcode(
        geocoder,
        postcode,
        settings.house_number.as_deref(),
        radius.as_km(),
    ) {
        Ok(activation) => Ok(FilterSetup::Postcode(activation)),
        Err(e) => {
            log::warn!("Filter configuration rejected: {}", e);
            Ok(FilterSetup::Rejected(e))
        }
    }
}

fn build_source(config: &Config) -> Result<Box<dyn EventSource>> {
    match config.source.kind {
        SourceKind::Simulated => Ok(Box::new(SimulatedSource::new(config.source.simulation()))),
        SourceKind::Feed => {
            let url = config
                .source
                .feed_url
                .clone()
                .ok_or_else(|| ConfigError::MissingField("source.feed_url".to_string()))?;
            let feed = FeedSource::new(url, config.source.request_timeout())
                .map_err(AppError::Source)?;
            Ok(Box::new(feed))
        }
    }
}

/// Build the notification channels enabled in `config`
pub fn build_dispatcher(config: &NotifyConfig) -> NotificationDispatcher {
    let mut dispatcher = NotificationDispatcher::new();

    if config.terminal {
        dispatcher.add_notifier(Box::new(TerminalNotifier::new()));
    }

    if config.sound {
        let player = config
            .player
            .as_deref()
            .map(SoundPlayer::with_command)
            .unwrap_or_default();
        let resource = config
            .sound_file
            .clone()
            .unwrap_or_else(SoundNotifier::default_resource);

        if !resource.is_file() {
            log::info!(
                "Sound file {} not found; alerts will be silent",
                resource.display()
            );
        }
        dispatcher.add_notifier(Box::new(SoundNotifier::new(player, resource)));
    }

    dispatcher
}
