//! Service layer for the alert pipeline
//!
//! Services tie the event channel, geofence, store, notification and
//! presentation together.

pub mod channel;
pub mod coordinator;
pub mod filter_service;
pub mod presenter;
pub mod shutdown;

pub use channel::{event_channel, EventReceiver, EventSender};
pub use coordinator::{Coordinator, CoordinatorConfig, CoordinatorState, RunSummary, TickReport};
pub use filter_service::{FilterActivation, FilterHandle, FilterService};
pub use presenter::{event_line, ConsolePresenter, Presenter};
pub use shutdown::StopSignal;
