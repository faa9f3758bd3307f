//! Alert notification system
//!
//! Fire-and-forget notification of accepted events via terminal and sound channels.

mod notifier;
mod sound;

pub use notifier::{NotificationDispatcher, Notifier, TerminalNotifier};
pub use sound::{SoundNotifier, SoundPlayer};
