//! Alert notification system
//!
//! Provides notification channels for accepted events. Notification is a
//! courtesy: the dispatcher swallows every channel failure.

use crate::domain::event::{truncate_chars, Event};
use crate::error::NotifyError;
use std::io::{self, Write};

/// Notification channel trait
pub trait Notifier: Send + Sync {
    /// Announce an accepted event
    fn notify(&self, event: &Event) -> Result<(), NotifyError>;

    /// Channel name for identification
    fn name(&self) -> &str;
}

/// Terminal/console notifier
///
/// Rings the terminal bell and prints an alert banner to stderr.
pub struct TerminalNotifier {
    /// Ring the terminal bell
    bell: bool,
    /// Use colors (ANSI escape codes)
    use_colors: bool,
}

impl TerminalNotifier {
    /// Create a new terminal notifier
    pub fn new() -> Self {
        Self {
            bell: true,
            use_colors: Self::supports_color(),
        }
    }

    /// Create a notifier without bell or colors
    pub fn quiet() -> Self {
        Self {
            bell: false,
            use_colors: false,
        }
    }

    /// Check if terminal supports colors
    fn supports_color() -> bool {
        std::env::var("TERM")
            .map(|term| term != "dumb")
            .unwrap_or(false)
    }

    /// Format the alert banner
    fn format_banner(&self, event: &Event) -> String {
        let header = format!(
            "{} — {} — {}",
            event.region,
            event.unit,
            event.short_timestamp()
        );
        let header = if self.use_colors {
            format!("\x1b[31m\x1b[1mALERT\x1b[0m {}", header)
        } else {
            format!("ALERT {}", header)
        };

        format!("{}\n    {}", header, truncate_chars(&event.text, 500))
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, event: &Event) -> Result<(), NotifyError> {
        let banner = self.format_banner(event);
        let stderr = io::stderr();
        let mut handle = stderr.lock();

        if self.bell {
            write!(handle, "\x07")?;
        }
        writeln!(handle, "{}", banner)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

/// Notification dispatcher
///
/// Fans an accepted event out to every channel. Never fails and never
/// blocks for long: channel errors are logged at debug level and dropped.
pub struct NotificationDispatcher {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotificationDispatcher {
    /// Create a dispatcher with no channels
    pub fn new() -> Self {
        Self {
            notifiers: Vec::new(),
        }
    }

    /// Add a notifier
    pub fn add_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Builder: add a notifier
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.add_notifier(notifier);
        self
    }

    /// Announce an event on all channels (fire-and-forget)
    pub fn notify(&self, event: &Event) {
        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(event) {
                log::debug!(
                    "Notification via {} for {} dropped: {}",
                    notifier.name(),
                    event.id,
                    e
                );
            }
        }
    }

    /// Get number of active notifiers
    pub fn notifier_count(&self) -> usize {
        self.notifiers.len()
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new().with_notifier(Box::new(TerminalNotifier::new()))
    }
}
