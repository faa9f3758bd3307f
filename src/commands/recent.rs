//! Recent command implementation
//!
//! Lists the most recently stored alerts.

use super::{store_path, GlobalOptions};
use crate::cli::args::{OutputFormat, RecentArgs};
use crate::cli::output::{print_output, AlertEntry, AlertList};
use crate::error::Result;
use crate::store::{EventStore, SqliteStore};

/// Execute the recent command
pub fn run_recent(args: &RecentArgs, format: OutputFormat, global: &GlobalOptions) -> Result<()> {
    let config = global.finish(global.builder()?)?;
    let store = SqliteStore::open(store_path(&config))?;

    let list = recent_alerts(&store, (!args.all).then_some(args.limit))?;
    print_output(&list, format)?;

    Ok(())
}

fn recent_alerts<S: EventStore>(store: &S, limit: Option<usize>) -> Result<AlertList> {
    let events = store.recent(limit)?;
    Ok(AlertList {
        total_stored: store.count()?,
        alerts: events.iter().map(AlertEntry::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Event;

    #[test]
    fn test_recent_alerts_newest_first() {
        let store = SqliteStore::in_memory().unwrap();
        for id in ["a", "b", "c"] {
            store.insert(&Event::new(id, "2025-01-01T00:00:00Z")).unwrap();
        }

        let list = recent_alerts(&store, Some(2)).unwrap();
        assert_eq!(list.total_stored, 3);
        let ids: Vec<&str> = list.alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);

        let all = recent_alerts(&store, None).unwrap();
        assert_eq!(all.alerts.len(), 3);
    }
}
