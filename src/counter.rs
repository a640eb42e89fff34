//! Labeled counter for frontend events, exported in the Prometheus text format.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub const EVENTS_METRIC: &str = "frontend_events_total";
pub const EVENTS_HELP: &str = "Total number of frontend events";
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct LabelPair {
    event: String,
    page: String,
}

/// Cumulative counts keyed by `(event, page)`. Series live for the lifetime
/// of the process and are never reset.
#[derive(Debug)]
pub struct EventCounter {
    name: &'static str,
    help: &'static str,
    series: RwLock<BTreeMap<LabelPair, AtomicU64>>,
}

impl Default for EventCounter {
    fn default() -> Self {
        Self::new(EVENTS_METRIC, EVENTS_HELP)
    }
}

impl EventCounter {
    pub fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            series: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn record(&self, event: &str, page: &str) {
        let key = LabelPair {
            event: event.to_string(),
            page: page.to_string(),
        };

        if let Some(count) = self.read().get(&key) {
            count.fetch_add(1, Ordering::Relaxed);
            return;
        }

        self.write()
            .entry(key)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    #[cfg(test)]
    pub fn get(&self, event: &str, page: &str) -> u64 {
        let key = LabelPair {
            event: event.to_string(),
            page: page.to_string(),
        };
        self.read()
            .get(&key)
            .map(|count| count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn export(&self) -> String {
        let mut body = format!(
            "# HELP {name} {help}\n# TYPE {name} counter\n",
            name = self.name,
            help = escape_help(self.help),
        );
        for (labels, count) in self.read().iter() {
            body.push_str(&format!(
                "{}{{event=\"{}\",page=\"{}\"}} {}\n",
                self.name,
                escape_label(&labels.event),
                escape_label(&labels.page),
                count.load(Ordering::Relaxed),
            ));
        }
        body
    }

    // A panic while holding the lock leaves the map itself intact.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<LabelPair, AtomicU64>> {
        self.series.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<LabelPair, AtomicU64>> {
        self.series.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn escape_help(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
