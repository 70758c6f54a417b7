use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

use crate::record::{NumericField, Record, TextField};
use crate::sink::SinkBindings;

#[derive(Debug)]
pub struct Staleness {
    last_success_time: Option<DateTime<Utc>>,
    last_update_time: Option<DateTime<Utc>>,
    last_error_time: Option<DateTime<Utc>>,
    last_error_text: Option<String>,
    expiry: ChronoDuration,
    // Latched on the transition into staleness so retraction fires once,
    // not on every cycle while still stale.
    retracted: bool,
}

impl Staleness {
    pub fn new(expiry: Duration) -> Self {
        Self {
            last_success_time: None,
            last_update_time: None,
            last_error_time: None,
            last_error_text: None,
            expiry: ChronoDuration::from_std(expiry).unwrap_or(ChronoDuration::MAX),
            retracted: false,
        }
    }

    pub fn last_success_time(&self) -> Option<DateTime<Utc>> {
        self.last_success_time
    }

    pub fn last_update_time(&self) -> Option<DateTime<Utc>> {
        self.last_update_time
    }

    pub fn last_error_time(&self) -> Option<DateTime<Utc>> {
        self.last_error_time
    }

    pub fn last_error_text(&self) -> Option<&str> {
        self.last_error_text.as_deref()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.last_success_time {
            Some(last_success) => now - last_success > self.expiry,
            None => false,
        }
    }

    pub(crate) fn record_success(&mut self, now: DateTime<Utc>) {
        self.last_success_time = Some(now);
        self.retracted = false;
    }

    pub(crate) fn record_update(&mut self, now: DateTime<Utc>) {
        self.last_update_time = Some(now);
    }

    pub(crate) fn record_error(&mut self, now: DateTime<Utc>, text: String) {
        self.last_error_time = Some(now);
        self.last_error_text = Some(text);
    }

    pub(crate) fn enter_stale(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_expired(now) && !self.retracted {
            self.retracted = true;
            true
        } else {
            false
        }
    }

    pub(crate) fn reset(&mut self) {
        self.last_success_time = None;
        self.last_update_time = None;
        self.last_error_time = None;
        self.last_error_text = None;
        self.retracted = false;
    }
}

#[derive(Debug, PartialEq)]
pub enum ReconcileResult {
    Changed(Record),
    Unchanged,
}

pub fn reconcile(
    previous: &Record,
    incoming: Record,
    sinks: &SinkBindings,
    staleness: &mut Staleness,
    now: DateTime<Utc>,
) -> ReconcileResult {
    let mut changed = 0usize;

    for field in NumericField::ALL {
        let value = incoming.number(field);
        if previous.number(field) == value {
            continue;
        }
        changed += 1;
        match value {
            Some(value) => sinks.publish_number(field, value),
            None => sinks.invalidate_number(field),
        }
    }
    for field in TextField::ALL {
        let value = incoming.text(field);
        if previous.text(field) == value {
            continue;
        }
        changed += 1;
        match value {
            Some(value) => sinks.publish_text(field, value),
            None => sinks.invalidate_text(field),
        }
    }

    staleness.record_success(now);
    sinks.publish_last_success(now);

    if changed == 0 {
        return ReconcileResult::Unchanged;
    }

    staleness.record_update(now);
    sinks.publish_last_updated(now);
    tracing::debug!(changed, "observation reconciled");
    ReconcileResult::Changed(incoming)
}

pub fn retract_if_expired(
    staleness: &mut Staleness,
    sinks: &SinkBindings,
    now: DateTime<Utc>,
) -> bool {
    if !staleness.enter_stale(now) {
        return false;
    }
    tracing::warn!("published values exceeded expiry; retracting");
    sinks.invalidate_all();
    true
}
