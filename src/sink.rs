use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::record::{NumericField, TextField};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub trait NumericSink: Send + Sync {
    fn publish(&self, value: f64);
    fn invalidate(&self);
}

pub trait TextSink: Send + Sync {
    fn publish(&self, value: &str);
    fn invalidate(&self);
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

// Built once at startup; a field with no binding is still compared but
// never published.
#[derive(Clone, Default)]
pub struct SinkBindings {
    numeric: HashMap<NumericField, Arc<dyn NumericSink>>,
    text: HashMap<TextField, Arc<dyn TextSink>>,
    last_updated: Option<Arc<dyn TextSink>>,
    last_success: Option<Arc<dyn TextSink>>,
    last_error: Option<Arc<dyn TextSink>>,
}

impl SinkBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_numeric(&mut self, field: NumericField, sink: Arc<dyn NumericSink>) -> &mut Self {
        self.numeric.insert(field, sink);
        self
    }

    pub fn bind_text(&mut self, field: TextField, sink: Arc<dyn TextSink>) -> &mut Self {
        self.text.insert(field, sink);
        self
    }

    pub fn bind_last_updated(&mut self, sink: Arc<dyn TextSink>) -> &mut Self {
        self.last_updated = Some(sink);
        self
    }

    pub fn bind_last_success(&mut self, sink: Arc<dyn TextSink>) -> &mut Self {
        self.last_success = Some(sink);
        self
    }

    pub fn bind_last_error(&mut self, sink: Arc<dyn TextSink>) -> &mut Self {
        self.last_error = Some(sink);
        self
    }

    pub(crate) fn publish_number(&self, field: NumericField, value: f64) {
        if let Some(sink) = self.numeric.get(&field) {
            sink.publish(value);
        }
    }

    pub(crate) fn invalidate_number(&self, field: NumericField) {
        if let Some(sink) = self.numeric.get(&field) {
            sink.invalidate();
        }
    }

    pub(crate) fn publish_text(&self, field: TextField, value: &str) {
        if let Some(sink) = self.text.get(&field) {
            sink.publish(value);
        }
    }

    pub(crate) fn invalidate_text(&self, field: TextField) {
        if let Some(sink) = self.text.get(&field) {
            sink.invalidate();
        }
    }

    pub(crate) fn invalidate_all(&self) {
        for sink in self.numeric.values() {
            sink.invalidate();
        }
        for sink in self.text.values() {
            sink.invalidate();
        }
    }

    pub(crate) fn publish_last_updated(&self, now: DateTime<Utc>) {
        if let Some(sink) = &self.last_updated {
            sink.publish(&format_timestamp(now));
        }
    }

    pub(crate) fn publish_last_success(&self, now: DateTime<Utc>) {
        if let Some(sink) = &self.last_success {
            sink.publish(&format_timestamp(now));
        }
    }

    pub(crate) fn publish_last_error(&self, now: DateTime<Utc>) {
        if let Some(sink) = &self.last_error {
            sink.publish(&format_timestamp(now));
        }
    }
}

pub struct LogNumericSink {
    name: &'static str,
}

impl LogNumericSink {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self { name })
    }
}

impl NumericSink for LogNumericSink {
    fn publish(&self, value: f64) {
        tracing::info!(sink = self.name, value, "sink publish");
    }

    fn invalidate(&self) {
        tracing::info!(sink = self.name, "sink invalidate");
    }
}

pub struct LogTextSink {
    name: &'static str,
}

impl LogTextSink {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self { name })
    }
}

impl TextSink for LogTextSink {
    fn publish(&self, value: &str) {
        tracing::info!(sink = self.name, value, "sink publish");
    }

    fn invalidate(&self) {
        tracing::info!(sink = self.name, "sink invalidate");
    }
}

pub fn log_bindings() -> SinkBindings {
    let mut bindings = SinkBindings::new();
    for field in NumericField::ALL {
        bindings.bind_numeric(field, LogNumericSink::new(field.name()));
    }
    for field in TextField::ALL {
        bindings.bind_text(field, LogTextSink::new(field.name()));
    }
    bindings.bind_last_updated(LogTextSink::new("last_updated"));
    bindings.bind_last_success(LogTextSink::new("last_success"));
    bindings.bind_last_error(LogTextSink::new("last_error"));
    bindings
}
