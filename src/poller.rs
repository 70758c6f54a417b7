use chrono::Utc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::config::Config;
use crate::fetch::Fetcher;
use crate::parse::parse_and_select;
use crate::reconcile::{reconcile, retract_if_expired, ReconcileResult, Staleness};
use crate::record::Record;
use crate::sink::SinkBindings;
use crate::watchdog::Watchdog;

type DataChangeHandler = Box<dyn Fn(&Record) + Send + Sync>;
type ErrorHandler = Box<dyn Fn() + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Fetching,
    Parsing,
    Reconciling,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    Changed,
    Unchanged,
    Failed,
}

pub struct Poller {
    fetcher: Fetcher,
    site_name: String,
    sinks: SinkBindings,
    staleness: Staleness,
    previous: Record,
    watchdog_timeout: Duration,
    poll_interval: Option<Duration>,
    state: CycleState,
    on_data_change: Vec<DataChangeHandler>,
    on_error: Vec<ErrorHandler>,
}

impl Poller {
    pub fn new(config: &Config, sinks: SinkBindings) -> anyhow::Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(config)?,
            site_name: config.site_name.clone(),
            sinks,
            staleness: Staleness::new(config.sensor_expiry()),
            previous: Record::default(),
            watchdog_timeout: config.timeouts().watchdog,
            poll_interval: config.poll_interval(),
            state: CycleState::Idle,
            on_data_change: Vec::new(),
            on_error: Vec::new(),
        })
    }

    pub fn on_data_change(&mut self, handler: impl Fn(&Record) + Send + Sync + 'static) {
        self.on_data_change.push(Box::new(handler));
    }

    pub fn on_error(&mut self, handler: impl Fn() + Send + Sync + 'static) {
        self.on_error.push(Box::new(handler));
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn record(&self) -> &Record {
        &self.previous
    }

    pub fn staleness(&self) -> &Staleness {
        &self.staleness
    }

    pub fn set_site_name(&mut self, site_name: impl Into<String>) {
        let site_name = site_name.into();
        if site_name == self.site_name {
            return;
        }
        tracing::info!(site = %site_name, "site changed; resetting retained data");
        self.fetcher.set_site_name(site_name.clone());
        self.site_name = site_name;
        self.previous = Record::default();
        self.staleness.reset();
        self.sinks.invalidate_all();
    }

    pub async fn run_cycle(&mut self) -> CycleOutcome {
        // Runs even when the fetch below fails, so retraction never
        // depends on the feed being reachable.
        retract_if_expired(&mut self.staleness, &self.sinks, Utc::now());

        let _watchdog = Watchdog::arm(self.watchdog_timeout);

        self.state = CycleState::Fetching;
        let body = match self.fetcher.fetch().await {
            Ok(body) => body,
            Err(err) => return self.fail_cycle(err.to_string()),
        };

        self.state = CycleState::Parsing;
        let incoming = match parse_and_select(&body, &self.site_name) {
            Ok(record) => record,
            Err(err) => return self.fail_cycle(err.to_string()),
        };

        self.state = CycleState::Reconciling;
        match reconcile(
            &self.previous,
            incoming,
            &self.sinks,
            &mut self.staleness,
            Utc::now(),
        ) {
            ReconcileResult::Changed(record) => {
                self.previous = record;
                for handler in &self.on_data_change {
                    handler(&self.previous);
                }
                self.state = CycleState::Idle;
                CycleOutcome::Changed
            }
            ReconcileResult::Unchanged => {
                self.state = CycleState::Idle;
                CycleOutcome::Unchanged
            }
        }
    }

    fn fail_cycle(&mut self, error_text: String) -> CycleOutcome {
        self.state = CycleState::Failed;
        let now = Utc::now();
        tracing::warn!(error = %error_text, site = %self.site_name, "poll cycle failed");
        self.staleness.record_error(now, error_text);
        self.sinks.publish_last_error(now);
        for handler in &self.on_error {
            handler();
        }
        self.state = CycleState::Idle;
        CycleOutcome::Failed
    }

    pub async fn run(mut self) {
        let Some(interval) = self.poll_interval else {
            tracing::info!("poll interval disabled; cycles must be driven externally");
            std::future::pending::<()>().await;
            return;
        };

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let outcome = self.run_cycle().await;
            tracing::debug!(outcome = ?outcome, "poll cycle finished");
        }
    }
}
