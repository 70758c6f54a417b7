//! Polling agent for the Taiwan MOENV air-quality feed.
//!
//! Fetches observations for one configured monitoring site over HTTPS,
//! reconciles them field-by-field against the previously published
//! observation, publishes changes to bound value sinks, and tracks
//! staleness so consumers never keep showing expired data.

pub mod config;
pub mod fetch;
pub mod parse;
pub mod poller;
pub mod reconcile;
pub mod record;
pub mod sink;
pub mod watchdog;
