use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://data.moenv.gov.tw/api/v2/aqx_p_432";

// The watchdog window must cover connect + response + parse time; that is
// a deployment contract, not something validated here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub response: Duration,
    pub watchdog: Duration,
}

const DEFAULT_LANGUAGE: &str = "zh";
const DEFAULT_LIMIT: u32 = 20;
const DEFAULT_SENSOR_EXPIRY_SECS: u64 = 90 * 60;
const DEFAULT_WATCHDOG_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_HTTP_CONNECT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

#[derive(Clone, Debug)]
pub struct Config {
    pub endpoint: String,
    pub api_key: String,
    pub site_name: String,
    pub language: String,
    pub limit: u32,
    pub sensor_expiry_secs: u64,
    pub watchdog_timeout_ms: u64,
    pub http_connect_timeout_ms: u64,
    pub http_timeout_ms: u64,
    // 0 = no internal scheduler; cycles are driven externally
    pub poll_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let endpoint = env::var("AQI_ENDPOINT")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let api_key = env::var("AQI_API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .context("AQI_API_KEY is required")?;
        let site_name = env::var("AQI_SITE_NAME")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .context("AQI_SITE_NAME is required")?;
        let language = env::var("AQI_LANGUAGE")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let limit = env::var("AQI_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_LIMIT);
        let sensor_expiry_secs = env::var("AQI_SENSOR_EXPIRY_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SENSOR_EXPIRY_SECS);
        let watchdog_timeout_ms = env::var("AQI_WATCHDOG_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_WATCHDOG_TIMEOUT_MS);
        let http_connect_timeout_ms = env::var("AQI_HTTP_CONNECT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_CONNECT_TIMEOUT_MS);
        let http_timeout_ms = env::var("AQI_HTTP_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_MS);
        let poll_interval_secs = env::var("AQI_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let config = Self {
            endpoint,
            api_key,
            site_name,
            language,
            limit,
            sensor_expiry_secs,
            watchdog_timeout_ms,
            http_connect_timeout_ms,
            http_timeout_ms,
            poll_interval_secs,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            bail!("AQI_LIMIT must be greater than 0");
        }
        if self.sensor_expiry_secs == 0 {
            bail!("AQI_SENSOR_EXPIRY_SECS must be greater than 0");
        }
        if self.watchdog_timeout_ms == 0 {
            bail!("AQI_WATCHDOG_TIMEOUT_MS must be greater than 0");
        }
        if self.http_connect_timeout_ms == 0 {
            bail!("AQI_HTTP_CONNECT_TIMEOUT_MS must be greater than 0");
        }
        if self.http_timeout_ms == 0 {
            bail!("AQI_HTTP_TIMEOUT_MS must be greater than 0");
        }
        Ok(())
    }

    pub fn sensor_expiry(&self) -> Duration {
        Duration::from_secs(self.sensor_expiry_secs)
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_millis(self.http_connect_timeout_ms),
            response: Duration::from_millis(self.http_timeout_ms),
            watchdog: Duration::from_millis(self.watchdog_timeout_ms),
        }
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        if self.poll_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.poll_interval_secs))
        }
    }
}
