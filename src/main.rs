use anyhow::Result;

use aqi_agent::config::Config;
use aqi_agent::poller::Poller;
use aqi_agent::record::{NumericField, TextField};
use aqi_agent::sink;

fn init_tracing() -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,aqi_agent=info".into());
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing()?;

    let mut poller = Poller::new(&config, sink::log_bindings())?;
    poller.on_data_change(|record| {
        tracing::info!(
            site = record.text(TextField::SiteName).unwrap_or("unknown"),
            aqi = ?record.number(NumericField::Aqi),
            pollutant = record.text(TextField::Pollutant).unwrap_or(""),
            "observation changed"
        );
    });
    poller.on_error(|| {
        tracing::warn!("poll cycle reported an error");
    });

    let poll_handle = tokio::spawn(poller.run());

    tokio::select! {
        res = poll_handle => {
            if let Err(err) = res {
                tracing::error!(error = %err, "poll task failed");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}
