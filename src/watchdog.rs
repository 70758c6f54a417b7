use std::time::Duration;
use tokio::task::JoinHandle;

pub const WATCHDOG_EXIT_CODE: i32 = 70;

// Armed at cycle start, disarmed by drop at cycle end. Expiry is a fatal
// safety event, not a recoverable error: a transport or parse hung below
// the library's own timeout granularity cannot be unwound from here.
pub struct Watchdog {
    timer: JoinHandle<()>,
}

impl Watchdog {
    pub fn arm(timeout: Duration) -> Self {
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            tracing::error!(
                timeout_ms = timeout.as_millis() as u64,
                "watchdog expired mid-cycle; terminating process"
            );
            std::process::exit(WATCHDOG_EXIT_CODE);
        });
        Self { timer }
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.timer.abort();
    }
}
