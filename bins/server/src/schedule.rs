//! Background reconciliation job and shutdown handling.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use kodi_api::{SharedFeed, SharedStore};
use kodi_core::reconciliation::ReconciliationDriver;
use kodi_shared::ReconciliationConfig;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};

/// Runs the driver every `interval_secs` over the trailing
/// `lookback_hours` window.
///
/// Overlapping windows are safe: entries are keyed by correlation id, so a
/// rerun only posts what is new.
pub fn spawn_reconciliation(
    driver: Arc<ReconciliationDriver<SharedFeed, SharedStore>>,
    config: &ReconciliationConfig,
) -> JoinHandle<()> {
    let period = Duration::from_secs(config.interval_secs.max(1));
    let lookback = chrono::Duration::hours(i64::from(config.lookback_hours));
    info!(
        interval_secs = period.as_secs(),
        lookback_hours = config.lookback_hours,
        "Scheduled reconciliation enabled"
    );

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let to = Utc::now();
            match driver.reconcile(to - lookback, to).await {
                Ok(summary) if summary.skipped > 0 => warn!(
                    run_id = %summary.run_id,
                    scanned = summary.scanned,
                    posted = summary.posted,
                    skipped = summary.skipped,
                    "Reconciliation run left transactions unposted"
                ),
                Ok(summary) => info!(
                    run_id = %summary.run_id,
                    scanned = summary.scanned,
                    posted = summary.posted,
                    "Reconciliation run complete"
                ),
                Err(err) => error!(error = %err, "Reconciliation run failed"),
            }
        }
    })
}

/// Waits for Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
