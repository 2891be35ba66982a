//! Periodic cleaning expiry check.
//!
//! Runs [`run_expiry_check`] on a fixed interval using `tokio::time::interval`
//! until cancelled.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::cleaning::expiry::run_expiry_check;
use crate::notifications::NotificationDispatcher;

/// Run the expiry check loop every `interval` until `cancel` is triggered.
///
/// The first pass runs immediately on startup.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Expiry check job started");

    let dispatcher = NotificationDispatcher::new(pool.clone());
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Expiry check job stopping");
                break;
            }
            _ = ticker.tick() => {
                match run_expiry_check(&pool, &dispatcher, Utc::now()).await {
                    Ok(report) if report.rooms_notified > 0 => {
                        tracing::info!(
                            rooms_checked = report.rooms_checked,
                            rooms_notified = report.rooms_notified,
                            "Expiry check: pending rooms notified"
                        );
                    }
                    Ok(report) => {
                        tracing::debug!(rooms_checked = report.rooms_checked, "Expiry check: nothing to notify");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Expiry check failed");
                    }
                }
            }
        }
    }
}
