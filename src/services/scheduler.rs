use crate::error::{AppError, Result};
use crate::services::session::Session;
use crate::services::store::{needs_hourly_update, RecordStore};
use crate::sources::IndicatorSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

/// Periodically refreshes a session once a new hour has started.
pub struct RefreshScheduler<S, R> {
    session: Arc<Session<S, R>>,
    check_interval: Duration,
}

impl<S, R> RefreshScheduler<S, R>
where
    S: IndicatorSource + 'static,
    R: RecordStore + 'static,
{
    pub fn new(session: Arc<Session<S, R>>, check_interval: Duration) -> Self {
        Self {
            session,
            check_interval,
        }
    }

    /// Run one check as of `now`. Returns whether a refresh ran.
    pub async fn tick_at(&self, now: i64) -> Result<bool> {
        let latest = self.session.store().latest_timestamp()?;
        if !needs_hourly_update(latest, now) {
            debug!("Scheduler: data is current (latest {})", latest);
            return Ok(false);
        }

        info!("Scheduler: new hour started, refreshing");
        match self.session.refresh_at(now).await {
            Ok(_) => Ok(true),
            Err(AppError::RefreshInProgress) => {
                debug!("Scheduler: refresh already in flight, skipping");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Spawn the check loop on the runtime.
    pub fn start(self) -> JoinHandle<()> {
        info!(
            "Starting refresh scheduler with {} second interval",
            self.check_interval.as_secs()
        );

        tokio::spawn(async move {
            let mut interval = time::interval(self.check_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                match self.tick_at(chrono::Utc::now().timestamp()).await {
                    Ok(true) => info!("Scheduler: refresh complete"),
                    Ok(false) => {}
                    Err(e) => error!("Scheduler: refresh failed: {}", e),
                }
            }
        })
    }
}
