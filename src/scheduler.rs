//! Daily scheduling with an explicit start/stop lifecycle.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler};

use crate::error::{SyncError, SyncResult};
use crate::fitx_client::FitxClient;
use crate::sync::{self, SheetStore};

/// Cron-driven runner for the recurring check-in sync job.
///
/// Owns the underlying [`JobScheduler`] so the schedule can be started and
/// shut down explicitly; the run logic itself lives in [`sync::run_job`] and
/// stays invocable without any scheduler.
pub struct CheckinScheduler {
    scheduler: Option<JobScheduler>,
    schedule: String,
    fitx: Arc<FitxClient>,
    sheet: Arc<dyn SheetStore>,
}

impl CheckinScheduler {
    pub fn new(schedule: String, fitx: Arc<FitxClient>, sheet: Arc<dyn SheetStore>) -> Self {
        Self {
            scheduler: None,
            schedule,
            fitx,
            sheet,
        }
    }

    /// Register the sync job and start the schedule.
    pub async fn start(&mut self) -> SyncResult<()> {
        if self.scheduler.is_some() {
            return Err(SyncError::SchedulerAlreadyRunning);
        }

        let scheduler = JobScheduler::new().await?;

        let fitx = self.fitx.clone();
        let sheet = self.sheet.clone();
        let job = Job::new_async(self.schedule.as_str(), move |job_id, mut handle| {
            let fitx = fitx.clone();
            let sheet = sheet.clone();
            Box::pin(async move {
                sync::run_job(&fitx, sheet.as_ref()).await;

                match handle.next_tick_for_job(job_id).await {
                    Ok(Some(next)) => tracing::info!("Next run at: {}", next),
                    Ok(None) => {}
                    Err(e) => tracing::warn!("Could not determine next run time: {:?}", e),
                }
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;

        self.scheduler = Some(scheduler);
        Ok(())
    }

    /// Shut the schedule down. An in-flight run is not interrupted.
    pub async fn stop(&mut self) -> SyncResult<()> {
        let mut scheduler = self.scheduler.take().ok_or(SyncError::SchedulerNotRunning)?;
        scheduler.shutdown().await?;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }
}
