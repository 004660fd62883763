use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use super::{
    rpc::{
        domain::{Job, JobStatus},
        ApiClient,
    },
    Client,
};
use crate::errors::ClientError;

impl<A: ApiClient> Client<A> {
    // JOB TRACKING
    // --------------------------------------------------------------------------------------------

    pub async fn get_job(&self, job_id: &str) -> Result<Job, ClientError> {
        Ok(self.api.get_job(job_id).await?)
    }

    pub async fn list_jobs(&self) -> Result<Vec<Job>, ClientError> {
        Ok(self.api.list_jobs().await?)
    }

    pub async fn cancel_job(&self, job_id: &str) -> Result<Job, ClientError> {
        info!("Cancelling job {job_id}");
        Ok(self.api.cancel_job(job_id).await?)
    }

    /// Polls a job until it reaches a terminal state and returns it.
    ///
    /// # Errors
    /// - [ClientError::JobFailed] if the job failed or was cancelled.
    /// - [ClientError::JobTimeout] if the job is still running after the polling timeout.
    pub async fn wait_for_job(&self, job_id: &str) -> Result<Job, ClientError> {
        let started = Instant::now();
        let interval = Duration::from_millis(self.polling.interval_ms);
        let timeout = Duration::from_millis(self.polling.timeout_ms);

        loop {
            let job = self.api.get_job(job_id).await?;
            debug!("Job {job_id} is {}", job.status);

            match job.status {
                JobStatus::Succeeded => {
                    info!("Job {job_id} succeeded after {:?}", started.elapsed());
                    return Ok(job);
                },
                JobStatus::Failed | JobStatus::Cancelled => {
                    return Err(ClientError::JobFailed {
                        job_id: job.id,
                        status: job.status,
                        reason: job.error,
                    });
                },
                JobStatus::Pending | JobStatus::Running => {},
            }

            let elapsed = started.elapsed();
            if elapsed >= timeout {
                return Err(ClientError::JobTimeout {
                    job_id: job_id.to_string(),
                    elapsed_ms: elapsed.as_millis(),
                });
            }

            tokio::time::sleep(interval.min(timeout - elapsed)).await;
        }
    }
}
