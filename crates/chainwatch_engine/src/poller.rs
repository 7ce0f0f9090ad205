use std::sync::Arc;
use std::time::Duration;

use chainwatch_core::{Batch, Job, JobError, JobId, JobRequest, MAX_WAIT, POLL_INTERVAL};
use chainwatch_logging::{watch_debug, watch_info, watch_warn};

use crate::{Backend, Clock, JobStatusKind};

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            max_wait: MAX_WAIT,
        }
    }
}

/// Submits a job and polls it until a terminal status or the deadline.
pub struct JobPoller {
    backend: Arc<dyn Backend>,
    clock: Arc<dyn Clock>,
    settings: PollSettings,
}

impl JobPoller {
    pub fn new(backend: Arc<dyn Backend>, clock: Arc<dyn Clock>, settings: PollSettings) -> Self {
        Self {
            backend,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    pub async fn submit_and_await(&self, request: &JobRequest) -> Result<Batch, JobError> {
        let Some(option) = request.option else {
            return Err(JobError::MissingSelection);
        };

        let submitted = self
            .backend
            .submit_job(request)
            .await
            .map_err(|err| JobError::SubmissionFailed(err.message))?;
        let job_id = submitted
            .job_id
            .filter(|id| !id.is_empty())
            .map(JobId::new)
            .ok_or_else(|| JobError::SubmissionFailed("no job id returned".to_string()))?;

        watch_info!(
            "Submitted job {} mode={} option={} block_count={}",
            job_id,
            request.mode,
            option,
            request.block_count
        );

        let job = Job::new(job_id, self.clock.now(), self.settings.max_wait);
        self.await_job(job).await
    }

    /// Poll attempts are strictly sequential; transport failures only cost an interval.
    async fn await_job(&self, mut job: Job) -> Result<Batch, JobError> {
        let mut attempts = 0u32;
        loop {
            if job.is_expired(self.clock.now()) {
                job.time_out();
                watch_warn!("Job {} timed out after {} polls", job.id(), attempts);
                return Err(JobError::JobTimedOut);
            }

            job.begin_polling();
            attempts += 1;
            match self.backend.job_status(job.id()).await {
                Ok(status) => match status.status {
                    JobStatusKind::Complete => {
                        let Some(body) = status.result else {
                            job.fail();
                            return Err(JobError::execution("job completed without a result"));
                        };
                        let batch = match body.into_batch() {
                            Ok(batch) => batch,
                            Err(err) => {
                                job.fail();
                                watch_warn!("Job {} completed with an error: {}", job.id(), err);
                                return Err(err);
                            }
                        };
                        watch_info!(
                            "Job {} complete with {} records after {} polls",
                            job.id(),
                            batch.records.len(),
                            attempts
                        );
                        job.complete(batch);
                        return job
                            .into_result()
                            .ok_or_else(|| JobError::execution("job completed without a result"));
                    }
                    JobStatusKind::Error => {
                        job.fail();
                        let message = status
                            .error
                            .unwrap_or_else(|| "Processing failed".to_string());
                        watch_warn!("Job {} failed: {}", job.id(), message);
                        return Err(JobError::JobExecutionFailed {
                            message,
                            details: status.details,
                        });
                    }
                    JobStatusKind::Pending | JobStatusKind::Unknown => {
                        watch_debug!("Job {} still pending (poll {})", job.id(), attempts);
                    }
                },
                Err(err) => {
                    watch_warn!("Poll {} of job {} failed: {}", attempts, job.id(), err);
                }
            }

            self.clock.sleep(self.settings.poll_interval).await;
        }
    }
}
