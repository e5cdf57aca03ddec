//! Background paper generation jobs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, RwLock};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::{GenerationError, Result};
use crate::models::{PaperDocument, PaperRequest, ProcessingStatus};
use crate::pipeline::PaperPipeline;

/// Public view of a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub id: Uuid,
    pub topic: String,
    pub status: ProcessingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

struct JobRecord {
    status: JobStatus,
    document: Option<PaperDocument>,
    notifier: watch::Sender<ProcessingStatus>,
}

/// Runs the pipeline on background tasks and tracks their progress
///
/// ```no_run
/// # use std::sync::Arc;
/// # use papergen_generation::{JobRegistry, PaperPipeline, PaperRequest};
/// # use papergen_github::{GitHubClient, GitHubClientConfig};
/// # tokio_test::block_on(async {
/// let github = Arc::new(GitHubClient::new(GitHubClientConfig::default()).unwrap());
/// let jobs = JobRegistry::new(Arc::new(PaperPipeline::new(github)));
///
/// let request = PaperRequest::new("Caching").with_repository("https://github.com/octo/demo");
/// let id = jobs.submit(request).await;
/// let status = jobs.wait(id).await.unwrap();
/// println!("{}: {}", status.topic, status.status);
/// # });
/// ```
#[derive(Clone)]
pub struct JobRegistry {
    pipeline: Arc<PaperPipeline>,
    jobs: Arc<RwLock<HashMap<Uuid, JobRecord>>>,
}

impl JobRegistry {
    pub fn new(pipeline: Arc<PaperPipeline>) -> Self {
        Self {
            pipeline,
            jobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Queue `request` and return the job id immediately
    pub async fn submit(&self, request: PaperRequest) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let (notifier, _) = watch::channel(ProcessingStatus::Pending);

        {
            let mut jobs = self.jobs.write().await;
            jobs.insert(
                id,
                JobRecord {
                    status: JobStatus {
                        id,
                        topic: request.topic.clone(),
                        status: ProcessingStatus::Pending,
                        error_message: None,
                        created_at: now,
                        updated_at: now,
                    },
                    document: None,
                    notifier,
                },
            );
        }

        let pipeline = Arc::clone(&self.pipeline);
        let jobs = Arc::clone(&self.jobs);
        tokio::spawn(async move {
            update(&jobs, id, ProcessingStatus::Processing, None, None).await;

            // Inner task so a panicking pipeline still ends the job
            let run = tokio::spawn(async move { pipeline.generate(request).await });
            match run.await {
                Ok(Ok(document)) => {
                    info!(job = %id, document = %document.id, "Job completed");
                    update(&jobs, id, ProcessingStatus::Completed, None, Some(document)).await;
                }
                Ok(Err(e)) => {
                    error!(job = %id, error = %e, "Job failed");
                    update(&jobs, id, ProcessingStatus::Failed, Some(e.to_string()), None).await;
                }
                Err(e) => {
                    error!(job = %id, error = %e, "Job panicked");
                    let message = format!("Job panicked: {e}");
                    update(&jobs, id, ProcessingStatus::Failed, Some(message), None).await;
                }
            }
        });

        info!(job = %id, "Job submitted");
        id
    }

    /// Current status of a job
    pub async fn status(&self, id: Uuid) -> Result<JobStatus> {
        let jobs = self.jobs.read().await;
        jobs.get(&id)
            .map(|record| record.status.clone())
            .ok_or(GenerationError::JobNotFound(id))
    }

    /// Generated document of a completed job
    pub async fn document(&self, id: Uuid) -> Result<PaperDocument> {
        let jobs = self.jobs.read().await;
        let record = jobs.get(&id).ok_or(GenerationError::JobNotFound(id))?;
        match (&record.status.status, &record.document) {
            (ProcessingStatus::Completed, Some(document)) => Ok(document.clone()),
            (ProcessingStatus::Failed, _) => Err(GenerationError::JobFailed {
                id,
                message: record.status.error_message.clone().unwrap_or_default(),
            }),
            (status, _) => Err(GenerationError::JobNotReady { id, status: *status }),
        }
    }

    /// Wait until the job reaches a terminal status
    pub async fn wait(&self, id: Uuid) -> Result<JobStatus> {
        let mut receiver = {
            let jobs = self.jobs.read().await;
            let record = jobs.get(&id).ok_or(GenerationError::JobNotFound(id))?;
            record.notifier.subscribe()
        };

        loop {
            if receiver.borrow_and_update().is_terminal() {
                break;
            }
            // Closed only when the record is gone
            if receiver.changed().await.is_err() {
                break;
            }
        }
        self.status(id).await
    }

    /// Forget a job, returning its last status
    ///
    /// A running job keeps running; its result is discarded.
    pub async fn remove(&self, id: Uuid) -> Result<JobStatus> {
        let mut jobs = self.jobs.write().await;
        jobs.remove(&id)
            .map(|record| record.status)
            .ok_or(GenerationError::JobNotFound(id))
    }

    /// Drop finished jobs last updated more than `max_age` ago
    ///
    /// Returns the number of jobs removed.
    pub async fn prune_finished(&self, max_age: Duration) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(max_age)
            .ok()
            .and_then(|age| Utc::now().checked_sub_signed(age))
        else {
            return 0;
        };

        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, record| {
            !(record.status.status.is_terminal() && record.status.updated_at <= cutoff)
        });
        let removed = before - jobs.len();
        if removed > 0 {
            debug!(removed, "Pruned finished jobs");
        }
        removed
    }

    /// All jobs, oldest first
    pub async fn list(&self) -> Vec<JobStatus> {
        let jobs = self.jobs.read().await;
        let mut statuses: Vec<JobStatus> = jobs.values().map(|r| r.status.clone()).collect();
        statuses.sort_by_key(|s| s.created_at);
        statuses
    }
}

async fn update(
    jobs: &RwLock<HashMap<Uuid, JobRecord>>,
    id: Uuid,
    status: ProcessingStatus,
    error_message: Option<String>,
    document: Option<PaperDocument>,
) {
    let mut jobs = jobs.write().await;
    if let Some(record) = jobs.get_mut(&id) {
        record.status.status = status;
        record.status.updated_at = Utc::now();
        record.status.error_message = error_message;
        record.document = document;
        record.notifier.send_replace(status);
    }
}
