//! Fire-and-forget AI enrichment of dreams.
//!
//! Handlers push [`EnrichmentJob`]s into a bounded channel through
//! [`EnrichmentQueue`] and return immediately. [`EnrichmentWorker`] drains
//! the channel, spawning each job as its own task. Delivery is at most once:
//! a full or closed queue drops the job, and a failed job is never retried.

use dreamboard_advisor::{Advisor, SuggestedResource, SuggestedTask, TaskSnapshot};
use dreamboard_core::types::DbId;
use dreamboard_db::models::resource::CreateResource;
use dreamboard_db::models::task::CreateTask;
use dreamboard_db::repositories::{DreamRepo, ResourceRepo, TaskRepo};
use dreamboard_db::DbPool;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Work item for the enrichment worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentJob {
    /// A dream was just created: generate its timeline and resources.
    NewDream {
        dream_id: DbId,
        title: String,
        description: Option<String>,
    },
    /// A dream's task list changed: refresh its progress advice.
    Progress { dream_id: DbId },
}

impl EnrichmentJob {
    pub fn dream_id(&self) -> DbId {
        match self {
            EnrichmentJob::NewDream { dream_id, .. } | EnrichmentJob::Progress { dream_id } => {
                *dream_id
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            EnrichmentJob::NewDream { .. } => "new_dream",
            EnrichmentJob::Progress { .. } => "progress",
        }
    }
}

/// Sending half of the enrichment channel. Cheap to clone.
#[derive(Clone)]
pub struct EnrichmentQueue {
    tx: mpsc::Sender<EnrichmentJob>,
}

impl EnrichmentQueue {
    /// Create a queue with room for `capacity` pending jobs.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<EnrichmentJob>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Hand a job to the worker without waiting.
    ///
    /// Returns `false` if the job was dropped because the queue is full or
    /// the worker has stopped.
    pub fn enqueue(&self, job: EnrichmentJob) -> bool {
        match self.tx.try_send(job) {
            Ok(()) => true,
            Err(TrySendError::Full(job)) => {
                tracing::warn!(
                    dream_id = job.dream_id(),
                    kind = job.kind(),
                    "Enrichment queue full, dropping job"
                );
                false
            }
            Err(TrySendError::Closed(job)) => {
                tracing::warn!(
                    dream_id = job.dream_id(),
                    kind = job.kind(),
                    "Enrichment worker stopped, dropping job"
                );
                false
            }
        }
    }
}

/// Applies advisor output to the database.
#[derive(Clone)]
pub struct EnrichmentWorker {
    pool: DbPool,
    advisor: Advisor,
}

impl EnrichmentWorker {
    pub fn new(pool: DbPool, advisor: Advisor) -> Self {
        Self { pool, advisor }
    }

    /// Process jobs until the channel closes or `cancel` fires, then wait
    /// for in-flight jobs to finish.
    pub async fn run(self, mut rx: mpsc::Receiver<EnrichmentJob>, cancel: CancellationToken) {
        tracing::info!("Enrichment worker started");
        let tracker = TaskTracker::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Enrichment worker stopping");
                    break;
                }
                job = rx.recv() => {
                    let Some(job) = job else {
                        tracing::info!("Enrichment queue closed");
                        break;
                    };
                    let worker = self.clone();
                    tracker.spawn(async move { worker.handle(job).await });
                }
            }
        }

        tracker.close();
        tracker.wait().await;
    }

    /// Process a single job. Failures are logged, never returned.
    pub async fn handle(&self, job: EnrichmentJob) {
        let dream_id = job.dream_id();
        let kind = job.kind();
        tracing::debug!(dream_id, kind, "Processing enrichment job");

        let result = match job {
            EnrichmentJob::NewDream {
                dream_id,
                title,
                description,
            } => self.enrich_new_dream(dream_id, &title, description.as_deref()).await,
            EnrichmentJob::Progress { dream_id } => self.refresh_progress(dream_id).await,
        };

        if let Err(e) = result {
            tracing::warn!(dream_id, kind, error = %e, "Enrichment job failed");
        }
    }

    async fn enrich_new_dream(
        &self,
        dream_id: DbId,
        title: &str,
        description: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        let (timeline, resources) = tokio::join!(
            self.advisor.generate_timeline(title, description),
            self.advisor.generate_resources(title, None),
        );

        if DreamRepo::update_advice(
            &self.pool,
            dream_id,
            &timeline.next_action,
            timeline.ai_confidence,
        )
        .await?
        .is_none()
        {
            tracing::debug!(dream_id, "Dream deleted before enrichment finished");
            return Ok(());
        }

        for task in &timeline.tasks {
            TaskRepo::create(&self.pool, dream_id, &suggested_task_input(task)).await?;
        }
        for resource in &resources {
            ResourceRepo::create(&self.pool, dream_id, &suggested_resource_input(resource))
                .await?;
        }

        tracing::info!(
            dream_id,
            tasks = timeline.tasks.len(),
            resources = resources.len(),
            "Dream enriched"
        );
        Ok(())
    }

    async fn refresh_progress(&self, dream_id: DbId) -> Result<(), sqlx::Error> {
        let Some(dream) = DreamRepo::find_by_id(&self.pool, dream_id).await? else {
            tracing::debug!(dream_id, "Dream deleted before progress analysis");
            return Ok(());
        };

        let snapshots: Vec<TaskSnapshot> = TaskRepo::list_by_dream(&self.pool, dream_id)
            .await?
            .into_iter()
            .map(|t| TaskSnapshot {
                title: t.title,
                status: t.status,
            })
            .collect();

        let analysis = self
            .advisor
            .analyze_dream_progress(&dream.title, &snapshots)
            .await;

        DreamRepo::update_advice(
            &self.pool,
            dream_id,
            &analysis.next_action,
            analysis.ai_confidence,
        )
        .await?;

        tracing::info!(
            dream_id,
            progress = analysis.progress_percentage,
            ai_confidence = analysis.ai_confidence,
            "Dream progress refreshed"
        );
        Ok(())
    }
}

fn suggested_task_input(task: &SuggestedTask) -> CreateTask {
    CreateTask {
        title: task.title.clone(),
        description: Some(task.description.clone()).filter(|d| !d.is_empty()),
        status: Some(task.status),
        priority: Some(task.priority),
        due_date: task.due_timestamp(),
    }
}

fn suggested_resource_input(resource: &SuggestedResource) -> CreateResource {
    CreateResource {
        title: resource.title.clone(),
        description: Some(resource.description.clone()).filter(|d| !d.is_empty()),
        resource_type: resource.resource_type,
        url: resource.url.clone(),
        is_verified: Some(resource.is_verified),
        is_free: Some(resource.is_free),
        read_time: resource.read_time,
        duration: resource.duration,
    }
}
