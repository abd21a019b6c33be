//! Detached work that must outlive the request that started it.
//!
//! Jobs run on their own tokio task, so dropping or timing out the request
//! future never cancels them. Every job is watched by a supervisor task that
//! logs its error or panic; nothing escapes into the serving process.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use color_eyre::eyre;
use tokio::task::JoinSet;
use tracing::Instrument;

#[derive(Clone, Default)]
pub struct BackgroundTasks {
    supervisors: Arc<Mutex<JoinSet<()>>>,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `job` in the background. Errors and panics are logged and dropped.
    pub fn spawn<F>(&self, name: &'static str, job: F)
    where
        F: Future<Output = eyre::Result<()>> + Send + 'static,
    {
        let span = tracing::info_span!("background_task", task = name);
        let handle = tokio::spawn(job.instrument(span.clone()));

        let supervisor = async move {
            match handle.await {
                Ok(Ok(())) => tracing::debug!("background task finished"),
                Ok(Err(error)) => {
                    tracing::error!(error = ?error, "background task returned error")
                }
                Err(join_error) if join_error.is_panic() => {
                    tracing::error!(error = %join_error, "background task recovered from panic")
                }
                Err(join_error) => {
                    tracing::warn!(error = %join_error, "background task was cancelled")
                }
            }
        }
        .instrument(span);

        let mut supervisors = self.lock();
        // Reap finished supervisors so the set only holds live work.
        while supervisors.try_join_next().is_some() {}
        supervisors.spawn(supervisor);
    }

    /// Number of jobs that have not been reaped yet.
    pub fn pending(&self) -> usize {
        let mut supervisors = self.lock();
        while supervisors.try_join_next().is_some() {}
        supervisors.len()
    }

    /// Wait until every job spawned so far has completed.
    #[tracing::instrument(name = "BackgroundTasks::wait", skip_all)]
    pub async fn wait(&self) {
        let mut drained = std::mem::take(&mut *self.lock());
        while drained.join_next().await.is_some() {}
    }

    fn lock(&self) -> MutexGuard<'_, JoinSet<()>> {
        // Supervisors never panic while holding the lock, but a poisoned
        // mutex must not take the request path down with it.
        self.supervisors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
