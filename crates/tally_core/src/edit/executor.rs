//! Worker-pool executor for blocking store calls.
//!
//! Store jobs run on tokio's blocking pool so rusqlite work never lands on the
//! caller's thread or an async worker. The completion runs on a runtime task
//! once the job finishes.

use crate::store::{StoreError, StoreResult};
use log::{debug, error};
use std::time::Instant;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct EditExecutor {
    handle: Handle,
}

impl EditExecutor {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Captures the runtime the caller is currently running on.
    ///
    /// # Errors
    /// Returns an error when called outside a tokio runtime.
    pub fn try_current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::new)
    }

    /// Runs `job` on the blocking pool and hands its result to `completion`.
    ///
    /// Returns immediately. A job that panics is reported to `completion` as
    /// `StoreError::TaskFailed`.
    pub fn execute<T, J, C>(&self, task: &'static str, job: J, completion: C) -> JoinHandle<()>
    where
        T: Send + 'static,
        J: FnOnce() -> StoreResult<T> + Send + 'static,
        C: FnOnce(StoreResult<T>) + Send + 'static,
    {
        let started_at = Instant::now();
        self.handle.spawn(async move {
            let result = match tokio::task::spawn_blocking(job).await {
                Ok(result) => result,
                Err(err) => {
                    error!(
                        "event=store_task module=edit status=error task={task} error_code=join_failed error={err}"
                    );
                    Err(StoreError::TaskFailed(err.to_string()))
                }
            };
            debug!(
                "event=store_task module=edit status={} task={task} duration_ms={}",
                if result.is_ok() { "ok" } else { "error" },
                started_at.elapsed().as_millis()
            );
            completion(result);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::EditExecutor;
    use crate::store::StoreError;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn completion_receives_job_result() {
        let executor = EditExecutor::try_current().unwrap();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);

        executor
            .execute("answer", || Ok(42), move |result| {
                *sink.lock().unwrap() = Some(result.unwrap());
            })
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), Some(42));
    }

    #[tokio::test]
    async fn panicking_job_is_reported_as_task_failure() {
        let executor = EditExecutor::try_current().unwrap();
        let seen = Arc::new(Mutex::new(false));
        let sink = Arc::clone(&seen);

        executor
            .execute(
                "boom",
                || -> Result<(), StoreError> { panic!("store exploded") },
                move |result| {
                    *sink.lock().unwrap() = matches!(result, Err(StoreError::TaskFailed(_)));
                },
            )
            .await
            .unwrap();

        assert!(*seen.lock().unwrap());
    }

    #[test]
    fn try_current_fails_outside_runtime() {
        assert!(EditExecutor::try_current().is_err());
    }
}
