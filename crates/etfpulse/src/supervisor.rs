//! Time-boxed execution of a pipeline run.
//!
//! The work runs on tokio's blocking pool while the caller waits on a timer.
//! A timed-out worker cannot be cancelled; the caller is expected to end the
//! process, which tears the worker down with it.

use std::time::Duration;
use thiserror::Error;
use tracing::error;

/// Budget for one run when none is configured.
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(300);

/// Why a supervised run did not produce a result.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The work did not finish within its budget.
    #[error("Run exceeded its time budget of {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The worker thread panicked or was cancelled.
    #[error("Worker failed: {0}")]
    WorkerPanicked(String),
}

/// Run `work` on a blocking worker and wait at most `budget` for it.
///
/// # Errors
///
/// Returns [`SupervisorError::Timeout`] when the budget elapses first and
/// [`SupervisorError::WorkerPanicked`] when the worker does not return.
pub async fn run_supervised<T, F>(budget: Duration, work: F) -> Result<T, SupervisorError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::task::spawn_blocking(work);
    match tokio::time::timeout(budget, handle).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(join_error)) => {
            error!(error = %join_error, "Supervised worker failed");
            Err(SupervisorError::WorkerPanicked(join_error.to_string()))
        }
        Err(_) => {
            error!(budget_secs = budget.as_secs_f64(), "Supervised run timed out");
            Err(SupervisorError::Timeout(budget))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completed_work_returns_result() {
        let value = run_supervised(Duration::from_secs(5), || 21 * 2).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_inner_errors_pass_through() {
        let result: Result<Result<(), String>, _> =
            run_supervised(Duration::from_secs(5), || Err("bad input".to_string())).await;
        assert_eq!(result.unwrap(), Err("bad input".to_string()));
    }

    #[tokio::test]
    async fn test_slow_work_times_out() {
        let err = run_supervised(Duration::from_millis(20), || {
            std::thread::sleep(Duration::from_millis(300));
        })
        .await
        .unwrap_err();
        assert!(matches!(err, SupervisorError::Timeout(d) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn test_panicking_work_is_reported() {
        let err = run_supervised(Duration::from_secs(5), || -> u32 { panic!("worker blew up") })
            .await
            .unwrap_err();
        assert!(matches!(err, SupervisorError::WorkerPanicked(_)));
    }
}
