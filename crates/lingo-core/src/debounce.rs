use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Coalesces bursts of calls driven by the same changing input.
///
/// Each `schedule` cancels the previous task if its delay hasn't elapsed yet,
/// so only the last input in a burst is dispatched. A task whose delay
/// already elapsed runs to completion.
pub struct Debouncer {
    delay: Duration,
    current: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            current: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `job` after the delay unless superseded. Resolves to `None` when cancelled.
    pub fn schedule<F, T>(&self, job: F) -> JoinHandle<Option<T>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let token = CancellationToken::new();
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(token.clone());

        if let Some(previous) = previous {
            previous.cancel();
        }

        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => None,
                _ = tokio::time::sleep(delay) => Some(job.await),
            }
        })
    }

    /// Drop whatever is still waiting
    pub fn cancel(&self) {
        if let Some(token) = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn only_last_call_in_burst_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(30));
        let runs = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = ["H", "He", "Hel", "Hello"]
            .into_iter()
            .map(|input| {
                let runs = runs.clone();
                debouncer.schedule(async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                    input.to_string()
                })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(timeout(Duration::from_secs(2), handle).await.unwrap().unwrap());
        }

        assert_eq!(results, vec![None, None, None, Some("Hello".to_string())]);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn spaced_calls_all_run() {
        let debouncer = Debouncer::new(Duration::from_millis(10));

        let first = debouncer.schedule(async { 1 });
        assert_eq!(timeout(Duration::from_secs(2), first).await.unwrap().unwrap(), Some(1));

        let second = debouncer.schedule(async { 2 });
        assert_eq!(timeout(Duration::from_secs(2), second).await.unwrap().unwrap(), Some(2));
    }

    #[tokio::test]
    async fn cancel_drops_waiting_task() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let handle = debouncer.schedule(async { "late" });
        debouncer.cancel();
        assert_eq!(timeout(Duration::from_secs(2), handle).await.unwrap().unwrap(), None);
    }
}
