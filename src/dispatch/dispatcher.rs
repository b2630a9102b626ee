use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::error;

use super::executor::RuleExecutor;
use super::outcome::{Outcome, RunContext, WorkItem};

/// Receives each outcome as soon as its trigger call completes.
pub trait Progress: Send + Sync {
    fn on_outcome(&self, _item: &WorkItem, _outcome: &Outcome) {}

    fn on_batch(&self, _index: usize, _total: usize, _size: usize) {}
}

impl Progress for () {}

/// Trigger every item concurrently, with at most `limit` calls in flight.
///
/// Results arrive in completion order. Each input item appears exactly once
/// in the output, paired with its own outcome; a task that panics or is
/// otherwise lost by the runtime yields `Outcome::Failed` for its item.
pub async fn dispatch_batch<E, P>(
    executor: Arc<E>,
    ctx: Arc<RunContext>,
    items: &[WorkItem],
    limit: NonZeroUsize,
    progress: &P,
) -> Vec<(WorkItem, Outcome)>
where
    E: RuleExecutor + 'static,
    P: Progress + ?Sized,
{
    let semaphore = Arc::new(Semaphore::new(limit.get()));
    let mut tasks = JoinSet::new();
    let mut pending = HashMap::with_capacity(items.len());

    for item in items {
        let executor = Arc::clone(&executor);
        let ctx = Arc::clone(&ctx);
        let semaphore = Arc::clone(&semaphore);
        let rule_id = item.id.clone();

        let handle = tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => return Outcome::failed(format!("concurrency limiter unavailable: {e}")),
            };
            executor.execute(&ctx, &rule_id).await
        });
        pending.insert(handle.id(), item.clone());
    }

    let mut results = Vec::with_capacity(items.len());
    while let Some(joined) = tasks.join_next_with_id().await {
        let (task_id, outcome) = match joined {
            Ok(done) => done,
            Err(e) => {
                let task_id = e.id();
                let rule_id = pending.get(&task_id).map(|i| i.id.as_str()).unwrap_or("?");
                error!(rule_id, error = %e, "dispatch task failed");
                (task_id, Outcome::failed(format!("dispatch failed: {e}")))
            }
        };

        if let Some(item) = pending.remove(&task_id) {
            progress.on_outcome(&item, &outcome);
            results.push((item, outcome));
        }
    }

    results
}
