use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info};

use super::dispatcher::{Progress, dispatch_batch};
use super::executor::RuleExecutor;
use super::outcome::{Outcome, RunConfig, RunContext, WorkItem};

/// Trigger all items in sequential slices of `batch_size`, pausing between slices.
///
/// Each slice is fully drained before the pause starts, so nothing is in
/// flight while waiting. A zero delay skips slicing and dispatches the whole
/// list at once with `batch_size` as the concurrency limit.
pub async fn run_paced<E, P>(
    executor: Arc<E>,
    ctx: Arc<RunContext>,
    items: &[WorkItem],
    config: RunConfig,
    progress: &P,
) -> Vec<(WorkItem, Outcome)>
where
    E: RuleExecutor + 'static,
    P: Progress + ?Sized,
{
    if config.batch_delay.is_zero() {
        info!(items = items.len(), concurrency = config.batch_size.get(), "dispatching without pacing");
        progress.on_batch(1, 1, items.len());
        return dispatch_batch(executor, ctx, items, config.batch_size, progress).await;
    }

    let slices: Vec<&[WorkItem]> = items.chunks(config.batch_size.get()).collect();
    let total = slices.len();
    let mut results = Vec::with_capacity(items.len());

    for (index, slice) in slices.into_iter().enumerate() {
        let batch = index + 1;
        info!(batch, total, size = slice.len(), "dispatching batch");
        progress.on_batch(batch, total, slice.len());

        let outcomes = dispatch_batch(
            Arc::clone(&executor),
            Arc::clone(&ctx),
            slice,
            config.batch_size,
            progress,
        )
        .await;
        results.extend(outcomes);

        if batch < total {
            debug!(delay_ms = config.batch_delay.as_millis() as u64, "pausing before next batch");
            sleep(config.batch_delay).await;
        }
    }

    results
}
