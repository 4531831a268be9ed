//! Bounded-concurrency task scheduling.
//!
//! Keeps a sliding window of at most `limit` tasks in flight: whenever one
//! settles, the next pending factory starts immediately. The window never
//! stalls on a slow early task.

use std::future::Future;

use futures::stream::{self, StreamExt};

/// Run task factories with at most `limit` concurrently in flight.
///
/// Every task is awaited to completion even when another fails; only after
/// the whole batch settles is the first failure (in factory order)
/// surfaced. On success the results keep the factories' order. A `limit`
/// of one degenerates to strict sequential execution.
pub async fn run_with_limit<T, E, F, Fut>(factories: Vec<F>, limit: usize) -> Result<Vec<T>, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let count = factories.len();
    let limit = limit.max(1);

    // buffer_unordered keeps the window sliding but yields in completion
    // order; the index puts results back in factory order.
    let mut slots: Vec<Option<Result<T, E>>> = (0..count).map(|_| None).collect();
    let mut settled = stream::iter(factories.into_iter().enumerate())
        .map(|(index, factory)| async move { (index, factory().await) })
        .buffer_unordered(limit);
    while let Some((index, result)) = settled.next().await {
        if let Some(slot) = slots.get_mut(index) {
            *slot = Some(result);
        }
    }

    let mut values = Vec::with_capacity(count);
    let mut first_error = None;
    for result in slots.into_iter().flatten() {
        match result {
            Ok(value) => values.push(value),
            Err(error) => {
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }
    }
    match first_error {
        Some(error) => Err(error),
        None => Ok(values),
    }
}

/// Window size for a batch of `task_count` tasks: the configured cap when
/// set, the whole batch when the parallel flag is on, else one.
pub fn effective_limit(concurrency: Option<usize>, parallel: bool, task_count: usize) -> usize {
    match concurrency {
        Some(cap) if cap > 0 => cap.min(task_count).max(1),
        _ if parallel => task_count.max(1),
        _ => 1,
    }
}
