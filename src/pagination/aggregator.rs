//! Paginated aggregation loop.

use log::{debug, info};
use serde::de::DeserializeOwned;
use tokio::time::Instant;

use super::types::{CollectLimits, CollectStats, Collected, ExhaustionReason, Page, PageQuery};
use crate::error_handling::ApiError;
use crate::fetch::Executor;
use crate::utils::duration_to_ms;

/// Merges the pages of one list query until a stop condition holds.
///
/// Every page goes through the executor, so throttling and retries apply per
/// page. A failed page aborts the collection with that page's error.
pub struct Aggregator<'a> {
    executor: &'a Executor,
    limits: CollectLimits,
}

impl<'a> Aggregator<'a> {
    pub fn new(executor: &'a Executor, limits: CollectLimits) -> Self {
        Aggregator { executor, limits }
    }

    pub fn limits(&self) -> &CollectLimits {
        &self.limits
    }

    /// Collects every item of `query`, subject to the limits.
    pub async fn collect<T>(&self, query: &PageQuery) -> Result<Collected<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        self.run(query, None::<fn(&T) -> bool>).await
    }

    /// Collects the items of `query` accepted by `predicate`.
    ///
    /// `max_items` counts accepted items; `items_examined` counts everything
    /// the upstream returned.
    pub async fn collect_filtered<T, P>(
        &self,
        query: &PageQuery,
        predicate: P,
    ) -> Result<Collected<T>, ApiError>
    where
        T: DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        self.run(query, Some(predicate)).await
    }

    async fn run<T, P>(&self, query: &PageQuery, predicate: Option<P>) -> Result<Collected<T>, ApiError>
    where
        T: DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        let limits = &self.limits;
        let max_calls = limits.max_calls.max(1);
        let started = Instant::now();
        let mut items: Vec<T> = Vec::new();
        let mut stats = CollectStats::default();
        let mut cursor: Option<String> = query.start_cursor().map(str::to_owned);

        if limits.max_items == 0 {
            return Ok(finish(query, items, stats, started, ExhaustionReason::MaxItems, cursor));
        }

        let exhausted = loop {
            // Without a filter every received item is kept, so there is no
            // point asking for more than is still missing.
            let remaining = limits.max_items - items.len();
            let page_size = if predicate.is_none() {
                let remaining = u32::try_from(remaining).unwrap_or(u32::MAX);
                limits.effective_page_size().min(remaining)
            } else {
                limits.effective_page_size()
            };

            let request = query.page(cursor.as_deref(), page_size);
            let body = self.executor.execute(request).await?;
            stats.api_calls += 1;

            let page: Page<T> =
                serde_json::from_value(body).map_err(|e| ApiError::MalformedResponse {
                    path: query.path().to_string(),
                    reason: format!("unexpected page shape: {e}"),
                })?;
            let raw_count = page.data.len();
            let next = page.next_cursor().map(str::to_owned);
            stats.items_examined += raw_count;

            let mut truncated = false;
            for item in page.data {
                if let Some(predicate) = &predicate {
                    if !predicate(&item) {
                        continue;
                    }
                }
                if items.len() == limits.max_items {
                    truncated = true;
                    break;
                }
                items.push(item);
            }
            cursor = next;

            debug!(
                "Page {} of {}: {} received, {} kept so far, next cursor: {}",
                stats.api_calls,
                query.path(),
                raw_count,
                items.len(),
                cursor.as_deref().unwrap_or("none")
            );

            if truncated {
                // Resuming from `next` would skip the items dropped above
                cursor = None;
                break ExhaustionReason::MaxItems;
            }
            if cursor.is_none() || raw_count == 0 {
                cursor = None;
                break ExhaustionReason::NoMorePages;
            }
            if items.len() >= limits.max_items {
                break ExhaustionReason::MaxItems;
            }
            if stats.api_calls >= max_calls {
                break ExhaustionReason::MaxCalls;
            }
            if started.elapsed() >= limits.timeout {
                break ExhaustionReason::Timeout;
            }

            if !limits.inter_page_delay.is_zero() {
                tokio::time::sleep(limits.inter_page_delay).await;
                if started.elapsed() >= limits.timeout {
                    break ExhaustionReason::Timeout;
                }
            }
        };

        Ok(finish(query, items, stats, started, exhausted, cursor))
    }
}

fn finish<T>(
    query: &PageQuery,
    items: Vec<T>,
    mut stats: CollectStats,
    started: Instant,
    exhausted: ExhaustionReason,
    next_cursor: Option<String>,
) -> Collected<T> {
    stats.elapsed = started.elapsed();
    info!(
        "Collected {} items from {} in {} calls ({}ms, {} examined), stopped: {}",
        items.len(),
        query.path(),
        stats.api_calls,
        duration_to_ms(stats.elapsed),
        stats.items_examined,
        exhausted
    );
    Collected {
        items,
        stats,
        exhausted,
        next_cursor,
    }
}
