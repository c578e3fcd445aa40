//! Pagination data types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use strum_macros::{AsRefStr, EnumIter as EnumIterMacro};

use crate::config::{
    DEFAULT_COLLECT_TIMEOUT, DEFAULT_MAX_CALLS, DEFAULT_MAX_ITEMS, DEFAULT_PAGE_SIZE,
    INTER_PAGE_DELAY, MAX_PAGE_SIZE,
};
use crate::fetch::RequestDescriptor;
use crate::utils::duration_to_ms;

/// Upstream collection envelope: `{data: T[], hasNext?, next?}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, rename = "hasNext")]
    pub has_next: Option<bool>,
    #[serde(default)]
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// Cursor for the following page, if the upstream announced one.
    ///
    /// A missing `hasNext` with a non-empty `next` still counts as more data.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_next == Some(false) {
            return None;
        }
        self.next.as_deref().filter(|cursor| !cursor.is_empty())
    }
}

/// A list query whose parameters are fixed for the lifetime of a collection.
///
/// Cursors are only valid for the parameters they were issued under, so the
/// only way to build a page request is [`PageQuery::page`], which always
/// combines a cursor with this query's own parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    path: String,
    params: Vec<(String, String)>,
    start: Option<String>,
}

impl PageQuery {
    pub fn new(path: impl Into<String>) -> Self {
        PageQuery {
            path: path.into(),
            params: Vec::new(),
            start: None,
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn param_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn param_all<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        for value in values {
            self.params.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Resumes a previous collection of this same query from `cursor`.
    pub fn starting_at(mut self, cursor: impl Into<String>) -> Self {
        self.start = Some(cursor.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn start_cursor(&self) -> Option<&str> {
        self.start.as_deref()
    }

    /// Builds the request for one page.
    pub fn page(&self, cursor: Option<&str>, page_size: u32) -> RequestDescriptor {
        RequestDescriptor::get(self.path.clone())
            .with_query_pairs(&self.params)
            .with_query("limit", page_size)
            .with_query_opt("offset", cursor)
    }
}

/// Stop conditions of one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectLimits {
    pub max_items: usize,
    pub max_calls: u32,
    pub timeout: Duration,
    pub page_size: u32,
    pub inter_page_delay: Duration,
}

impl Default for CollectLimits {
    fn default() -> Self {
        CollectLimits {
            max_items: DEFAULT_MAX_ITEMS,
            max_calls: DEFAULT_MAX_CALLS,
            timeout: DEFAULT_COLLECT_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            inter_page_delay: INTER_PAGE_DELAY,
        }
    }
}

impl CollectLimits {
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_max_calls(mut self, max_calls: u32) -> Self {
        self.max_calls = max_calls;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_inter_page_delay(mut self, delay: Duration) -> Self {
        self.inter_page_delay = delay;
        self
    }

    /// Page size clamped to what the upstream serves.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Why a collection stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ExhaustionReason {
    /// The requested number of items was reached.
    MaxItems,
    /// The upstream call ceiling was reached.
    MaxCalls,
    /// The wall-clock budget ran out.
    Timeout,
    /// The upstream has no further pages.
    NoMorePages,
}

impl std::fmt::Display for ExhaustionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Counters of one collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub api_calls: u32,
    /// Items received from the upstream, before filtering.
    pub items_examined: usize,
    pub elapsed: Duration,
}

/// Merged result of a paginated collection.
///
/// Only a collection that stopped with [`ExhaustionReason::NoMorePages`] is
/// complete. Anything else may be missing items and must be presented as such.
#[derive(Debug, Clone)]
pub struct Collected<T> {
    pub items: Vec<T>,
    pub stats: CollectStats,
    pub exhausted: ExhaustionReason,
    /// Cursor of the first page not fetched, for resuming the same query.
    ///
    /// `None` when the last page fetched was cut short by `max_items`, since
    /// no cursor resumes partway through a page.
    pub next_cursor: Option<String>,
}

impl<T> Collected<T> {
    pub fn is_complete(&self) -> bool {
        self.exhausted == ExhaustionReason::NoMorePages
    }

    /// Human-readable caveat for partial results, `None` when complete.
    pub fn completeness_note(&self) -> Option<String> {
        let note = match self.exhausted {
            ExhaustionReason::NoMorePages => return None,
            ExhaustionReason::MaxItems => format!(
                "may be incomplete: stopped at the requested maximum of {} items",
                self.items.len()
            ),
            ExhaustionReason::MaxCalls => format!(
                "may be incomplete: stopped after {} upstream calls",
                self.stats.api_calls
            ),
            ExhaustionReason::Timeout => format!(
                "may be incomplete: stopped after {}ms time budget",
                self.stats.elapsed.as_millis()
            ),
        };
        Some(note)
    }

    /// Applies `f` to every item, keeping the collection metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Collected<U> {
        Collected {
            items: self.items.into_iter().map(f).collect(),
            stats: self.stats,
            exhausted: self.exhausted,
            next_cursor: self.next_cursor,
        }
    }
}

impl<T: Serialize> Collected<T> {
    /// Upstream-shaped `{data, hasNext, next}` envelope plus completeness metadata.
    pub fn to_envelope(&self) -> Value {
        json!({
            "data": self.items,
            "hasNext": self.next_cursor.is_some(),
            "next": self.next_cursor,
            "exhausted": self.exhausted.as_ref(),
            "complete": self.is_complete(),
            "note": self.completeness_note(),
            "stats": {
                "apiCalls": self.stats.api_calls,
                "itemsExamined": self.stats.items_examined,
                "elapsedMs": duration_to_ms(self.stats.elapsed),
            },
        })
    }
}
