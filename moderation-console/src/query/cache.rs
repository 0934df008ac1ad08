use super::{Query, QueryError, QueryKey, QueryResult};
use crate::services::ClientError;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use metrics::counter;
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::Instrument;

/// Shortest sweep period accepted by [`QueryClient::spawn_garbage_collector`].
pub const MIN_GC_INTERVAL: Duration = Duration::from_secs(1);

type Data = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<Data, QueryError>>>;

/// Freshness and retention windows for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Cached data younger than this is served without refetching.
    pub stale_time: Duration,
    /// Entries unused for this long are dropped by [`QueryClient::collect_garbage`].
    pub gc_time: Duration,
}

impl QueryOptions {
    pub const fn new(stale_time: Duration, gc_time: Duration) -> Self {
        Self {
            stale_time,
            gc_time,
        }
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::new(Duration::ZERO, Duration::from_secs(5 * 60))
    }
}

struct InFlight {
    id: u64,
    shared: SharedFetch,
}

struct Entry {
    data: Option<Data>,
    updated_at: Option<Instant>,
    in_flight: Option<InFlight>,
    last_used: Instant,
    gc_time: Duration,
}

impl Entry {
    fn new(now: Instant, gc_time: Duration) -> Self {
        Self {
            data: None,
            updated_at: None,
            in_flight: None,
            last_used: now,
            gc_time,
        }
    }

    fn fresh_data(&self, now: Instant, stale_time: Duration) -> Option<&Data> {
        let updated_at = self.updated_at?;
        if now.duration_since(updated_at) < stale_time {
            self.data.as_ref()
        } else {
            None
        }
    }
}

/// Shared cache of query results keyed by [`QueryKey`].
///
/// Concurrent fetches of one key share a single request. No map guard is
/// held across an await.
#[derive(Clone, Default)]
pub struct QueryClient {
    entries: Arc<DashMap<QueryKey, Entry>>,
    next_fetch_id: Arc<AtomicU64>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `query`, serving fresh cached data or joining an in-flight
    /// fetch for the same key when there is one.
    ///
    /// Failures are not cached and are never retried.
    pub async fn fetch<T>(&self, query: Query<T>, options: QueryOptions) -> QueryResult<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let (key, fetch) = query.into_parts();
        let now = Instant::now();

        let shared = {
            let mut entry = self
                .entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(now, options.gc_time));
            entry.last_used = now;
            entry.gc_time = entry.gc_time.max(options.gc_time);

            if let Some(value) = entry
                .fresh_data(now, options.stale_time)
                .and_then(|data| data.downcast_ref::<T>())
            {
                counter!("query_cache_hits_total", "namespace" => key.namespace().to_string())
                    .increment(1);
                return Ok(value.clone());
            }

            if let Some(shared) = entry.in_flight.as_ref().map(|f| f.shared.clone()) {
                shared
            } else {
                counter!("query_cache_misses_total", "namespace" => key.namespace().to_string())
                    .increment(1);
                tracing::debug!(key = %key, "Dispatching query");

                // Detached so it settles even when every caller has gone away.
                let id = self.next_fetch_id.fetch_add(1, Ordering::Relaxed);
                let client = self.clone();
                let task_key = key.clone();
                let join_client = self.clone();
                let join_key = key.clone();
                let task = tokio::spawn(
                    async move {
                        let result = fetch()
                            .await
                            .map(|value| Arc::new(value) as Data)
                            .map_err(Arc::new);
                        client.settle(&task_key, id, &result);
                        result
                    }
                    .instrument(tracing::Span::current()),
                );

                let shared = async move {
                    match task.await {
                        Ok(result) => result,
                        Err(e) => {
                            let result = Err(Arc::new(ClientError::Aborted(e.to_string())));
                            join_client.settle(&join_key, id, &result);
                            result
                        }
                    }
                }
                .boxed()
                .shared();
                entry.in_flight = Some(InFlight {
                    id,
                    shared: shared.clone(),
                });
                shared
            }
        };

        let data = shared.await?;
        data.downcast_ref::<T>().cloned().ok_or_else(|| {
            Arc::new(ClientError::Parse(format!(
                "cached value for {} has an unexpected type",
                key
            )))
        })
    }

    fn settle(&self, key: &QueryKey, id: u64, result: &Result<Data, QueryError>) {
        let Some(mut entry) = self.entries.get_mut(key) else {
            return;
        };

        let current = entry
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.id == id);
        if !current {
            return;
        }

        entry.in_flight = None;
        match result {
            Ok(data) => {
                entry.data = Some(Arc::clone(data));
                entry.updated_at = Some(Instant::now());
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Query failed");
            }
        }
    }

    /// Mark the entry for `key` stale so the next fetch goes to the backend.
    pub fn invalidate(&self, key: &QueryKey) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.updated_at = None;
        }
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries not used within their `gc_time`. Returns how many went.
    pub fn collect_garbage(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            entry.in_flight.is_some() || now.duration_since(entry.last_used) < entry.gc_time
        });
        before.saturating_sub(self.entries.len())
    }

    /// Run [`collect_garbage`](Self::collect_garbage) every `every`, at
    /// most once per [`MIN_GC_INTERVAL`].
    pub fn spawn_garbage_collector(&self, every: Duration) -> JoinHandle<()> {
        let client = self.clone();
        let every = every.max(MIN_GC_INTERVAL);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = client.collect_garbage();
                if removed > 0 {
                    tracing::debug!(removed, "Collected unused query cache entries");
                }
            }
        })
    }
}
