//! Keyed, cached data fetching for the console views.
//!
//! A client operation hands out a [`Query`]: the cache key plus the function
//! that fetches the data. [`QueryClient`] decides whether to run it and
//! [`QueryObserver`] tracks what a view should show for its current key.

pub mod cache;
pub mod key;
pub mod state;

pub use cache::{QueryClient, QueryOptions};
pub use key::QueryKey;
pub use state::{QueryObserver, QueryStatus};

use crate::services::ClientError;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// Failure shared by every caller waiting on the same fetch.
pub type QueryError = Arc<ClientError>;

pub type QueryResult<T> = Result<T, QueryError>;

type FetchFn<T> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T, ClientError>> + Send>;

/// A cache key together with the deferred fetch for it.
pub struct Query<T> {
    key: QueryKey,
    fetch: FetchFn<T>,
}

impl<T: Send + 'static> Query<T> {
    pub fn new<F, Fut>(key: QueryKey, fetch: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        Self {
            key,
            fetch: Box::new(move || Box::pin(fetch())),
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Run the fetch directly, bypassing any cache.
    pub async fn fetch(self) -> Result<T, ClientError> {
        (self.fetch)().await
    }

    pub(crate) fn into_parts(self) -> (QueryKey, FetchFn<T>) {
        (self.key, self.fetch)
    }
}

impl<T> std::fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query").field("key", &self.key).finish()
    }
}
