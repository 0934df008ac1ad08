use super::{QueryError, QueryKey, QueryResult};

/// What a view knows about the data for its current key.
#[derive(Debug, Clone)]
pub enum QueryStatus<T> {
    Idle,
    Loading,
    Success(T),
    Error(QueryError),
}

/// Tracks one view's query through `Idle -> Loading -> Success | Error`.
///
/// Changing the key re-enters `Loading`; results that arrive for a key the
/// view has since moved away from are dropped.
#[derive(Debug, Clone)]
pub struct QueryObserver<T> {
    key: Option<QueryKey>,
    status: QueryStatus<T>,
}

impl<T> Default for QueryObserver<T> {
    fn default() -> Self {
        Self {
            key: None,
            status: QueryStatus::Idle,
        }
    }
}

impl<T> QueryObserver<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the observer at `key`.
    ///
    /// Returns `true` when the caller must dispatch a fetch for it. A disabled
    /// query goes back to `Idle` and is never fetched.
    pub fn set_key(&mut self, key: QueryKey, enabled: bool) -> bool {
        if !enabled {
            self.key = None;
            self.status = QueryStatus::Idle;
            return false;
        }

        if self.key.as_ref() == Some(&key) && !matches!(self.status, QueryStatus::Idle) {
            return false;
        }

        self.key = Some(key);
        self.status = QueryStatus::Loading;
        true
    }

    /// Record the outcome of a fetch for `key`.
    ///
    /// Returns `false` and leaves the state untouched if `key` is no longer
    /// the observed key.
    pub fn settle(&mut self, key: &QueryKey, result: QueryResult<T>) -> bool {
        if self.key.as_ref() != Some(key) {
            tracing::debug!(key = %key, "Discarding result for superseded query");
            return false;
        }

        self.status = match result {
            Ok(data) => QueryStatus::Success(data),
            Err(e) => QueryStatus::Error(e),
        };
        true
    }

    pub fn key(&self) -> Option<&QueryKey> {
        self.key.as_ref()
    }

    pub fn status(&self) -> &QueryStatus<T> {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, QueryStatus::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, QueryStatus::Error(_))
    }

    pub fn data(&self) -> Option<&T> {
        match &self.status {
            QueryStatus::Success(data) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ClientError;
    use std::sync::Arc;

    fn key(term: &str) -> QueryKey {
        QueryKey::new(["admin", "searchUsers", term])
    }

    #[test]
    fn starts_idle() {
        let observer: QueryObserver<Vec<String>> = QueryObserver::new();
        assert!(matches!(observer.status(), QueryStatus::Idle));
        assert!(observer.key().is_none());
    }

    #[test]
    fn enabled_key_moves_to_loading_then_success() {
        let mut observer = QueryObserver::new();
        assert!(observer.set_key(key("ali"), true));
        assert!(observer.is_loading());

        assert!(observer.settle(&key("ali"), Ok(vec!["alice01".to_string()])));
        assert_eq!(observer.data(), Some(&vec!["alice01".to_string()]));
    }

    #[test]
    fn same_key_does_not_refetch() {
        let mut observer: QueryObserver<Vec<String>> = QueryObserver::new();
        assert!(observer.set_key(key("ali"), true));
        assert!(!observer.set_key(key("ali"), true));
    }

    #[test]
    fn disabled_key_stays_idle() {
        let mut observer: QueryObserver<Vec<String>> = QueryObserver::new();
        assert!(!observer.set_key(key("a"), false));
        assert!(matches!(observer.status(), QueryStatus::Idle));
    }

    #[test]
    fn failure_moves_to_error() {
        let mut observer: QueryObserver<Vec<String>> = QueryObserver::new();
        observer.set_key(key("ali"), true);
        observer.settle(
            &key("ali"),
            Err(Arc::new(ClientError::Status {
                status: 502,
                url: "http://backend/admin/users".to_string(),
            })),
        );
        assert!(observer.is_error());
    }

    #[test]
    fn superseded_result_is_discarded() {
        let mut observer = QueryObserver::new();
        observer.set_key(key("ab"), true);
        observer.set_key(key("abc"), true);

        assert!(!observer.settle(&key("ab"), Ok(vec!["stale".to_string()])));
        assert!(observer.is_loading());

        assert!(observer.settle(&key("abc"), Ok(vec!["abcdef".to_string()])));
        assert_eq!(observer.data(), Some(&vec!["abcdef".to_string()]));
    }
}
