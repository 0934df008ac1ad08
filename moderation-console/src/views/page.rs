use crate::query::{QueryObserver, QueryStatus};

/// Full-page rendering state for a route backed by one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView<T> {
    Loading,
    Error,
    Ready(T),
}

impl<T: Clone> PageView<T> {
    pub fn from_observer(observer: &QueryObserver<T>) -> Self {
        match observer.status() {
            QueryStatus::Idle | QueryStatus::Loading => PageView::Loading,
            QueryStatus::Error(_) => PageView::Error,
            QueryStatus::Success(data) => PageView::Ready(data.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryKey;
    use crate::services::ClientError;
    use std::sync::Arc;

    #[test]
    fn follows_observer_state() {
        let key = QueryKey::new(["admin", "users", "alice01"]);
        let mut observer: QueryObserver<u32> = QueryObserver::new();
        assert_eq!(PageView::from_observer(&observer), PageView::Loading);

        observer.set_key(key.clone(), true);
        assert_eq!(PageView::from_observer(&observer), PageView::Loading);

        observer.settle(&key, Ok(7));
        assert_eq!(PageView::from_observer(&observer), PageView::Ready(7));

        observer.settle(
            &key,
            Err(Arc::new(ClientError::Status {
                status: 404,
                url: "http://backend/admin/users/alice01".to_string(),
            })),
        );
        assert_eq!(PageView::from_observer(&observer), PageView::Error);
    }
}
