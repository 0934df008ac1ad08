use crate::query::{QueryClient, QueryKey, QueryObserver, QueryOptions, QueryResult, QueryStatus};
use crate::services::AdminApi;
use crate::utils::debounce::{Debouncer, Scheduler};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Quiet period after the last keystroke before a search runs.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Shortest trimmed term that is sent to the backend.
pub const MIN_SEARCH_LEN: usize = 2;

/// Search results are reused for 5 minutes and kept 10 minutes after last use.
pub const SEARCH_QUERY_OPTIONS: QueryOptions =
    QueryOptions::new(Duration::from_secs(5 * 60), Duration::from_secs(10 * 60));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLink {
    pub tag: String,
    pub href: String,
}

impl TagLink {
    pub fn to_profile(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            href: super::user_path(tag),
        }
    }
}

/// What the search box shows below the input, highest priority first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRender {
    /// Nothing typed yet.
    Hidden,
    /// Typed, but not enough to search.
    Hint,
    Loading,
    Error,
    Empty,
    Results(Vec<TagLink>),
}

/// State of the admin user search box.
#[derive(Debug, Default)]
pub struct SearchView {
    raw: String,
    debounced: String,
    query: QueryObserver<Vec<String>>,
}

impl SearchView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, raw: &str) {
        self.raw = raw.to_string();
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn debounced(&self) -> &str {
        &self.debounced
    }

    pub fn enabled(&self) -> bool {
        self.debounced.chars().count() >= MIN_SEARCH_LEN
    }

    /// Commit the debounced `term`.
    ///
    /// Returns the key to fetch when the term is searchable and not already
    /// loaded or loading.
    pub fn commit(&mut self, term: &str) -> Option<QueryKey> {
        self.debounced = term.trim().to_string();
        let key = crate::services::admin_client::search_users_key(&self.debounced);
        if self.query.set_key(key.clone(), self.enabled()) {
            Some(key)
        } else {
            None
        }
    }

    /// Record results for `key`; ignored if the term has moved on.
    pub fn settle(&mut self, key: &QueryKey, result: QueryResult<Vec<String>>) -> bool {
        self.query.settle(key, result)
    }

    pub fn render(&self) -> SearchRender {
        if !self.enabled() {
            return if self.raw.is_empty() {
                SearchRender::Hidden
            } else {
                SearchRender::Hint
            };
        }

        match self.query.status() {
            QueryStatus::Idle | QueryStatus::Loading => SearchRender::Loading,
            QueryStatus::Error(_) => SearchRender::Error,
            QueryStatus::Success(tags) if tags.is_empty() => SearchRender::Empty,
            QueryStatus::Success(tags) => {
                SearchRender::Results(tags.iter().map(|tag| TagLink::to_profile(tag)).collect())
            }
        }
    }
}

/// Interactive search box: debounces input and runs searches through the
/// shared [`QueryClient`].
///
/// Dropping the bar cancels a pending debounce timer; searches already
/// dispatched still complete but only update the view if their term is
/// still current.
pub struct SearchBar {
    view: Arc<Mutex<SearchView>>,
    debouncer: Debouncer,
    api: Arc<dyn AdminApi>,
    queries: QueryClient,
}

impl SearchBar {
    pub fn new(api: Arc<dyn AdminApi>, queries: QueryClient, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            view: Arc::new(Mutex::new(SearchView::new())),
            debouncer: Debouncer::new(scheduler, SEARCH_DEBOUNCE),
            api,
            queries,
        }
    }

    pub fn on_input(&mut self, text: &str) {
        lock(&self.view).set_input(text);

        let view = Arc::clone(&self.view);
        let api = Arc::clone(&self.api);
        let queries = self.queries.clone();
        let term = text.to_string();

        self.debouncer.call(move || {
            let (key, term) = {
                let mut view = lock(&view);
                match view.commit(&term) {
                    Some(key) => (key, view.debounced().to_string()),
                    None => return,
                }
            };
            let query = api.search_users_by_tag(&term);

            tokio::spawn(async move {
                let result = queries.fetch(query, SEARCH_QUERY_OPTIONS).await;
                lock(&view).settle(&key, result);
            });
        });
    }

    pub fn render(&self) -> SearchRender {
        lock(&self.view).render()
    }

    pub fn raw(&self) -> String {
        lock(&self.view).raw().to_string()
    }
}

fn lock(view: &Mutex<SearchView>) -> MutexGuard<'_, SearchView> {
    view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ClientError;

    fn key(term: &str) -> QueryKey {
        QueryKey::new(["admin", "searchUsers", term])
    }

    #[test]
    fn empty_input_renders_nothing() {
        let view = SearchView::new();
        assert_eq!(view.render(), SearchRender::Hidden);
    }

    #[test]
    fn short_terms_show_hint_and_do_not_search() {
        for input in ["a", " a ", "   ", "é"] {
            let mut view = SearchView::new();
            view.set_input(input);
            assert_eq!(view.commit(input), None, "input {input:?}");
            assert_eq!(view.render(), SearchRender::Hint);
        }
    }

    #[test]
    fn term_is_trimmed_before_searching() {
        let mut view = SearchView::new();
        view.set_input("  ali ");
        assert_eq!(view.commit("  ali "), Some(key("ali")));
        assert_eq!(view.debounced(), "ali");
        assert_eq!(view.render(), SearchRender::Loading);
    }

    #[test]
    fn results_render_as_profile_links() {
        let mut view = SearchView::new();
        view.set_input("ali");
        let k = view.commit("ali").unwrap();
        view.settle(&k, Ok(vec!["alice01".into(), "alice02".into()]));

        assert_eq!(
            view.render(),
            SearchRender::Results(vec![
                TagLink {
                    tag: "alice01".into(),
                    href: "/admin/users/alice01".into()
                },
                TagLink {
                    tag: "alice02".into(),
                    href: "/admin/users/alice02".into()
                },
            ])
        );
    }

    #[test]
    fn profile_links_escape_tags() {
        let link = TagLink::to_profile("bob?x#y");
        assert_eq!(link.href, "/admin/users/bob%3Fx%23y");
        assert_eq!(link.tag, "bob?x#y");
    }

    #[test]
    fn empty_and_error_states() {
        let mut view = SearchView::new();
        view.set_input("zz");
        let k = view.commit("zz").unwrap();
        view.settle(&k, Ok(vec![]));
        assert_eq!(view.render(), SearchRender::Empty);

        let mut view = SearchView::new();
        view.set_input("zz");
        let k = view.commit("zz").unwrap();
        view.settle(
            &k,
            Err(Arc::new(ClientError::Parse("expected value".to_string()))),
        );
        assert_eq!(view.render(), SearchRender::Error);
    }

    #[test]
    fn shrinking_below_minimum_hides_stale_results() {
        let mut view = SearchView::new();
        view.set_input("ali");
        let k = view.commit("ali").unwrap();
        view.settle(&k, Ok(vec!["alice01".into()]));

        view.set_input("a");
        assert_eq!(view.commit("a"), None);
        assert_eq!(view.render(), SearchRender::Hint);
    }
}
