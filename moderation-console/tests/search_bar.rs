use async_trait::async_trait;
use moderation_console::models::{User, UserRole};
use moderation_console::query::{Query, QueryClient};
use moderation_console::services::admin_client::{search_users_key, user_key};
use moderation_console::services::{AdminApi, ClientError};
use moderation_console::utils::debounce::TokioScheduler;
use moderation_console::views::{SearchBar, SearchRender, TagLink};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

/// Answers every search with `{term}01` and records the terms actually fetched.
#[derive(Default)]
struct RecordingAdmin {
    fetched: Arc<Mutex<Vec<String>>>,
}

impl RecordingAdmin {
    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdminApi for RecordingAdmin {
    fn search_users_by_tag(&self, term: &str) -> Query<Vec<String>> {
        let fetched = Arc::clone(&self.fetched);
        let term = term.to_string();
        Query::new(search_users_key(&term), move || async move {
            fetched.lock().unwrap().push(term.clone());
            Ok(vec![format!("{term}01")])
        })
    }

    fn find_user_by_tag(&self, tag: &str) -> Query<User> {
        Query::new(user_key(tag), || async {
            Err(ClientError::Parse("not used".to_string()))
        })
    }

    async fn grant_user_role(&self, _user_tag: &str, _role: UserRole) -> Result<(), ClientError> {
        Ok(())
    }

    async fn revoke_user_role(&self, _user_tag: &str, _role: UserRole) -> Result<(), ClientError> {
        Ok(())
    }
}

fn search_bar(api: &Arc<RecordingAdmin>, queries: &QueryClient) -> SearchBar {
    SearchBar::new(api.clone(), queries.clone(), Arc::new(TokioScheduler))
}

#[tokio::test(start_paused = true)]
async fn typing_burst_searches_only_last_term() {
    let api = Arc::new(RecordingAdmin::default());
    let mut bar = search_bar(&api, &QueryClient::new());

    bar.on_input("ab");
    sleep(Duration::from_millis(100)).await;
    bar.on_input("abc");
    sleep(Duration::from_millis(250)).await;
    assert!(api.fetched().is_empty());

    sleep(Duration::from_millis(100)).await;
    assert_eq!(api.fetched(), vec!["abc"]);
    assert_eq!(
        bar.render(),
        SearchRender::Results(vec![TagLink::to_profile("abc01")])
    );
    assert_eq!(bar.raw(), "abc");
}

#[tokio::test(start_paused = true)]
async fn short_input_never_searches() {
    let api = Arc::new(RecordingAdmin::default());
    let mut bar = search_bar(&api, &QueryClient::new());

    bar.on_input(" a ");
    sleep(Duration::from_secs(1)).await;

    assert!(api.fetched().is_empty());
    assert_eq!(bar.render(), SearchRender::Hint);
}

#[tokio::test(start_paused = true)]
async fn fresh_results_are_reused_across_search_bars() {
    let api = Arc::new(RecordingAdmin::default());
    let queries = QueryClient::new();

    let mut first = search_bar(&api, &queries);
    first.on_input("ali");
    sleep(Duration::from_millis(400)).await;

    let mut second = search_bar(&api, &queries);
    second.on_input("ali");
    sleep(Duration::from_millis(400)).await;

    assert_eq!(api.fetched(), vec!["ali"]);
    assert_eq!(second.render(), first.render());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_bar_cancels_pending_search() {
    let api = Arc::new(RecordingAdmin::default());
    let mut bar = search_bar(&api, &QueryClient::new());

    bar.on_input("alice");
    drop(bar);
    sleep(Duration::from_secs(1)).await;

    assert!(api.fetched().is_empty());
}
