use crate::handlers::ErrorTemplate;
use crate::models::UserRole;
use crate::query::{QueryObserver, QueryOptions};
use crate::services::admin_client::user_key;
use crate::views::search::SEARCH_QUERY_OPTIONS;
use crate::views::{
    grant_role, revoke_role, user_path, Notification, PageView, ProfileState, SearchRender,
    SearchView,
};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use console_core::ConsoleError;
use serde::Deserialize;
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchPageTemplate {
    pub user_tag: String,
    pub render: SearchRender,
}

#[derive(Template)]
#[template(path = "search_results.html")]
pub struct SearchResultsTemplate {
    pub render: SearchRender,
}

/// One role as displayed on the profile.
pub struct RoleCard {
    pub id: &'static str,
    pub label: &'static str,
}

impl From<UserRole> for RoleCard {
    fn from(role: UserRole) -> Self {
        Self {
            id: role.as_str(),
            label: role.label(),
        }
    }
}

/// Everything the profile templates display.
pub struct ProfileContext {
    pub tag: String,
    /// Percent-encoded profile path, base of the role and popover endpoints.
    pub path: String,
    pub created_at: String,
    pub roles: Vec<RoleCard>,
    pub missing: Vec<RoleCard>,
    pub add_open: bool,
}

impl From<&ProfileState> for ProfileContext {
    fn from(profile: &ProfileState) -> Self {
        Self {
            tag: profile.tag().to_string(),
            path: user_path(profile.tag()),
            created_at: profile.formatted_created_at(),
            roles: profile.roles().iter().copied().map(RoleCard::from).collect(),
            missing: profile.missing_roles().into_iter().map(RoleCard::from).collect(),
            add_open: profile.is_add_open(),
        }
    }
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfilePageTemplate {
    pub profile: ProfileContext,
    pub notification: Option<Notification>,
}

#[derive(Template)]
#[template(path = "profile_fragment.html")]
pub struct ProfileFragmentTemplate {
    pub profile: ProfileContext,
    pub notification: Option<Notification>,
}

impl ProfileFragmentTemplate {
    fn new(profile: &ProfileState, notification: Option<Notification>) -> Self {
        Self {
            profile: profile.into(),
            notification,
        }
    }
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(rename = "userTag", default)]
    pub user_tag: String,
}

#[derive(Deserialize)]
pub struct AddRoleForm {
    pub open: bool,
}

fn profile_session_key(tag: &str) -> String {
    format!("profile:{tag}")
}

pub async fn users_redirect() -> impl IntoResponse {
    Redirect::permanent("/admin/users/")
}

/// Search page, or only its results when requested by htmx.
pub async fn search_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let render = run_search(&state, &params.user_tag).await;

    if headers.contains_key("hx-request") {
        SearchResultsTemplate { render }.into_response()
    } else {
        SearchPageTemplate {
            user_tag: params.user_tag,
            render,
        }
        .into_response()
    }
}

/// The browser already debounced `input`, so it is committed as-is.
async fn run_search(state: &AppState, input: &str) -> SearchRender {
    let mut view = SearchView::new();
    view.set_input(input);

    if let Some(key) = view.commit(input) {
        let query = state.admin_client.search_users_by_tag(view.debounced());
        let result = state.queries.fetch(query, SEARCH_QUERY_OPTIONS).await;
        if let Err(e) = &result {
            tracing::error!(term = %view.debounced(), error = %e, "User search failed");
        }
        view.settle(&key, result);
    }

    view.render()
}

pub async fn profile_page(
    State(state): State<AppState>,
    session: Session,
    Path(tag): Path<String>,
) -> Result<Response, ConsoleError> {
    let profile = match fetch_profile(&state, &tag).await {
        PageView::Ready(profile) => profile,
        PageView::Loading | PageView::Error => {
            return Ok(ErrorTemplate::generic().into_response())
        }
    };

    store_profile(&session, &profile).await?;

    Ok(ProfilePageTemplate {
        profile: (&profile).into(),
        notification: None,
    }
    .into_response())
}

pub async fn grant_role_handler(
    State(state): State<AppState>,
    session: Session,
    Path((tag, role)): Path<(String, String)>,
) -> Result<Response, ConsoleError> {
    let role = parse_role(&role)?;
    let Some(mut profile) = load_profile(&state, &session, &tag).await? else {
        return Ok(ErrorTemplate::generic().into_response());
    };

    let notification = grant_role(&mut profile, state.admin_client.as_ref(), role).await;
    if !notification.is_error() {
        state.queries.invalidate(&user_key(&tag));
    }
    store_profile(&session, &profile).await?;

    Ok(ProfileFragmentTemplate::new(&profile, Some(notification)).into_response())
}

pub async fn revoke_role_handler(
    State(state): State<AppState>,
    session: Session,
    Path((tag, role)): Path<(String, String)>,
) -> Result<Response, ConsoleError> {
    let role = parse_role(&role)?;
    let Some(mut profile) = load_profile(&state, &session, &tag).await? else {
        return Ok(ErrorTemplate::generic().into_response());
    };

    let notification = revoke_role(&mut profile, state.admin_client.as_ref(), role).await;
    if !notification.is_error() {
        state.queries.invalidate(&user_key(&tag));
    }
    store_profile(&session, &profile).await?;

    Ok(ProfileFragmentTemplate::new(&profile, Some(notification)).into_response())
}

/// Opens or closes the "add role" popover.
pub async fn add_role_popover(
    State(state): State<AppState>,
    session: Session,
    Path(tag): Path<String>,
    Form(form): Form<AddRoleForm>,
) -> Result<Response, ConsoleError> {
    let Some(mut profile) = load_profile(&state, &session, &tag).await? else {
        return Ok(ErrorTemplate::generic().into_response());
    };

    if form.open {
        profile.open_add_role();
    } else {
        profile.close_add_role();
    }
    store_profile(&session, &profile).await?;

    Ok(ProfileFragmentTemplate::new(&profile, None).into_response())
}

fn parse_role(raw: &str) -> Result<UserRole, ConsoleError> {
    raw.parse::<UserRole>()
        .map_err(|e| ConsoleError::BadRequest(e.to_string()))
}

async fn fetch_profile(state: &AppState, tag: &str) -> PageView<ProfileState> {
    let mut observer = QueryObserver::new();
    let key = user_key(tag);

    if observer.set_key(key.clone(), true) {
        let query = state.admin_client.find_user_by_tag(tag);
        let result = state.queries.fetch(query, QueryOptions::default()).await;
        if let Err(e) = &result {
            tracing::error!(user_tag = %tag, error = %e, "Failed to load user");
        }
        observer.settle(&key, result.map(|user| ProfileState::from_user(&user)));
    }

    PageView::from_observer(&observer)
}

/// Profile state kept by this browser, falling back to a fresh fetch when
/// the session holds none.
async fn load_profile(
    state: &AppState,
    session: &Session,
    tag: &str,
) -> Result<Option<ProfileState>, ConsoleError> {
    let stored: Option<ProfileState> = session
        .get(&profile_session_key(tag))
        .await
        .map_err(|e| ConsoleError::Session(e.to_string()))?;

    if let Some(profile) = stored {
        return Ok(Some(profile));
    }

    match fetch_profile(state, tag).await {
        PageView::Ready(profile) => Ok(Some(profile)),
        PageView::Loading | PageView::Error => Ok(None),
    }
}

async fn store_profile(session: &Session, profile: &ProfileState) -> Result<(), ConsoleError> {
    session
        .insert(&profile_session_key(profile.tag()), profile)
        .await
        .map_err(|e| ConsoleError::Session(e.to_string()))
}
