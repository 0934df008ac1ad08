//! Headless view models behind the console pages.
//!
//! Each view keeps its own state and exposes explicit transitions, so the
//! behaviour can be exercised without a browser or a template.

pub mod articles;
pub mod notification;
pub mod page;
pub mod profile;
pub mod search;

pub use articles::{ArticleListRender, ArticleListView};
pub use notification::{Notification, NotificationLevel};
pub use page::PageView;
pub use profile::{grant_role, revoke_role, ProfileState, RevokeRefused, RoleTransition};
pub use search::{SearchBar, SearchRender, SearchView, TagLink};

use reqwest::Url;

const USERS_PATH: &str = "/admin/users/";

/// Console path of a user's profile, with `tag` percent-encoded as one
/// path segment.
pub fn user_path(tag: &str) -> String {
    let Ok(mut url) = Url::parse("http://console/admin/users/") else {
        return USERS_PATH.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(tag);
    }
    url.path().to_string()
}

/// Shown whenever an operation fails, whatever the cause.
pub const GENERIC_ERROR: &str = "An error occurred. Please try again.";
