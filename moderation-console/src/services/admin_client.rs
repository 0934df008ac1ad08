//! Admin endpoints of the platform backend.

use crate::models::{User, UserJson, UserRole};
use crate::query::{Query, QueryKey};
use crate::services::{BackendHttp, ClientError};
use async_trait::async_trait;
use serde::Deserialize;

/// Operations the admin views need from the backend.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Tags matching `term`. Callers only search for terms of 2+ characters.
    fn search_users_by_tag(&self, term: &str) -> Query<Vec<String>>;

    fn find_user_by_tag(&self, tag: &str) -> Query<User>;

    async fn grant_user_role(&self, user_tag: &str, role: UserRole) -> Result<(), ClientError>;

    async fn revoke_user_role(&self, user_tag: &str, role: UserRole) -> Result<(), ClientError>;
}

#[derive(Debug, Deserialize)]
struct SearchUsersResponse {
    results: Vec<String>,
}

pub fn search_users_key(term: &str) -> QueryKey {
    QueryKey::new(["admin", "searchUsers", term])
}

pub fn user_key(tag: &str) -> QueryKey {
    QueryKey::new(["admin", "users", tag])
}

#[derive(Clone)]
pub struct AdminClient {
    http: BackendHttp,
}

impl AdminClient {
    pub fn new(http: BackendHttp) -> Self {
        Self { http }
    }

    async fn search(http: BackendHttp, term: String) -> Result<Vec<String>, ClientError> {
        let mut url = http.endpoint(["admin", "users"])?;
        url.query_pairs_mut().append_pair("userTag", &term);

        let response: SearchUsersResponse = http.get_json(url).await?;
        Ok(response.results)
    }

    async fn find(http: BackendHttp, tag: String) -> Result<User, ClientError> {
        let url = http.endpoint(["admin", "users", tag.as_str()])?;
        let json: UserJson = http.get_json(url).await?;

        User::from_json(json).map_err(|e| {
            tracing::error!(user_tag = %tag, error = %e, "Malformed user payload");
            ClientError::Parse(e.to_string())
        })
    }

    fn role_url(&self, user_tag: &str, role: UserRole) -> Result<reqwest::Url, ClientError> {
        self.http
            .endpoint(["admin", "users", user_tag, "roles", role.as_str()])
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    fn search_users_by_tag(&self, term: &str) -> Query<Vec<String>> {
        let http = self.http.clone();
        let term = term.to_string();
        Query::new(search_users_key(&term), move || Self::search(http, term))
    }

    fn find_user_by_tag(&self, tag: &str) -> Query<User> {
        let http = self.http.clone();
        let tag = tag.to_string();
        Query::new(user_key(&tag), move || Self::find(http, tag))
    }

    async fn grant_user_role(&self, user_tag: &str, role: UserRole) -> Result<(), ClientError> {
        let url = self.role_url(user_tag, role)?;
        self.http.post_empty(url).await?;

        tracing::info!(user_tag = %user_tag, role = %role, "Granted user role");
        Ok(())
    }

    async fn revoke_user_role(&self, user_tag: &str, role: UserRole) -> Result<(), ClientError> {
        let url = self.role_url(user_tag, role)?;
        self.http.delete_empty(url).await?;

        tracing::info!(user_tag = %user_tag, role = %role, "Revoked user role");
        Ok(())
    }
}
