use crate::models::ModeratorArticle;
use crate::query::{Query, QueryKey};
use crate::services::{BackendHttp, ClientError};

pub trait ModeratorApi: Send + Sync {
    /// Every article sharing `reference`.
    fn find_moderator_articles_by_ref(&self, reference: &str) -> Query<Vec<ModeratorArticle>>;
}

pub fn articles_by_ref_key(reference: &str) -> QueryKey {
    QueryKey::new(["moderator", "articles", reference])
}

#[derive(Clone)]
pub struct ModeratorClient {
    http: BackendHttp,
}

impl ModeratorClient {
    pub fn new(http: BackendHttp) -> Self {
        Self { http }
    }

    async fn articles_by_ref(
        http: BackendHttp,
        reference: String,
    ) -> Result<Vec<ModeratorArticle>, ClientError> {
        let url = http.endpoint(["moderator", "articles", reference.as_str()])?;
        http.get_json(url).await
    }
}

impl ModeratorApi for ModeratorClient {
    fn find_moderator_articles_by_ref(&self, reference: &str) -> Query<Vec<ModeratorArticle>> {
        let http = self.http.clone();
        let reference = reference.to_string();
        Query::new(articles_by_ref_key(&reference), move || {
            Self::articles_by_ref(http, reference)
        })
    }
}
