use crate::models::ModeratorArticle;
use crate::query::{QueryKey, QueryObserver, QueryResult, QueryStatus};
use crate::services::moderator_client::articles_by_ref_key;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCard {
    pub id: String,
    pub title: String,
    pub status: String,
    pub updated: Option<String>,
    pub tags: Vec<String>,
}

impl From<&ModeratorArticle> for ArticleCard {
    fn from(article: &ModeratorArticle) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            status: status_label(&article.status),
            updated: article
                .updated_at
                .map(|at| at.format("%d/%m/%Y").to_string()),
            tags: article.tags.clone(),
        }
    }
}

/// `UNDER_REVIEW` -> `Under review`.
fn status_label(status: &str) -> String {
    let words = status.replace('_', " ").to_lowercase();
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleListRender {
    Loading,
    Error,
    Empty,
    List(Vec<ArticleCard>),
}

/// Articles sharing one reference, as reviewed by a moderator.
#[derive(Debug)]
pub struct ArticleListView {
    reference: String,
    query: QueryObserver<Vec<ModeratorArticle>>,
}

impl ArticleListView {
    pub fn new(reference: &str) -> Self {
        Self {
            reference: reference.to_string(),
            query: QueryObserver::new(),
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Key to fetch, if the list is not already loaded or loading.
    pub fn begin(&mut self) -> Option<QueryKey> {
        let key = articles_by_ref_key(&self.reference);
        let enabled = !self.reference.trim().is_empty();
        if self.query.set_key(key.clone(), enabled) {
            Some(key)
        } else {
            None
        }
    }

    pub fn settle(&mut self, key: &QueryKey, result: QueryResult<Vec<ModeratorArticle>>) -> bool {
        self.query.settle(key, result)
    }

    pub fn render(&self) -> ArticleListRender {
        match self.query.status() {
            QueryStatus::Idle | QueryStatus::Loading => ArticleListRender::Loading,
            QueryStatus::Error(_) => ArticleListRender::Error,
            QueryStatus::Success(articles) if articles.is_empty() => ArticleListRender::Empty,
            QueryStatus::Success(articles) => {
                ArticleListRender::List(articles.iter().map(ArticleCard::from).collect())
            }
        }
    }
}
