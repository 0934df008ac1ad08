use crate::handlers::ErrorTemplate;
use crate::query::QueryOptions;
use crate::views::{ArticleListRender, ArticleListView};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

#[derive(Template)]
#[template(path = "articles.html")]
pub struct ArticlesTemplate {
    pub reference: String,
    pub render: ArticleListRender,
}

pub async fn articles_page(
    State(state): State<AppState>,
    Path(article_ref): Path<String>,
) -> Response {
    let mut view = ArticleListView::new(&article_ref);

    if let Some(key) = view.begin() {
        let query = state
            .moderator_client
            .find_moderator_articles_by_ref(view.reference());
        let result = state.queries.fetch(query, QueryOptions::default()).await;
        if let Err(e) = &result {
            tracing::error!(article_ref = %article_ref, error = %e, "Failed to load articles");
        }
        view.settle(&key, result);
    }

    match view.render() {
        ArticleListRender::Error => ErrorTemplate::generic().into_response(),
        render => ArticlesTemplate {
            reference: article_ref,
            render,
        }
        .into_response(),
    }
}

