pub mod admin;
pub mod app;
pub mod metrics;
pub mod moderator;

use askama::Template;

use crate::views::GENERIC_ERROR;

/// Full-screen fallback shown when a page cannot load its data.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: &'static str,
}

impl ErrorTemplate {
    pub fn generic() -> Self {
        Self {
            message: GENERIC_ERROR,
        }
    }
}
