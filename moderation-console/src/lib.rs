pub mod config;
pub mod handlers;
pub mod models;
pub mod query;
pub mod services;
pub mod startup;
pub mod utils;
pub mod views;

use query::QueryClient;
use services::{AdminApi, ModeratorApi};
use std::sync::Arc;

/// Shared application state containing backend clients and the query cache
#[derive(Clone)]
pub struct AppState {
    pub admin_client: Arc<dyn AdminApi>,
    pub moderator_client: Arc<dyn ModeratorApi>,
    pub queries: QueryClient,
}

impl AppState {
    pub fn new(
        admin_client: Arc<dyn AdminApi>,
        moderator_client: Arc<dyn ModeratorApi>,
        queries: QueryClient,
    ) -> Self {
        Self {
            admin_client,
            moderator_client,
            queries,
        }
    }
}
