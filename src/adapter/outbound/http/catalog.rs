//! Game catalog over the back-office REST API.

use async_trait::async_trait;
use tracing::debug;

use super::client::ApiClient;
use super::dto::{GameEntry, ListResponse};
use crate::domain::game::Game;
use crate::error::Result;
use crate::infrastructure::config::ApiConfig;
use crate::port::outbound::catalog::GameCatalogProvider;

/// [`GameCatalogProvider`] backed by `GET /games`.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: ApiClient,
}

impl HttpCatalog {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(ApiClient::from_config(config))
    }
}

#[async_trait]
impl GameCatalogProvider for HttpCatalog {
    async fn list_games(&self) -> Result<Vec<Game>> {
        let response: ListResponse<GameEntry> = self.client.get_with_retry("games").await?;
        let games: Vec<Game> = response.into_items().into_iter().map(Game::from).collect();
        debug!(count = games.len(), "Fetched game catalog");
        Ok(games)
    }

    fn catalog_name(&self) -> &'static str {
        "http"
    }
}
