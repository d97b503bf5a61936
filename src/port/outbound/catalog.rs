//! Game catalog port.

use async_trait::async_trait;

use crate::domain::game::Game;
use crate::error::Result;

/// Read access to the game catalog.
///
/// The catalog is owned elsewhere; the rule engine only enumerates it to
/// resolve selections and to target "apply to all games".
#[async_trait]
pub trait GameCatalogProvider: Send + Sync {
    /// Every game in the catalog, enabled or not.
    async fn list_games(&self) -> Result<Vec<Game>>;

    /// Provider name for logging.
    fn catalog_name(&self) -> &'static str;
}
