use async_trait::async_trait;

use crate::Item;
use crate::error::Result;

/// Remote catalog searched by free-text query.
///
/// Results are ranked: the first item is the best match.
#[async_trait]
pub trait CatalogClient: Send + Sync {
	/// Returns the items matching `query`, best match first.
	async fn search(&self, query: &str) -> Result<Vec<Item>>;
}

#[async_trait]
impl<C> CatalogClient for std::sync::Arc<C>
where
	C: CatalogClient + ?Sized,
{
	async fn search(&self, query: &str) -> Result<Vec<Item>> {
		(**self).search(query).await
	}
}
