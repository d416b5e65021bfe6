//! Wiring of production collaborators from configuration.

use std::sync::Arc;

use marquee_catalog::TmdbClient;
use marquee_config::{Config, ConfigError};
use marquee_store::{AppwriteStore, AppwriteTarget};

use crate::{AnalyticsRecorder, SearchSession};

/// Builds the TMDB catalog client described by `config`.
pub fn catalog_from_config(config: &Config) -> TmdbClient {
	TmdbClient::new(config.catalog.base_url.clone(), config.catalog.api_key.clone())
}

/// Builds the Appwrite-backed recorder described by `config`.
pub fn recorder_from_config(config: &Config) -> Result<AnalyticsRecorder, ConfigError> {
	let store = config.store.require()?;
	let store = AppwriteStore::new(AppwriteTarget {
		endpoint: store.endpoint,
		project_id: store.project_id,
		database_id: store.database_id,
		collection_id: store.collection_id,
		api_key: store.api_key,
	});
	Ok(AnalyticsRecorder::with_image_base(Arc::new(store), config.catalog.image_base_url.clone()))
}

/// Builds a session talking to TMDB and Appwrite.
pub fn session_from_config(config: &Config) -> Result<SearchSession, ConfigError> {
	let recorder = recorder_from_config(config)?;
	let catalog = Arc::new(catalog_from_config(config));
	Ok(SearchSession::with_quiet_window(catalog, recorder, config.search.debounce()))
}
