//! Configuration for marquee.
//!
//! Settings are read from a TOML file in which every section is optional:
//!
//! ```toml
//! [search]
//! debounce-ms = 500
//!
//! [catalog]
//! base-url = "https://api.themoviedb.org/3"
//! image-base-url = "https://image.tmdb.org/t/p/w500"
//! api-key = "..."
//!
//! [store]
//! endpoint = "https://cloud.appwrite.io/v1"
//! project-id = "..."
//! database-id = "..."
//! collection-id = "..."
//! api-key = "..."
//! ```
//!
//! Credentials can also come from the environment, which wins over the file:
//! `MARQUEE_TMDB_API_KEY`, `MARQUEE_STORE_ENDPOINT`, `MARQUEE_STORE_PROJECT_ID`,
//! `MARQUEE_STORE_DATABASE_ID`, `MARQUEE_STORE_COLLECTION_ID` and
//! `MARQUEE_STORE_API_KEY`.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

mod error;

pub use error::{ConfigError, Result};

/// Default quiet window between the last keystroke and a search.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// TMDB v3 API root.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.themoviedb.org/3";

/// TMDB poster root that poster paths are appended to.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Complete marquee configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
	pub search: SearchConfig,
	pub catalog: CatalogConfig,
	pub store: StoreConfig,
}

/// Input handling settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SearchConfig {
	pub debounce_ms: u64,
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			debounce_ms: DEFAULT_DEBOUNCE_MS,
		}
	}
}

impl SearchConfig {
	/// Quiet window as a duration.
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}
}

/// Movie catalog API settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CatalogConfig {
	pub base_url: String,
	pub image_base_url: String,
	pub api_key: Option<String>,
}

impl Default for CatalogConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
			image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
			api_key: None,
		}
	}
}

/// Analytics record store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct StoreConfig {
	pub endpoint: Option<String>,
	pub project_id: Option<String>,
	pub database_id: Option<String>,
	pub collection_id: Option<String>,
	pub api_key: Option<String>,
}

/// Store settings with every required field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStore {
	pub endpoint: String,
	pub project_id: String,
	pub database_id: String,
	pub collection_id: String,
	pub api_key: Option<String>,
}

impl StoreConfig {
	/// Returns the store settings, failing on the first missing field.
	pub fn require(&self) -> Result<ResolvedStore> {
		fn field(value: &Option<String>, name: &str) -> Result<String> {
			value
				.clone()
				.filter(|v| !v.trim().is_empty())
				.ok_or_else(|| ConfigError::MissingField(format!("store.{name}")))
		}

		Ok(ResolvedStore {
			endpoint: field(&self.endpoint, "endpoint")?,
			project_id: field(&self.project_id, "project-id")?,
			database_id: field(&self.database_id, "database-id")?,
			collection_id: field(&self.collection_id, "collection-id")?,
			api_key: self.api_key.clone(),
		})
	}
}

impl Config {
	/// Parses configuration from TOML text.
	pub fn from_toml(text: &str) -> Result<Self> {
		let config: Self = toml::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads and parses the file at `path`.
	pub fn load(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml(&text)
	}

	/// Overlays credentials from the process environment.
	#[must_use]
	pub fn apply_env(self) -> Self {
		self.apply_env_from(|key| std::env::var(key).ok())
	}

	/// Overlays credentials from `lookup`, ignoring empty values.
	#[must_use]
	pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
		let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

		if let Some(key) = get("MARQUEE_TMDB_API_KEY") {
			self.catalog.api_key = Some(key);
		}
		let store = &mut self.store;
		for (var, slot) in [
			("MARQUEE_STORE_ENDPOINT", &mut store.endpoint),
			("MARQUEE_STORE_PROJECT_ID", &mut store.project_id),
			("MARQUEE_STORE_DATABASE_ID", &mut store.database_id),
			("MARQUEE_STORE_COLLECTION_ID", &mut store.collection_id),
			("MARQUEE_STORE_API_KEY", &mut store.api_key),
		] {
			if let Some(value) = get(var) {
				*slot = Some(value);
			}
		}
		self
	}

	fn validate(&self) -> Result<()> {
		if self.search.debounce_ms == 0 {
			return Err(ConfigError::InvalidValue {
				field: "search.debounce-ms",
				reason: "quiet window must be positive".to_string(),
			});
		}
		Ok(())
	}
}
