use serde::{Deserialize, Serialize};

/// One catalog entry as returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
	pub id: u64,
	pub title: String,
	/// Relative poster path, joined onto an image base URL for display.
	#[serde(default)]
	pub poster_path: Option<String>,
	#[serde(default)]
	pub release_date: Option<String>,
	#[serde(default)]
	pub vote_average: f64,
	#[serde(default)]
	pub overview: String,
}

impl Item {
	/// Creates an item with only the identifying fields set.
	pub fn new(id: u64, title: impl Into<String>) -> Self {
		Self {
			id,
			title: title.into(),
			poster_path: None,
			release_date: None,
			vote_average: 0.0,
			overview: String::new(),
		}
	}

	/// Sets the poster path.
	#[must_use]
	pub fn with_poster(mut self, path: impl Into<String>) -> Self {
		self.poster_path = Some(path.into());
		self
	}

	/// Full poster URL under `image_base`, or `None` when the item has no poster.
	pub fn poster_url(&self, image_base: &str) -> Option<String> {
		self.poster_path
			.as_deref()
			.map(|path| format!("{}{}", image_base.trim_end_matches('/'), path))
	}
}
