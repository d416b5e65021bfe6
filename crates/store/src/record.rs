use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Usage counter for one search term, with a snapshot of its top match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsRecord {
	pub id: RecordId,
	pub search_term: String,
	pub count: u64,
	pub movie_id: u64,
	pub title: String,
	pub poster_url: String,
	pub updated_at: DateTime<Utc>,
}

/// Fields of a record that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
	pub search_term: String,
	pub count: u64,
	pub movie_id: u64,
	pub title: String,
	pub poster_url: String,
	pub updated_at: DateTime<Utc>,
}

impl NewRecord {
	/// Attaches the store-assigned id.
	pub fn with_id(self, id: RecordId) -> AnalyticsRecord {
		AnalyticsRecord {
			id,
			search_term: self.search_term,
			count: self.count,
			movie_id: self.movie_id,
			title: self.title,
			poster_url: self.poster_url,
			updated_at: self.updated_at,
		}
	}
}

/// Fields rewritten by an update. The search term is the key and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
	pub count: u64,
	pub movie_id: u64,
	pub title: String,
	pub poster_url: String,
	pub updated_at: DateTime<Utc>,
}

impl RecordUpdate {
	/// Applies the update onto `record` in place.
	pub fn apply(self, record: &mut AnalyticsRecord) {
		record.count = self.count;
		record.movie_id = self.movie_id;
		record.title = self.title;
		record.poster_url = self.poster_url;
		record.updated_at = self.updated_at;
	}
}

/// Lookup filter for [`crate::RecordStore::find_one`]. Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
	pub search_term: String,
}

impl RecordFilter {
	pub fn search_term(term: impl Into<String>) -> Self {
		Self { search_term: term.into() }
	}

	pub fn matches(&self, record: &AnalyticsRecord) -> bool {
		record.search_term == self.search_term
	}
}
