//! Search popularity counters.
//!
//! [`AnalyticsRecorder::record`] is an increment-or-create against the
//! record store: find the record for the term, then either write `count + 1`
//! or create it with `count = 1`. The find and the write are separate
//! requests. Two concurrent calls for one term can read the same count and
//! both write the same successor, or both miss and both create. Counts are
//! therefore approximate under concurrency.

use std::sync::Arc;

use chrono::Utc;
use marquee_catalog::Item;
use marquee_config::DEFAULT_IMAGE_BASE_URL;
use marquee_store::{AnalyticsRecord, NewRecord, RecordFilter, RecordStore, RecordUpdate};
use marquee_worker::TaskClass;
use tokio::task::JoinHandle;

/// Records which search terms are popular.
#[derive(Clone)]
pub struct AnalyticsRecorder {
	store: Arc<dyn RecordStore>,
	image_base_url: String,
}

impl std::fmt::Debug for AnalyticsRecorder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AnalyticsRecorder").field("image_base_url", &self.image_base_url).finish_non_exhaustive()
	}
}

impl AnalyticsRecorder {
	pub fn new(store: Arc<dyn RecordStore>) -> Self {
		Self::with_image_base(store, DEFAULT_IMAGE_BASE_URL)
	}

	/// Uses `image_base_url` to turn poster paths into poster URLs.
	pub fn with_image_base(store: Arc<dyn RecordStore>, image_base_url: impl Into<String>) -> Self {
		Self {
			store,
			image_base_url: image_base_url.into(),
		}
	}

	/// Counts one search for `search_term` whose best match was `top`.
	///
	/// The term is matched exactly and case-sensitively.
	pub async fn record(&self, search_term: &str, top: &Item) -> marquee_store::Result<AnalyticsRecord> {
		let poster_url = top.poster_url(&self.image_base_url).unwrap_or_default();
		let existing = self.store.find_one(&RecordFilter::search_term(search_term)).await?;

		match existing {
			Some(record) => {
				let count = record.count + 1;
				tracing::debug!(search_term, count, id = %record.id, "analytics.increment");
				self.store
					.update(
						&record.id,
						RecordUpdate {
							count,
							movie_id: top.id,
							title: top.title.clone(),
							poster_url,
							updated_at: Utc::now(),
						},
					)
					.await
			}
			None => {
				tracing::debug!(search_term, "analytics.create");
				self.store
					.create(NewRecord {
						search_term: search_term.to_string(),
						count: 1,
						movie_id: top.id,
						title: top.title.clone(),
						poster_url,
						updated_at: Utc::now(),
					})
					.await
			}
		}
	}

	/// Like [`Self::record`], but a store failure is logged and dropped.
	pub async fn record_or_log(&self, search_term: &str, top: &Item) {
		if let Err(err) = self.record(search_term, top).await {
			tracing::warn!(search_term, error = %err, "analytics.record_failed");
		}
	}

	/// Runs [`Self::record_or_log`] on a detached background task.
	pub fn record_detached(&self, search_term: String, top: Item) -> JoinHandle<()> {
		let recorder = self.clone();
		marquee_worker::spawn(TaskClass::Background, async move {
			recorder.record_or_log(&search_term, &top).await;
		})
	}

	/// The `limit` most searched terms, most popular first.
	pub async fn trending(&self, limit: usize) -> marquee_store::Result<Vec<AnalyticsRecord>> {
		self.store.top_by_count(limit).await
	}
}
