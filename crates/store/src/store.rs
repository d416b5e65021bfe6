use async_trait::async_trait;

use crate::error::Result;
use crate::{AnalyticsRecord, NewRecord, RecordFilter, RecordId, RecordUpdate};

/// Remote document store holding analytics records.
///
/// Operations are independent: there is no transaction spanning a read and
/// a later write, and nothing enforces one record per search term.
#[async_trait]
pub trait RecordStore: Send + Sync {
	/// Returns the first record matching `filter`.
	async fn find_one(&self, filter: &RecordFilter) -> Result<Option<AnalyticsRecord>>;

	/// Inserts a record and returns it with its assigned id.
	async fn create(&self, record: NewRecord) -> Result<AnalyticsRecord>;

	/// Overwrites the mutable fields of record `id`.
	async fn update(&self, id: &RecordId, fields: RecordUpdate) -> Result<AnalyticsRecord>;

	/// Returns up to `limit` records, highest count first.
	async fn top_by_count(&self, limit: usize) -> Result<Vec<AnalyticsRecord>>;
}

#[async_trait]
impl<S> RecordStore for std::sync::Arc<S>
where
	S: RecordStore + ?Sized,
{
	async fn find_one(&self, filter: &RecordFilter) -> Result<Option<AnalyticsRecord>> {
		(**self).find_one(filter).await
	}

	async fn create(&self, record: NewRecord) -> Result<AnalyticsRecord> {
		(**self).create(record).await
	}

	async fn update(&self, id: &RecordId, fields: RecordUpdate) -> Result<AnalyticsRecord> {
		(**self).update(id, fields).await
	}

	async fn top_by_count(&self, limit: usize) -> Result<Vec<AnalyticsRecord>> {
		(**self).top_by_count(limit).await
	}
}
