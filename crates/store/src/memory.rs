//! In-process [`RecordStore`] for tests and local runs.
//!
//! Behaves like the remote store in the ways that matter to callers: no
//! uniqueness on `search_term`, no isolation between a read and a later
//! write. An optional per-operation latency suspends every call before it
//! touches the data, which makes read-modify-write interleavings observable.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Result, StoreError};
use crate::{AnalyticsRecord, NewRecord, RecordFilter, RecordId, RecordStore, RecordUpdate};

/// Store operation, used to target injected failures and count calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
	FindOne,
	Create,
	Update,
	TopByCount,
}

#[derive(Debug, Default)]
struct MemoryInner {
	records: Vec<AnalyticsRecord>,
	next_id: u64,
	failures: HashMap<StoreOp, StoreError>,
	calls: HashMap<StoreOp, usize>,
}

impl MemoryInner {
	fn begin(&mut self, op: StoreOp) -> Result<()> {
		*self.calls.entry(op).or_default() += 1;
		match self.failures.remove(&op) {
			Some(err) => Err(err),
			None => Ok(()),
		}
	}
}

/// Shared in-memory record store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	inner: Arc<Mutex<MemoryInner>>,
	latency: Option<Duration>,
}

impl MemoryStore {
	/// Creates an empty store answering without delay.
	pub fn new() -> Self {
		Self::default()
	}

	/// Suspends every operation for `latency` before it reads or writes.
	#[must_use]
	pub fn with_latency(mut self, latency: Duration) -> Self {
		self.latency = Some(latency);
		self
	}

	/// Makes the next call of `op` fail with `err`.
	pub fn fail_next(&self, op: StoreOp, err: StoreError) {
		self.inner.lock().failures.insert(op, err);
	}

	/// Returns all records in insertion order.
	pub fn records(&self) -> Vec<AnalyticsRecord> {
		self.inner.lock().records.clone()
	}

	/// Returns every record stored under `term`, duplicates included.
	pub fn records_for(&self, term: &str) -> Vec<AnalyticsRecord> {
		self.inner.lock().records.iter().filter(|r| r.search_term == term).cloned().collect()
	}

	/// Number of times `op` was invoked, failed calls included.
	pub fn calls(&self, op: StoreOp) -> usize {
		self.inner.lock().calls.get(&op).copied().unwrap_or(0)
	}

	async fn settle(&self) {
		if let Some(latency) = self.latency {
			tokio::time::sleep(latency).await;
		}
	}
}

#[async_trait]
impl RecordStore for MemoryStore {
	async fn find_one(&self, filter: &RecordFilter) -> Result<Option<AnalyticsRecord>> {
		self.settle().await;
		let mut inner = self.inner.lock();
		inner.begin(StoreOp::FindOne)?;
		Ok(inner.records.iter().find(|r| filter.matches(r)).cloned())
	}

	async fn create(&self, record: NewRecord) -> Result<AnalyticsRecord> {
		self.settle().await;
		let mut inner = self.inner.lock();
		inner.begin(StoreOp::Create)?;
		inner.next_id += 1;
		let record = record.with_id(RecordId(format!("mem-{}", inner.next_id)));
		inner.records.push(record.clone());
		Ok(record)
	}

	async fn update(&self, id: &RecordId, fields: RecordUpdate) -> Result<AnalyticsRecord> {
		self.settle().await;
		let mut inner = self.inner.lock();
		inner.begin(StoreOp::Update)?;
		let record = inner
			.records
			.iter_mut()
			.find(|r| &r.id == id)
			.ok_or_else(|| StoreError::NotFound(id.to_string()))?;
		fields.apply(record);
		Ok(record.clone())
	}

	async fn top_by_count(&self, limit: usize) -> Result<Vec<AnalyticsRecord>> {
		self.settle().await;
		let mut inner = self.inner.lock();
		inner.begin(StoreOp::TopByCount)?;
		let mut records = inner.records.clone();
		records.sort_by(|a, b| b.count.cmp(&a.count));
		records.truncate(limit);
		Ok(records)
	}
}
