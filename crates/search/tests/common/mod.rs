#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use marquee_catalog::{CatalogClient, FetchError, Item};
use marquee_search::{AnalyticsRecorder, SearchSession};
use marquee_store::MemoryStore;
use parking_lot::Mutex;

/// Past the default quiet window.
pub const SETTLE: Duration = Duration::from_millis(600);

/// Canned catalog: per-query results and optional per-query response delay.
#[derive(Default)]
pub struct StubCatalog {
	responses: Mutex<HashMap<String, Result<Vec<Item>, FetchError>>>,
	delays: Mutex<HashMap<String, Duration>>,
	calls: Mutex<Vec<String>>,
}

impl StubCatalog {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn respond(&self, query: &str, result: Result<Vec<Item>, FetchError>) {
		self.responses.lock().insert(query.to_string(), result);
	}

	pub fn delay(&self, query: &str, delay: Duration) {
		self.delays.lock().insert(query.to_string(), delay);
	}

	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().clone()
	}
}

#[async_trait]
impl CatalogClient for StubCatalog {
	async fn search(&self, query: &str) -> marquee_catalog::Result<Vec<Item>> {
		self.calls.lock().push(query.to_string());
		let delay = self.delays.lock().get(query).copied();
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}
		let response = self.responses.lock().get(query).cloned();
		response.unwrap_or_else(|| Ok(Vec::new()))
	}
}

pub fn session(catalog: &Arc<StubCatalog>, store: &MemoryStore) -> SearchSession {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	SearchSession::new(catalog.clone(), AnalyticsRecorder::new(Arc::new(store.clone())))
}
