//! One search screen's worth of coordination.
//!
//! Input flows through the [`InputDebouncer`]; a commit triggers a catalog
//! search on the [`QueryController`], a clear resets it. When a search
//! settles as the current generation with at least one item, a detached
//! task records the term against its top item. The analytics write is never
//! awaited by the search path.

use std::sync::Arc;
use std::time::Duration;

use marquee_catalog::{CatalogClient, Item};
use marquee_worker::TaskClass;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::{AnalyticsRecorder, DEFAULT_QUIET_WINDOW, DebounceEvent, DebounceSink, InputDebouncer, QueryController, QueryState, SearchView, Settlement};

/// Routes debounced events into the controller.
struct SessionSink {
	catalog: Arc<dyn CatalogClient>,
	controller: QueryController<Vec<Item>>,
	recorder: AnalyticsRecorder,
	committed: Arc<Mutex<Option<String>>>,
}

impl SessionSink {
	fn commit(&self, query: String) {
		tracing::debug!(query = %query, "search.commit");
		*self.committed.lock() = Some(query.clone());

		let catalog = Arc::clone(&self.catalog);
		let search_query = query.clone();
		let settled = self.controller.trigger(async move { catalog.search(&search_query).await });

		let recorder = self.recorder.clone();
		marquee_worker::spawn(TaskClass::Background, async move {
			let Ok(Settlement::Applied(QueryState::Success(items))) = settled.await else {
				return;
			};
			match items.into_iter().next() {
				Some(top) => {
					recorder.record_detached(query, top);
				}
				None => tracing::debug!(query = %query, "search.no_results"),
			}
		});
	}

	fn clear(&self) {
		tracing::debug!("search.clear");
		*self.committed.lock() = None;
		self.controller.reset();
	}
}

impl DebounceSink for SessionSink {
	fn emit(&self, event: DebounceEvent) {
		match event {
			DebounceEvent::Commit(query) => self.commit(query),
			DebounceEvent::Clear => self.clear(),
		}
	}
}

/// Search screen state: raw input, pending timer, committed query and the
/// query lifecycle.
///
/// Dropping the session tears it down.
pub struct SearchSession {
	debouncer: InputDebouncer<SessionSink>,
	controller: QueryController<Vec<Item>>,
	recorder: AnalyticsRecorder,
	committed: Arc<Mutex<Option<String>>>,
}

impl std::fmt::Debug for SearchSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SearchSession")
			.field("debouncer", &self.debouncer)
			.field("controller", &self.controller)
			.field("committed", &*self.committed.lock())
			.finish()
	}
}

impl SearchSession {
	/// Creates a session with the default quiet window.
	pub fn new(catalog: Arc<dyn CatalogClient>, recorder: AnalyticsRecorder) -> Self {
		Self::with_quiet_window(catalog, recorder, DEFAULT_QUIET_WINDOW)
	}

	pub fn with_quiet_window(catalog: Arc<dyn CatalogClient>, recorder: AnalyticsRecorder, quiet_window: Duration) -> Self {
		let controller = QueryController::new();
		let committed = Arc::new(Mutex::new(None));
		let sink = SessionSink {
			catalog,
			controller: controller.clone(),
			recorder: recorder.clone(),
			committed: Arc::clone(&committed),
		};
		Self {
			debouncer: InputDebouncer::with_quiet_window(sink, quiet_window),
			controller,
			recorder,
			committed,
		}
	}

	/// Feeds one input change.
	pub fn on_input(&self, text: impl Into<String>) {
		self.debouncer.on_input(text);
	}

	/// Latest raw input text.
	pub fn text(&self) -> String {
		self.debouncer.text()
	}

	/// Last query handed to the catalog, cleared when the input settles blank.
	pub fn committed_query(&self) -> Option<String> {
		self.committed.lock().clone()
	}

	pub fn state(&self) -> QueryState<Vec<Item>> {
		self.controller.state()
	}

	pub fn subscribe(&self) -> watch::Receiver<QueryState<Vec<Item>>> {
		self.controller.subscribe()
	}

	pub fn controller(&self) -> &QueryController<Vec<Item>> {
		&self.controller
	}

	pub fn recorder(&self) -> &AnalyticsRecorder {
		&self.recorder
	}

	/// Presentation of the current input and state.
	pub fn view(&self) -> SearchView {
		SearchView::derive(&self.text(), &self.state())
	}

	/// Cancels the pending timer and invalidates any in-flight search.
	pub fn teardown(&self) {
		tracing::debug!("search.teardown");
		self.debouncer.teardown();
		self.controller.invalidate();
	}
}

impl Drop for SearchSession {
	fn drop(&mut self) {
		self.teardown();
	}
}
