//! Stale-safe lifecycle manager for one asynchronous operation at a time.
//!
//! Each [`QueryController::trigger`] or [`QueryController::reset`] takes the
//! next [`Generation`]. A launched operation carries the generation it was
//! launched under; when it completes, its outcome is applied only if that
//! generation is still current. Older completions are dropped whatever order
//! they arrive in. In-flight work is never aborted, only ignored.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use marquee_worker::{Generation, TaskClass, join_error_panic_message};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::QueryState;

/// What happened to one completed operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement<T> {
	/// The completion was current and became the controller state.
	Applied(QueryState<T>),
	/// A later trigger or reset superseded the operation; its outcome was dropped.
	Stale { launched: Generation, current: Generation },
}

impl<T> Settlement<T> {
	/// The applied state, or `None` for a stale completion.
	pub fn applied(&self) -> Option<&QueryState<T>> {
		match self {
			Self::Applied(state) => Some(state),
			Self::Stale { .. } => None,
		}
	}
}

struct Shared<T> {
	generation: Mutex<Generation>,
	state: watch::Sender<QueryState<T>>,
}

impl<T> Shared<T> {
	/// Applies `outcome` if `launched` is still the current generation.
	///
	/// The generation lock is held across the check and the publish so that a
	/// concurrent trigger cannot slip in between them.
	fn settle(&self, launched: Generation, outcome: QueryState<T>) -> Settlement<T>
	where
		T: Clone,
	{
		let current = self.generation.lock();
		if *current != launched {
			tracing::debug!(%launched, current = %*current, "query.stale");
			return Settlement::Stale {
				launched,
				current: *current,
			};
		}
		tracing::debug!(generation = %launched, state = outcome.label(), "query.settle");
		self.state.send_replace(outcome.clone());
		Settlement::Applied(outcome)
	}
}

/// Generic async-operation lifecycle manager.
///
/// Clones share the same state and generation.
pub struct QueryController<T> {
	shared: Arc<Shared<T>>,
}

impl<T> Clone for QueryController<T> {
	fn clone(&self) -> Self {
		Self {
			shared: Arc::clone(&self.shared),
		}
	}
}

impl<T> Default for QueryController<T>
where
	T: Clone + Send + Sync + 'static,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<T> std::fmt::Debug for QueryController<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("QueryController")
			.field("generation", &*self.shared.generation.lock())
			.field("state", &self.shared.state.borrow().label())
			.finish()
	}
}

impl<T> QueryController<T>
where
	T: Clone + Send + Sync + 'static,
{
	/// Creates an idle controller at generation zero.
	pub fn new() -> Self {
		let (state, _) = watch::channel(QueryState::Idle);
		Self {
			shared: Arc::new(Shared {
				generation: Mutex::new(Generation::ZERO),
				state,
			}),
		}
	}

	/// Current generation.
	pub fn generation(&self) -> Generation {
		*self.shared.generation.lock()
	}

	/// Snapshot of the current state.
	pub fn state(&self) -> QueryState<T> {
		self.shared.state.borrow().clone()
	}

	/// Receiver notified on every state transition.
	pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
		self.shared.state.subscribe()
	}

	/// Launches `operation` under a new generation and enters `Loading`.
	///
	/// The returned handle resolves once the outcome has been applied or
	/// discarded; dropping it detaches the task. Failures and panics of the
	/// operation end up as [`QueryState::Error`], never as an error here.
	pub fn trigger<F, E>(&self, operation: F) -> JoinHandle<Settlement<T>>
	where
		F: Future<Output = Result<T, E>> + Send + 'static,
		E: Display + Send + 'static,
	{
		let launched = {
			let mut generation = self.shared.generation.lock();
			*generation = generation.next();
			self.shared.state.send_replace(QueryState::Loading);
			*generation
		};
		tracing::debug!(generation = %launched, "query.trigger");

		let operation = marquee_worker::spawn(TaskClass::Interactive, operation);
		let shared = Arc::clone(&self.shared);
		marquee_worker::spawn(TaskClass::Interactive, async move {
			let outcome = match operation.await {
				Ok(Ok(data)) => QueryState::Success(data),
				Ok(Err(err)) => QueryState::Error(err.to_string()),
				Err(join) => {
					let message = join_error_panic_message(join).unwrap_or_else(|| "operation was cancelled".to_string());
					QueryState::Error(message)
				}
			};
			shared.settle(launched, outcome)
		})
	}

	/// Forces `Idle` and invalidates whatever is in flight.
	pub fn reset(&self) {
		let mut generation = self.shared.generation.lock();
		*generation = generation.next();
		self.shared.state.send_replace(QueryState::Idle);
		tracing::debug!(generation = %*generation, "query.reset");
	}

	/// Invalidates whatever is in flight without touching the state.
	pub fn invalidate(&self) {
		let mut generation = self.shared.generation.lock();
		*generation = generation.next();
		tracing::debug!(generation = %*generation, "query.invalidate");
	}
}

#[cfg(test)]
mod tests;
