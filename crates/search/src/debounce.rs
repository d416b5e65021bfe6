//! Keystroke debouncing.
//!
//! [`InputDebouncer`] keeps the latest input text and at most one armed
//! timer. Every input cancels the armed timer and arms a new one, so a burst
//! of keystrokes inside the quiet window produces a single emission carrying
//! the final text.

use std::sync::Arc;
use std::time::Duration;

use marquee_worker::{Generation, GenerationToken, TaskClass};
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Quiet window used when none is configured.
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(marquee_config::DEFAULT_DEBOUNCE_MS);

/// Outcome of a settled burst of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceEvent {
	/// The input settled on non-blank text, carried verbatim.
	Commit(String),
	/// The input settled on blank text.
	Clear,
}

/// Receiver of debounced events.
///
/// `emit` runs on the timer task, so implementations must not block.
pub trait DebounceSink: Send + Sync + 'static {
	fn emit(&self, event: DebounceEvent);
}

impl DebounceSink for mpsc::UnboundedSender<DebounceEvent> {
	fn emit(&self, event: DebounceEvent) {
		if self.send(event).is_err() {
			tracing::trace!("debounce.sink_closed");
		}
	}
}

#[derive(Debug, Default)]
struct DebounceState {
	text: String,
	generation: Generation,
	pending: Option<GenerationToken>,
	torn_down: bool,
}

struct Shared<S> {
	sink: S,
	state: Mutex<DebounceState>,
}

impl<S> Shared<S> {
	fn shut_down(&self) {
		let mut state = self.state.lock();
		state.torn_down = true;
		if let Some(pending) = state.pending.take() {
			pending.cancel();
		}
	}
}

impl<S: DebounceSink> Shared<S> {
	/// Fires the timer armed under `token` if it is still the armed one.
	fn fire(&self, token: &GenerationToken) {
		let event = {
			let mut state = self.state.lock();
			let armed = state.pending.as_ref().map(GenerationToken::generation);
			if state.torn_down || token.is_cancelled() || armed != Some(token.generation()) {
				return;
			}
			state.pending = None;
			if state.text.trim().is_empty() {
				DebounceEvent::Clear
			} else {
				DebounceEvent::Commit(state.text.clone())
			}
		};
		tracing::debug!(generation = %token.generation(), ?event, "debounce.fire");
		self.sink.emit(event);
	}
}

/// Turns raw input changes into debounced [`DebounceEvent`]s.
pub struct InputDebouncer<S> {
	shared: Arc<Shared<S>>,
	quiet_window: Duration,
}

impl<S> std::fmt::Debug for InputDebouncer<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("InputDebouncer")
			.field("quiet_window", &self.quiet_window)
			.field("state", &*self.shared.state.lock())
			.finish()
	}
}

impl<S: DebounceSink> InputDebouncer<S> {
	/// Creates a debouncer with the default 500 ms quiet window.
	pub fn new(sink: S) -> Self {
		Self::with_quiet_window(sink, DEFAULT_QUIET_WINDOW)
	}

	pub fn with_quiet_window(sink: S, quiet_window: Duration) -> Self {
		Self {
			shared: Arc::new(Shared {
				sink,
				state: Mutex::new(DebounceState::default()),
			}),
			quiet_window,
		}
	}

	pub fn quiet_window(&self) -> Duration {
		self.quiet_window
	}

	/// Latest raw input text.
	pub fn text(&self) -> String {
		self.shared.state.lock().text.clone()
	}

	/// Whether a timer is armed.
	pub fn pending(&self) -> bool {
		self.shared.state.lock().pending.is_some()
	}

	/// Records `text` and restarts the quiet window. Ignored after teardown.
	pub fn on_input(&self, text: impl Into<String>) {
		let token = {
			let mut state = self.shared.state.lock();
			if state.torn_down {
				return;
			}
			state.text = text.into();
			if let Some(previous) = state.pending.take() {
				previous.cancel();
			}
			state.generation = state.generation.next();
			let token = GenerationToken::new(state.generation);
			state.pending = Some(token.clone());
			token
		};

		let shared = Arc::clone(&self.shared);
		let quiet_window = self.quiet_window;
		marquee_worker::spawn(TaskClass::Background, async move {
			tokio::select! {
				biased;
				_ = token.cancelled() => {}
				_ = tokio::time::sleep(quiet_window) => shared.fire(&token),
			}
		});
	}

	/// Cancels the armed timer; no emission happens after this returns.
	pub fn teardown(&self) {
		self.shared.shut_down();
	}
}

impl<S> Drop for InputDebouncer<S> {
	fn drop(&mut self) {
		self.shared.shut_down();
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	const WINDOW: Duration = DEFAULT_QUIET_WINDOW;

	fn debouncer() -> (InputDebouncer<mpsc::UnboundedSender<DebounceEvent>>, mpsc::UnboundedReceiver<DebounceEvent>) {
		let (tx, rx) = mpsc::unbounded_channel();
		(InputDebouncer::new(tx), rx)
	}

	fn drain(rx: &mut mpsc::UnboundedReceiver<DebounceEvent>) -> Vec<DebounceEvent> {
		std::iter::from_fn(|| rx.try_recv().ok()).collect()
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn nothing_is_emitted_inside_the_window() {
		let (debouncer, mut rx) = debouncer();
		debouncer.on_input("Inception");
		tokio::time::sleep(WINDOW - Duration::from_millis(1)).await;
		assert!(drain(&mut rx).is_empty());
		assert!(debouncer.pending());
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn settled_text_is_committed_verbatim() {
		let (debouncer, mut rx) = debouncer();
		debouncer.on_input(" Inception ");
		tokio::time::sleep(WINDOW + Duration::from_millis(1)).await;
		assert_eq!(drain(&mut rx), vec![DebounceEvent::Commit(" Inception ".to_string())]);
		assert!(!debouncer.pending());
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn burst_collapses_to_last_value() {
		let (debouncer, mut rx) = debouncer();
		debouncer.on_input("a");
		tokio::time::sleep(Duration::from_millis(300)).await;
		debouncer.on_input("ab");
		tokio::time::sleep(Duration::from_millis(300)).await;
		assert!(drain(&mut rx).is_empty(), "first timer must have been superseded");
		tokio::time::sleep(Duration::from_millis(201)).await;
		assert_eq!(drain(&mut rx), vec![DebounceEvent::Commit("ab".to_string())]);
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn blank_text_settles_to_clear() {
		let (debouncer, mut rx) = debouncer();
		debouncer.on_input("Dune");
		debouncer.on_input("   ");
		tokio::time::sleep(WINDOW * 2).await;
		assert_eq!(drain(&mut rx), vec![DebounceEvent::Clear]);
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn teardown_cancels_pending_timer() {
		let (debouncer, mut rx) = debouncer();
		debouncer.on_input("Heat");
		debouncer.teardown();
		assert!(!debouncer.pending());

		debouncer.on_input("Heat 2");
		tokio::time::sleep(WINDOW * 2).await;
		assert!(drain(&mut rx).is_empty());
		assert_eq!(debouncer.text(), "Heat");
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn dropping_the_debouncer_cancels_its_timer() {
		let (debouncer, mut rx) = debouncer();
		debouncer.on_input("Alien");
		drop(debouncer);
		tokio::time::sleep(WINDOW * 2).await;
		assert!(drain(&mut rx).is_empty());
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn custom_window_is_honoured() {
		let (tx, mut rx) = mpsc::unbounded_channel();
		let debouncer = InputDebouncer::with_quiet_window(tx, Duration::from_millis(50));
		debouncer.on_input("x");
		tokio::time::sleep(Duration::from_millis(51)).await;
		assert_eq!(drain(&mut rx), vec![DebounceEvent::Commit("x".to_string())]);
	}
}
