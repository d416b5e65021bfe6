//! Client-side search coordination for marquee.
//!
//! * [`InputDebouncer`] settles keystrokes into a commit or a clear after a
//!   quiet window.
//! * [`QueryController`] runs one async operation at a time and discards
//!   completions from superseded generations.
//! * [`AnalyticsRecorder`] counts searches per term with an
//!   increment-or-create against a [`marquee_store::RecordStore`].
//! * [`SearchSession`] wires the three together for one search screen.

#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use proptest as _;
#[cfg(test)]
use tracing_subscriber as _;

pub mod analytics;
pub mod assemble;
pub mod controller;
pub mod debounce;
pub mod session;
mod state;
mod view;

pub use analytics::AnalyticsRecorder;
pub use assemble::session_from_config;
pub use controller::{QueryController, Settlement};
pub use debounce::{DEFAULT_QUIET_WINDOW, DebounceEvent, DebounceSink, InputDebouncer};
pub use session::SearchSession;
pub use state::QueryState;
pub use view::{NO_RESULTS_MESSAGE, PROMPT_MESSAGE, SearchView};
