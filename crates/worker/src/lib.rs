//! Worker primitives shared by the marquee crates.
//!
//! * [`spawn`] launches work on the ambient tokio runtime, labelled with a
//!   [`TaskClass`] for tracing.
//! * [`Generation`] is the monotonic counter used to recognise stale
//!   completions; [`GenerationToken`] pairs one with a cancellation token.
//! * [`join_error_panic_message`] turns a panicked task into an error string.

mod class;
mod panic;
mod spawn;
mod token;

pub use class::TaskClass;
pub use panic::join_error_panic_message;
pub use spawn::spawn;
pub use token::{Generation, GenerationToken};
