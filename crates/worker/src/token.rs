use std::fmt;

use tokio_util::sync::CancellationToken;

/// Monotonic generation number.
///
/// Every new launch or reset takes the next value; a completion tagged with
/// anything other than the current value is stale.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
	/// The generation before any launch.
	pub const ZERO: Self = Self(0);

	/// Returns the following generation.
	#[must_use]
	pub const fn next(self) -> Self {
		Self(self.0.wrapping_add(1))
	}

	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for Generation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "g{}", self.0)
	}
}

/// Generation-scoped cancellation token for one unit of pending work.
#[derive(Debug, Clone)]
pub struct GenerationToken {
	generation: Generation,
	cancel: CancellationToken,
}

impl GenerationToken {
	/// Creates a fresh, uncancelled token for `generation`.
	pub fn new(generation: Generation) -> Self {
		Self {
			generation,
			cancel: CancellationToken::new(),
		}
	}

	pub const fn generation(&self) -> Generation {
		self.generation
	}

	/// Returns true when cancellation is requested.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Requests cancellation.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Future resolving when cancellation is requested.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}
}
