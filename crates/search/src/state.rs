/// Lifecycle state of the most recent query.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum QueryState<T> {
	/// Nothing requested, or the last request was reset.
	#[default]
	Idle,
	/// A request is in flight.
	Loading,
	/// The current request completed with data.
	Success(T),
	/// The current request failed; the message is meant for display.
	Error(String),
}

impl<T> QueryState<T> {
	pub fn is_idle(&self) -> bool {
		matches!(self, Self::Idle)
	}

	pub fn is_loading(&self) -> bool {
		matches!(self, Self::Loading)
	}

	/// Data of a successful request, `None` in every other state.
	pub fn data(&self) -> Option<&T> {
		match self {
			Self::Success(data) => Some(data),
			_ => None,
		}
	}

	pub fn error(&self) -> Option<&str> {
		match self {
			Self::Error(message) => Some(message),
			_ => None,
		}
	}

	/// Short label for logs.
	pub fn label(&self) -> &'static str {
		match self {
			Self::Idle => "idle",
			Self::Loading => "loading",
			Self::Success(_) => "success",
			Self::Error(_) => "error",
		}
	}
}
