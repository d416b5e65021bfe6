use marquee_catalog::Item;

use crate::QueryState;

/// Prompt shown before anything has been typed.
pub const PROMPT_MESSAGE: &str = "Search for a movie...";

/// Shown when a search for non-blank text found nothing.
pub const NO_RESULTS_MESSAGE: &str = "No movies found";

/// What the search screen should present for the current input and query state.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchView {
	Loading,
	Error(String),
	/// Items to list. `heading` is set when the input is not blank.
	Results { heading: Option<String>, items: Vec<Item> },
	/// Nothing to list.
	Empty { message: &'static str },
}

impl SearchView {
	/// Derives the view from the raw input `text` and the query `state`.
	pub fn derive(text: &str, state: &QueryState<Vec<Item>>) -> Self {
		let blank = text.trim().is_empty();
		match state {
			QueryState::Loading => Self::Loading,
			QueryState::Error(message) => Self::Error(message.clone()),
			QueryState::Success(items) if !items.is_empty() => Self::Results {
				heading: (!blank).then(|| format!("Search Results for {text}")),
				items: items.clone(),
			},
			QueryState::Success(_) | QueryState::Idle => Self::Empty {
				message: if blank { PROMPT_MESSAGE } else { NO_RESULTS_MESSAGE },
			},
		}
	}
}
