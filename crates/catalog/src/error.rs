//! Error types for catalog fetches.

use thiserror::Error;

/// Failure of a catalog search.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
	/// The request never produced a response.
	#[error("network error: {0}")]
	Network(String),

	/// The service answered with a non-success status.
	#[error("catalog returned status {status}: {body}")]
	Transport {
		/// HTTP status code.
		status: u16,
		/// Response body, possibly empty.
		body: String,
	},

	/// The response body could not be decoded.
	#[error("invalid catalog response: {0}")]
	Parse(String),

	/// The request URL could not be built from the configured base.
	#[error("invalid catalog url: {0}")]
	InvalidUrl(String),

	/// Credentials were missing or rejected.
	#[error("catalog rejected the credentials")]
	Unauthorized,
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, FetchError>;
