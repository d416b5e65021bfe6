//! Error types for record store operations.

use thiserror::Error;

/// Failure of a record store read or write.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
	/// The request never produced a response.
	#[error("network error: {0}")]
	Network(String),

	/// The store refused the request.
	#[error("store returned status {status}: {body}")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Response body, possibly empty.
		body: String,
	},

	/// Credentials lack access to the collection.
	#[error("permission denied: {0}")]
	Permission(String),

	/// A document could not be decoded into a record.
	#[error("invalid document: {0}")]
	Decode(String),

	/// The configured endpoint cannot address documents.
	#[error("invalid store url: {0}")]
	InvalidUrl(String),

	/// An update targeted a record that does not exist.
	#[error("record not found: {0}")]
	NotFound(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
