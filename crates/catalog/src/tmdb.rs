//! HTTP client for The Movie Database search API.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use url::Url;

use crate::error::{FetchError, Result};
use crate::{CatalogClient, Item};

#[derive(Deserialize)]
struct SearchEnvelope {
	results: Vec<Item>,
}

/// Decodes a TMDB result page, preserving the ranking order.
pub fn parse_search_response(body: &str) -> Result<Vec<Item>> {
	serde_json::from_str::<SearchEnvelope>(body)
		.map(|envelope| envelope.results)
		.map_err(|e| FetchError::Parse(e.to_string()))
}

/// Maps a response status onto its [`FetchError`], passing a successful
/// body through.
pub fn check_status(status: StatusCode, body: String) -> Result<String> {
	if status == StatusCode::UNAUTHORIZED {
		Err(FetchError::Unauthorized)
	} else if status.is_success() {
		Ok(body)
	} else {
		Err(FetchError::Transport {
			status: status.as_u16(),
			body,
		})
	}
}

/// [`CatalogClient`] backed by the TMDB v3 REST API.
///
/// An empty query lists popular titles instead of searching. No request
/// timeout is configured.
#[derive(Debug, Clone)]
pub struct TmdbClient {
	http: Client,
	base_url: String,
	api_key: Option<String>,
}

impl TmdbClient {
	/// Creates a client for `base_url` authenticating with a bearer `api_key`.
	pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
		Self {
			http: Client::new(),
			base_url: base_url.into().trim_end_matches('/').to_string(),
			api_key,
		}
	}

	/// Builds the request URL for `query`.
	pub fn endpoint(&self, query: &str) -> Result<Url> {
		let query = query.trim();
		let path = if query.is_empty() { "discover/movie" } else { "search/movie" };
		let mut url = Url::parse(&format!("{}/{path}", self.base_url)).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
		if query.is_empty() {
			url.query_pairs_mut().append_pair("sort_by", "popularity.desc");
		} else {
			url.query_pairs_mut().append_pair("query", query);
		}
		Ok(url)
	}
}

#[async_trait]
impl CatalogClient for TmdbClient {
	async fn search(&self, query: &str) -> Result<Vec<Item>> {
		let url = self.endpoint(query)?;
		tracing::debug!(%url, "catalog.search");

		let mut request = self.http.get(url).header(ACCEPT, "application/json");
		if let Some(key) = &self.api_key {
			request = request.header(AUTHORIZATION, format!("Bearer {key}"));
		}

		let response = request.send().await.map_err(|e| FetchError::Network(e.to_string()))?;
		let status = response.status();
		let body = response.text().await.map_err(|e| FetchError::Network(e.to_string()))?;
		let body = check_status(status, body)?;
		let items = parse_search_response(&body)?;
		tracing::debug!(count = items.len(), "catalog.search.done");
		Ok(items)
	}
}
