//! [`RecordStore`] backed by an Appwrite database collection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::error::{Result, StoreError};
use crate::{AnalyticsRecord, NewRecord, RecordFilter, RecordId, RecordStore, RecordUpdate};

/// Connection settings for one Appwrite collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppwriteTarget {
	/// API root, e.g. `https://cloud.appwrite.io/v1`.
	pub endpoint: String,
	pub project_id: String,
	pub database_id: String,
	pub collection_id: String,
	pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
	documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
	#[serde(rename = "$id")]
	id: String,
	#[serde(rename = "$updatedAt")]
	updated_at: DateTime<Utc>,
	#[serde(rename = "searchTerm")]
	search_term: String,
	count: u64,
	movie_id: u64,
	#[serde(default)]
	title: String,
	#[serde(default)]
	poster_url: String,
}

impl From<Document> for AnalyticsRecord {
	fn from(doc: Document) -> Self {
		Self {
			id: RecordId(doc.id),
			search_term: doc.search_term,
			count: doc.count,
			movie_id: doc.movie_id,
			title: doc.title,
			poster_url: doc.poster_url,
			updated_at: doc.updated_at,
		}
	}
}

#[derive(Debug, Serialize)]
struct DocumentData<'a> {
	#[serde(rename = "searchTerm", skip_serializing_if = "Option::is_none")]
	search_term: Option<&'a str>,
	count: u64,
	movie_id: u64,
	title: &'a str,
	poster_url: &'a str,
}

/// Encodes one Appwrite query in its JSON form.
pub fn query(method: &str, attribute: Option<&str>, values: serde_json::Value) -> String {
	let mut q = json!({ "method": method, "values": values });
	if let Some(attribute) = attribute {
		q["attribute"] = json!(attribute);
	}
	q.to_string()
}

/// Decodes one document from a response body.
pub fn parse_document(body: &str) -> Result<AnalyticsRecord> {
	serde_json::from_str::<Document>(body)
		.map(AnalyticsRecord::from)
		.map_err(|e| StoreError::Decode(e.to_string()))
}

/// Decodes a document list from a response body, preserving order.
pub fn parse_document_list(body: &str) -> Result<Vec<AnalyticsRecord>> {
	serde_json::from_str::<DocumentList>(body)
		.map(|list| list.documents.into_iter().map(AnalyticsRecord::from).collect())
		.map_err(|e| StoreError::Decode(e.to_string()))
}

/// Appwrite REST document store.
#[derive(Debug, Clone)]
pub struct AppwriteStore {
	http: Client,
	target: AppwriteTarget,
}

impl AppwriteStore {
	pub fn new(target: AppwriteTarget) -> Self {
		Self { http: Client::new(), target }
	}

	/// URL of the collection's document list, or of one document when `id` is set.
	pub fn documents_url(&self, id: Option<&RecordId>) -> Result<Url> {
		let t = &self.target;
		let mut url = Url::parse(&t.endpoint).map_err(|e| StoreError::InvalidUrl(format!("{}: {e}", t.endpoint)))?;
		{
			let mut segments = url
				.path_segments_mut()
				.map_err(|()| StoreError::InvalidUrl(format!("{} cannot be a base", t.endpoint)))?;
			segments
				.pop_if_empty()
				.extend(["databases", t.database_id.as_str(), "collections", t.collection_id.as_str(), "documents"]);
			if let Some(id) = id {
				segments.push(&id.0);
			}
		}
		Ok(url)
	}

	fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
		let request = request
			.header("X-Appwrite-Project", &self.target.project_id)
			.header(CONTENT_TYPE, "application/json");
		match &self.target.api_key {
			Some(key) => request.header("X-Appwrite-Key", key),
			None => request,
		}
	}

	async fn send(&self, request: RequestBuilder) -> Result<String> {
		let response = self.authorize(request).send().await.map_err(|e| StoreError::Network(e.to_string()))?;
		read_body(response).await
	}

	async fn list(&self, queries: &[String]) -> Result<Vec<AnalyticsRecord>> {
		let mut url = self.documents_url(None)?;
		{
			let mut pairs = url.query_pairs_mut();
			for q in queries {
				pairs.append_pair("queries[]", q);
			}
		}
		let body = self.send(self.http.get(url)).await?;
		parse_document_list(&body)
	}
}

async fn read_body(response: Response) -> Result<String> {
	let status = response.status();
	let body = response.text().await.map_err(|e| StoreError::Network(e.to_string()))?;
	check_status(status, body)
}

/// Maps a response status onto its [`StoreError`], passing a successful body
/// through.
pub fn check_status(status: StatusCode, body: String) -> Result<String> {
	if status.is_success() {
		Ok(body)
	} else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
		Err(StoreError::Permission(body))
	} else if status == StatusCode::NOT_FOUND {
		Err(StoreError::NotFound(body))
	} else {
		Err(StoreError::Rejected {
			status: status.as_u16(),
			body,
		})
	}
}

#[async_trait]
impl RecordStore for AppwriteStore {
	async fn find_one(&self, filter: &RecordFilter) -> Result<Option<AnalyticsRecord>> {
		tracing::debug!(search_term = %filter.search_term, "store.find_one");
		let queries = [query("equal", Some("searchTerm"), json!([filter.search_term])), query("limit", None, json!([1]))];
		Ok(self.list(&queries).await?.into_iter().next())
	}

	async fn create(&self, record: NewRecord) -> Result<AnalyticsRecord> {
		tracing::debug!(search_term = %record.search_term, "store.create");
		let data = DocumentData {
			search_term: Some(&record.search_term),
			count: record.count,
			movie_id: record.movie_id,
			title: &record.title,
			poster_url: &record.poster_url,
		};
		let url = self.documents_url(None)?;
		let payload = json!({ "documentId": "unique()", "data": data });
		let body = self.send(self.http.post(url).json(&payload)).await?;
		parse_document(&body)
	}

	async fn update(&self, id: &RecordId, fields: RecordUpdate) -> Result<AnalyticsRecord> {
		tracing::debug!(%id, count = fields.count, "store.update");
		let data = DocumentData {
			search_term: None,
			count: fields.count,
			movie_id: fields.movie_id,
			title: &fields.title,
			poster_url: &fields.poster_url,
		};
		let url = self.documents_url(Some(id))?;
		let body = self.send(self.http.patch(url).json(&json!({ "data": data }))).await?;
		parse_document(&body)
	}

	async fn top_by_count(&self, limit: usize) -> Result<Vec<AnalyticsRecord>> {
		let queries = [query("orderDesc", Some("count"), json!([])), query("limit", None, json!([limit]))];
		self.list(&queries).await
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn store() -> AppwriteStore {
		AppwriteStore::new(AppwriteTarget {
			endpoint: "https://cloud.appwrite.io/v1/".into(),
			project_id: "proj".into(),
			database_id: "db1".into(),
			collection_id: "metrics".into(),
			api_key: None,
		})
	}

	#[test]
	fn documents_url_addresses_collection_and_document() {
		let store = store();
		assert_eq!(
			store.documents_url(None).unwrap().as_str(),
			"https://cloud.appwrite.io/v1/databases/db1/collections/metrics/documents"
		);
		assert_eq!(
			store.documents_url(Some(&RecordId("abc".into()))).unwrap().as_str(),
			"https://cloud.appwrite.io/v1/databases/db1/collections/metrics/documents/abc"
		);
	}

	#[test]
	fn document_ids_are_escaped_as_one_segment() {
		let url = store().documents_url(Some(&RecordId("a b/c".into()))).unwrap();
		assert_eq!(url.as_str(), "https://cloud.appwrite.io/v1/databases/db1/collections/metrics/documents/a%20b%2Fc");
		assert_eq!(url.path_segments().unwrap().count(), 7);
	}

	#[test]
	fn malformed_endpoint_is_an_invalid_url() {
		let mut target = store().target;
		target.endpoint = "not a url".into();
		let err = AppwriteStore::new(target.clone()).documents_url(None).unwrap_err();
		assert!(matches!(err, StoreError::InvalidUrl(_)), "got {err:?}");

		target.endpoint = "mailto:ops@example.com".into();
		let err = AppwriteStore::new(target).documents_url(None).unwrap_err();
		assert!(matches!(err, StoreError::InvalidUrl(_)), "got {err:?}");
	}

	#[test]
	fn status_codes_map_to_store_errors() {
		assert_eq!(check_status(StatusCode::CREATED, "{}".into()), Ok("{}".to_string()));
		assert_eq!(check_status(StatusCode::UNAUTHORIZED, "no key".into()), Err(StoreError::Permission("no key".into())));
		assert_eq!(check_status(StatusCode::FORBIDDEN, "scope".into()), Err(StoreError::Permission("scope".into())));
		assert_eq!(check_status(StatusCode::NOT_FOUND, "gone".into()), Err(StoreError::NotFound("gone".into())));
		assert_eq!(
			check_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".into()),
			Err(StoreError::Rejected {
				status: 500,
				body: "boom".into()
			})
		);
	}

	#[test]
	fn equal_query_names_attribute_and_values() {
		let encoded = query("equal", Some("searchTerm"), json!(["Inception"]));
		let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
		assert_eq!(value, json!({ "method": "equal", "attribute": "searchTerm", "values": ["Inception"] }));
	}

	#[test]
	fn limit_query_has_no_attribute() {
		let value: serde_json::Value = serde_json::from_str(&query("limit", None, json!([5]))).unwrap();
		assert_eq!(value, json!({ "method": "limit", "values": [5] }));
	}

	#[test]
	fn document_list_decodes_in_order() {
		let body = r#"{
			"total": 2,
			"documents": [
				{"$id": "d1", "$updatedAt": "2024-05-01T12:00:00.000+00:00", "searchTerm": "Dune", "count": 9, "movie_id": 438631, "title": "Dune", "poster_url": "https://image.tmdb.org/t/p/w500/d.jpg"},
				{"$id": "d2", "$updatedAt": "2024-05-02T08:30:00.000+00:00", "searchTerm": "Heat", "count": 4, "movie_id": 949}
			]
		}"#;
		let records = parse_document_list(body).unwrap();
		assert_eq!(records.len(), 2);
		assert_eq!(records[0].id, RecordId("d1".into()));
		assert_eq!(records[0].count, 9);
		assert_eq!(records[1].search_term, "Heat");
		assert_eq!(records[1].poster_url, "");
	}

	#[test]
	fn document_without_count_is_a_decode_error() {
		let body = r#"{"$id": "d1", "$updatedAt": "2024-05-01T12:00:00.000+00:00", "searchTerm": "Dune", "movie_id": 1}"#;
		assert!(matches!(parse_document(body), Err(StoreError::Decode(_))));
	}
}
