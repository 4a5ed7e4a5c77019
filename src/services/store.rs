use crate::config::SupabaseConfig;
use crate::models::{MediaPage, MediaRecord, NewMedia};
use crate::services::pagination::PageRange;
use crate::GalleryError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_RANGE};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use url::Url;

const MEDIA_TABLE: &str = "media";

/// Hosted relational store holding media records.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Inserts one row and returns it as stored, with `id` and `created_at`.
    async fn insert(&self, record: &NewMedia) -> Result<MediaRecord, GalleryError>;

    /// Newest-first slice for a 1-based `page`, plus the exact total row count.
    async fn query(&self, page: u32, page_size: u32) -> Result<MediaPage, GalleryError>;
}

/// Talks to Supabase's PostgREST interface with the public (anon) key.
#[derive(Clone, Debug)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

#[derive(Deserialize)]
struct StoreErrorBody {
    message: String,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        }
    }

    fn table_url(&self) -> Result<Url, String> {
        if self.base_url.is_empty() {
            return Err("Store is not configured: URL is empty".to_string());
        }
        let raw = format!("{}/rest/v1/{}", self.base_url, MEDIA_TABLE);
        Url::parse(&raw).map_err(|e| format!("Invalid store URL '{}': {}", raw, e))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    async fn insert_row(&self, record: &NewMedia) -> Result<MediaRecord, String> {
        let url = self.table_url()?;
        let response = self
            .authorized(self.http.post(url))
            .header("Prefer", "return=representation")
            .json(&[record])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;
        if !status.is_success() {
            return Err(error_message(status, &body));
        }

        let mut rows: Vec<MediaRecord> = serde_json::from_str(&body)
            .map_err(|e| format!("Unexpected insert response: {}", e))?;
        if rows.len() != 1 {
            return Err(format!(
                "Insert returned {} rows, expected exactly one",
                rows.len()
            ));
        }
        Ok(rows.remove(0))
    }

    async fn query_page(&self, range: PageRange) -> Result<MediaPage, String> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");

        let response = self
            .authorized(self.http.get(url))
            .header("Range-Unit", "items")
            .header("Range", range.header_value())
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let total = total_from_headers(response.headers());
        let body = response.text().await.map_err(|e| e.to_string())?;

        // PostgREST answers 416 when the offset lies past the last row.
        if status == StatusCode::RANGE_NOT_SATISFIABLE {
            return match total {
                Some(total_count) => Ok(MediaPage {
                    rows: Vec::new(),
                    total_count,
                }),
                None => Err(error_message(status, &body)),
            };
        }
        if !status.is_success() {
            return Err(error_message(status, &body));
        }

        let rows: Vec<MediaRecord> = serde_json::from_str(&body)
            .map_err(|e| format!("Unexpected query response: {}", e))?;
        let total_count = total.unwrap_or(rows.len() as u64);
        Ok(MediaPage { rows, total_count })
    }
}

#[async_trait]
impl MediaStore for SupabaseClient {
    async fn insert(&self, record: &NewMedia) -> Result<MediaRecord, GalleryError> {
        match self.insert_row(record).await {
            Ok(row) => {
                tracing::info!("Saved media record {} ({})", row.id, row.title);
                Ok(row)
            }
            Err(message) => {
                tracing::error!(
                    "Error saving media record for {}: {}",
                    record.cloudinary_public_id,
                    message
                );
                Err(GalleryError::Insert(message))
            }
        }
    }

    async fn query(&self, page: u32, page_size: u32) -> Result<MediaPage, GalleryError> {
        let range = PageRange::for_page(page, page_size).ok_or_else(|| {
            GalleryError::Query(format!(
                "Invalid page request: page {} with page size {}",
                page, page_size
            ))
        })?;

        self.query_page(range).await.map_err(|message| {
            tracing::error!(
                "Error fetching media page {} (rows {}): {}",
                page,
                range.header_value(),
                message
            );
            GalleryError::Query(message)
        })
    }
}

/// Total from `Content-Range: 0-8/42` or `*/42`. `*/*` (count not requested) yields `None`.
pub fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}

fn total_from_headers(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_content_range_total)
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<StoreErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| format!("Store request failed with status {}: {}", status, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> SupabaseClient {
        let config = SupabaseConfig {
            url: server.url(),
            anon_key: "anon-key".to_string(),
        };
        SupabaseClient::new(&config, reqwest::Client::new())
    }

    fn row_json(id: i64, title: &str) -> String {
        format!(
            r#"{{"id":{id},"title":"{title}","type":"image","cloudinary_url":"https://res.example.com/{id}.png","cloudinary_public_id":"p{id}","created_at":"2024-05-0{id}T10:00:00+00:00"}}"#
        )
    }

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("0-8/42"), Some(42));
        assert_eq!(parse_content_range_total("*/3"), Some(3));
        assert_eq!(parse_content_range_total("0-8/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }

    #[tokio::test]
    async fn test_insert_requests_representation() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/media")
            .match_header("apikey", "anon-key")
            .match_header("authorization", "Bearer anon-key")
            .match_header("prefer", "return=representation")
            .match_body(Matcher::Json(serde_json::json!([{
                "title": "t1",
                "type": "image",
                "cloudinary_url": "https://res.example.com/1.png",
                "cloudinary_public_id": "p1",
            }])))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(format!("[{}]", row_json(1, "t1")))
            .create_async()
            .await;

        let record = NewMedia {
            title: "t1".to_string(),
            media_type: MediaType::Image,
            cloudinary_url: "https://res.example.com/1.png".to_string(),
            cloudinary_public_id: "p1".to_string(),
        };
        let row = client_for(&server).insert(&record).await.unwrap();

        mock.assert_async().await;
        assert_eq!(row.id, 1);
        assert_eq!(row.title, "t1");
        assert_eq!(row.media_type, MediaType::Image);
        assert_eq!(row.created_at, "2024-05-01T10:00:00+00:00");
    }

    #[tokio::test]
    async fn test_insert_failure_uses_store_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/v1/media")
            .with_status(400)
            .with_body(r#"{"code":"23502","message":"null value in column \"title\""}"#)
            .create_async()
            .await;

        let record = NewMedia {
            title: String::new(),
            media_type: MediaType::Video,
            cloudinary_url: "u".to_string(),
            cloudinary_public_id: "p".to_string(),
        };
        let err = client_for(&server).insert(&record).await.unwrap_err();
        assert_eq!(
            err,
            GalleryError::Insert("null value in column \"title\"".to_string())
        );
    }

    #[tokio::test]
    async fn test_query_sends_range_order_and_count() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/media")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), "*".into()),
                Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
            ]))
            .match_header("range", "18-26")
            .match_header("prefer", "count=exact")
            .with_status(206)
            .with_header("content-range", "18-19/20")
            .with_body(format!("[{},{}]", row_json(2, "b"), row_json(1, "a")))
            .create_async()
            .await;

        let page = client_for(&server).query(3, 9).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.total_count, 20);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0].title, "b");
    }

    #[tokio::test]
    async fn test_query_past_the_end_is_empty_not_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/media")
            .match_query(Matcher::Any)
            .with_status(416)
            .with_header("content-range", "*/4")
            .with_body(r#"{"code":"PGRST103","message":"Requested range not satisfiable"}"#)
            .create_async()
            .await;

        let page = client_for(&server).query(5, 9).await.unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.total_count, 4);
    }

    #[tokio::test]
    async fn test_query_failure_is_query_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/media")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message":"Invalid API key"}"#)
            .create_async()
            .await;

        let err = client_for(&server).query(1, 9).await.unwrap_err();
        assert_eq!(err, GalleryError::Query("Invalid API key".to_string()));
    }

    #[tokio::test]
    async fn test_query_rejects_page_zero_without_calling_store() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = client_for(&server).query(0, 9).await.unwrap_err();
        assert!(matches!(err, GalleryError::Query(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unconfigured_store_fails_at_call_time() {
        let client = SupabaseClient::new(&SupabaseConfig::default(), reqwest::Client::new());
        let err = client.query(1, 9).await.unwrap_err();
        assert!(matches!(err, GalleryError::Query(_)));
    }
}
