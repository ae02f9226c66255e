//! HTTP client for the course-data backend.
//!
//! The backend resolves free-form course identifiers to canonical codes and
//! their hub requirements. Configuration is via environment variables:
//! - `COURSE_MAPPER_CATALOG_URL` - Base URL (default: `http://localhost:5000/api`)
//!
//! Failures here never touch roadmap state.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Course;

/// Default URL for local development.
const DEFAULT_URL: &str = "http://localhost:5000/api";

pub const CATALOG_URL_ENV: &str = "COURSE_MAPPER_CATALOG_URL";

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// Response of `POST /search-course`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseLookup {
    pub found: bool,
    pub course_code: Option<String>,
    #[serde(default)]
    pub hub_requirements: Vec<String>,
}

/// One entry of `POST /multiple-courses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseHubs {
    pub course: String,
    #[serde(default)]
    pub hub_requirements: Vec<String>,
}

/// Response of `POST /multiple-courses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleCoursesResponse {
    pub results: Vec<CourseHubs>,
    #[serde(default)]
    pub unique_hubs: Vec<String>,
    #[serde(default)]
    pub total_unique_hubs: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    client: Client,
}

impl CatalogClient {
    /// Create client from environment variables.
    pub fn from_env() -> Self {
        let base_url = std::env::var(CATALOG_URL_ENV).unwrap_or_else(|_| DEFAULT_URL.to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        match status {
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(message)),
            _ => Err(ClientError::Server(format!("{}: {}", status, message))),
        }
    }

    /// Whether the backend answers its health check.
    pub async fn is_available(&self) -> bool {
        match self.request(reqwest::Method::GET, "/health").send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Course catalog is not available: {}", e);
                false
            }
        }
    }

    /// Resolve a free-form identifier such as `cs111` to a course code and
    /// its hub requirements.
    pub async fn search_course(&self, identifier: &str) -> Result<CourseLookup, ClientError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ClientError::BadRequest(
                "course identifier is required".to_string(),
            ));
        }

        let response = self
            .request(reqwest::Method::POST, "/search-course")
            .json(&serde_json::json!({ "course_identifier": identifier }))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Hub requirements for several course codes at once.
    pub async fn course_hubs(
        &self,
        courses: &[String],
    ) -> Result<MultipleCoursesResponse, ClientError> {
        if courses.is_empty() {
            return Err(ClientError::BadRequest(
                "courses must be a non-empty list".to_string(),
            ));
        }

        let response = self
            .request(reqwest::Method::POST, "/multiple-courses")
            .json(&serde_json::json!({ "courses": courses }))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Look up an identifier and build an enrollable [`Course`].
    ///
    /// The backend does not report credit values, so the caller supplies
    /// them.
    pub async fn fetch_course(&self, identifier: &str, credits: u32) -> Result<Course, ClientError> {
        let lookup = self.search_course(identifier).await?;
        match (lookup.found, lookup.course_code) {
            (true, Some(code)) => Ok(Course::new(code.clone(), code, credits)
                .with_hubs(lookup.hub_requirements)),
            _ => Err(ClientError::NotFound(format!(
                "no course matches {}",
                identifier.trim()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::{get, post}, Json, Router};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    fn backend() -> Router {
        Router::new()
            .route("/api/health", get(|| async { Json(serde_json::json!({ "status": "healthy" })) }))
            .route(
                "/api/search-course",
                post(|Json(body): Json<serde_json::Value>| async move {
                    if body["course_identifier"] == "cs111" {
                        Json(serde_json::json!({
                            "found": true,
                            "course_code": "CAS CS 111",
                            "hub_requirements": ["Quantitative Reasoning II", "Critical Thinking"]
                        }))
                    } else {
                        Json(serde_json::json!({
                            "found": false,
                            "course_code": null,
                            "hub_requirements": []
                        }))
                    }
                }),
            )
            .route(
                "/api/multiple-courses",
                post(|| async {
                    (
                        AxumStatus::INTERNAL_SERVER_ERROR,
                        Json(serde_json::json!({ "error": "Course manager not initialized" })),
                    )
                }),
            )
    }

    #[tokio::test]
    async fn fetches_course_with_hubs() {
        let client = CatalogClient::new(serve(backend()).await);

        assert!(client.is_available().await);
        let course = client.fetch_course(" cs111 ", 4).await.unwrap();

        assert_eq!(course.course_id, "CAS CS 111");
        assert_eq!(course.credits, 4);
        assert_eq!(
            course.hub_requirements,
            vec!["Quantitative Reasoning II", "Critical Thinking"]
        );
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let client = CatalogClient::new(serve(backend()).await);
        let err = client.fetch_course("zz999", 4).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn server_error_message_is_extracted() {
        let client = CatalogClient::new(serve(backend()).await);
        let err = client
            .course_hubs(&["CAS CS 111".to_string()])
            .await
            .unwrap_err();
        match err {
            ClientError::Server(msg) => assert!(msg.contains("Course manager not initialized")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_identifier_is_rejected_locally() {
        let client = CatalogClient::new("http://127.0.0.1:9");
        assert!(matches!(
            client.search_course("  ").await,
            Err(ClientError::BadRequest(_))
        ));
    }
}
