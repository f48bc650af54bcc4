//! Client for the RetroBoard HTTP API.
//!
//! [`ApiClient`] is the seam the rest of the crate talks through: one call
//! per endpoint, returning the decoded body or an [`ApiError`]. [`HttpClient`]
//! is the real implementation over `reqwest`.

use crate::config::ClientConfig;
use crate::protocol::{
    Ack, CategoryUpdate, ExportPayload, NewBoard, NewCategory, NewNote, RawSetting, SettingUpdate, TagsUpdate,
};
use crate::types::{Board, BoardCreated, Category, CategoryCreated, Id, Note, NoteCreated};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Failure of a single API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Server answered with a non-2xx status.
    Http { status: u16, text: String },
    /// Request never produced a response.
    Transport(String),
    /// Response body did not match the expected shape.
    Decode(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Http { status, text } => write!(f, "HTTP error! status: {}, text: {}", status, text),
            ApiError::Transport(msg) => write!(f, "transport error: {}", msg),
            ApiError::Decode(msg) => write!(f, "failed to decode response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// One network call per method; no retries, no caching.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// `GET /notes?board_id={id}`
    async fn list_notes(&self, board_id: Id) -> Result<Vec<Note>, ApiError>;

    /// `GET /categories?board_id={id}`
    async fn list_categories(&self, board_id: Id) -> Result<Vec<Category>, ApiError>;

    /// `POST /notes`
    async fn create_note(&self, note: &NewNote) -> Result<NoteCreated, ApiError>;

    /// `DELETE /notes?note_id={id}`
    async fn delete_note(&self, note_id: Id) -> Result<Ack, ApiError>;

    /// `PUT /notes/{id}/category`
    async fn update_note_category(&self, note_id: Id, category: Id) -> Result<Ack, ApiError>;

    /// `PUT /notes/{id}/tags`
    async fn update_note_tags(&self, note_id: Id, tags: &[String]) -> Result<Ack, ApiError>;

    /// `POST /categories`
    async fn create_category(&self, category: &NewCategory) -> Result<CategoryCreated, ApiError>;

    /// `DELETE /categories?category_id={id}`
    async fn delete_category(&self, category_id: Id) -> Result<Ack, ApiError>;

    /// `GET /boards`
    async fn list_boards(&self) -> Result<Vec<Board>, ApiError>;

    /// `POST /boards`
    async fn create_board(&self, board: &NewBoard) -> Result<BoardCreated, ApiError>;

    /// `DELETE /boards?board_id={id}`
    async fn delete_board(&self, board_id: Id) -> Result<Ack, ApiError>;

    /// `GET /boards/export?board_id={id}`
    async fn export_board(&self, board_id: Id) -> Result<ExportPayload, ApiError>;

    /// `GET /settings`
    async fn list_settings(&self) -> Result<Vec<RawSetting>, ApiError>;

    /// `PUT /settings/{name}`
    async fn update_setting(&self, name: &str, value: &SettingUpdate) -> Result<Ack, ApiError>;
}

/// [`ApiClient`] backed by a real HTTP connection.
pub struct HttpClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl HttpClient {
    /// Create a client for the configured server.
    pub fn new(config: ClientConfig) -> eyre::Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| eyre::eyre!("Failed to create HTTP client: {}", e))?;
        Ok(Self { config, http })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.config.endpoint(path))
    }

    fn with_body<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> RequestBuilder {
        self.request(method, path).json(body)
    }

    /// Send a request and decode a 2xx body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            log::debug!("Request failed before a response: {:?}", e);
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let url = response.url().to_string();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("failed to read body from {}: {}", url, e)))?;

        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                text,
            });
        }

        log::debug!("{} -> {}", url, status.as_u16());
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl ApiClient for HttpClient {
    async fn list_notes(&self, board_id: Id) -> Result<Vec<Note>, ApiError> {
        self.send(self.request(Method::GET, "/notes").query(&[("board_id", board_id)]))
            .await
    }

    async fn list_categories(&self, board_id: Id) -> Result<Vec<Category>, ApiError> {
        self.send(self.request(Method::GET, "/categories").query(&[("board_id", board_id)]))
            .await
    }

    async fn create_note(&self, note: &NewNote) -> Result<NoteCreated, ApiError> {
        self.send(self.with_body(Method::POST, "/notes", note)).await
    }

    async fn delete_note(&self, note_id: Id) -> Result<Ack, ApiError> {
        self.send(self.request(Method::DELETE, "/notes").query(&[("note_id", note_id)]))
            .await
    }

    async fn update_note_category(&self, note_id: Id, category: Id) -> Result<Ack, ApiError> {
        let path = format!("/notes/{}/category", note_id);
        self.send(self.with_body(Method::PUT, &path, &CategoryUpdate { category }))
            .await
    }

    async fn update_note_tags(&self, note_id: Id, tags: &[String]) -> Result<Ack, ApiError> {
        let path = format!("/notes/{}/tags", note_id);
        let body = TagsUpdate { tags: tags.to_vec() };
        self.send(self.with_body(Method::PUT, &path, &body)).await
    }

    async fn create_category(&self, category: &NewCategory) -> Result<CategoryCreated, ApiError> {
        self.send(self.with_body(Method::POST, "/categories", category)).await
    }

    async fn delete_category(&self, category_id: Id) -> Result<Ack, ApiError> {
        self.send(
            self.request(Method::DELETE, "/categories")
                .query(&[("category_id", category_id)]),
        )
        .await
    }

    async fn list_boards(&self) -> Result<Vec<Board>, ApiError> {
        self.send(self.request(Method::GET, "/boards")).await
    }

    async fn create_board(&self, board: &NewBoard) -> Result<BoardCreated, ApiError> {
        self.send(self.with_body(Method::POST, "/boards", board)).await
    }

    async fn delete_board(&self, board_id: Id) -> Result<Ack, ApiError> {
        self.send(self.request(Method::DELETE, "/boards").query(&[("board_id", board_id)]))
            .await
    }

    async fn export_board(&self, board_id: Id) -> Result<ExportPayload, ApiError> {
        self.send(
            self.request(Method::GET, "/boards/export")
                .query(&[("board_id", board_id)]),
        )
        .await
    }

    async fn list_settings(&self) -> Result<Vec<RawSetting>, ApiError> {
        self.send(self.request(Method::GET, "/settings")).await
    }

    async fn update_setting(&self, name: &str, value: &SettingUpdate) -> Result<Ack, ApiError> {
        let path = format!("/settings/{}", name);
        self.send(self.with_body(Method::PUT, &path, value)).await
    }
}
