// src/infrastructure/http.rs
use crate::application::NotesApi;
use crate::constants::NOTES_PATH;
use crate::domain::{ApiError, Note, NoteFields, NoteId};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Json(Value),
    Text(String),
}

/// Turn a raw response into a payload or the uniform request failure.
///
/// 204 is empty regardless of headers. Non-2xx responses use the JSON `detail`
/// field as message when there is one.
pub fn decode_response(status: u16, content_type: &str, body: &str) -> Result<Payload, ApiError> {
    if status == 204 {
        return Ok(Payload::Empty);
    }
    let ok = (200..300).contains(&status);

    let payload = if content_type.contains("application/json") {
        if body.trim().is_empty() {
            Payload::Empty
        } else {
            match serde_json::from_str::<Value>(body) {
                Ok(value) => Payload::Json(value),
                Err(_) if !ok => return Err(ApiError::from_status(status, None)),
                Err(e) => {
                    return Err(ApiError::RequestFailed {
                        status: Some(status),
                        message: format!("Invalid JSON in response: {}", e),
                    })
                }
            }
        }
    } else {
        Payload::Text(body.to_string())
    };

    if !ok {
        return Err(ApiError::from_status(status, detail_of(&payload)));
    }
    Ok(payload)
}

fn detail_of(payload: &Payload) -> Option<String> {
    let Payload::Json(value) = payload else {
        return None;
    };
    match value.get("detail")? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(fields) if fields.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        // e.g. a list of validation errors
        other => Some(other.to_string()),
    }
}

fn expect_json<T: DeserializeOwned>(payload: Payload) -> Result<T, ApiError> {
    match payload {
        Payload::Json(value) => serde_json::from_value(value)
            .map_err(|e| ApiError::transport(format!("Unexpected response shape: {}", e))),
        Payload::Empty => Err(ApiError::transport("Expected a JSON body, got none")),
        Payload::Text(_) => Err(ApiError::transport("Expected a JSON body, got text")),
    }
}

/// Notes API over HTTP. One request per call, no retries, no timeout.
#[derive(Debug)]
pub struct HttpNotesApi {
    client: Client,
    base_url: String,
}

impl HttpNotesApi {
    /// `base_url` is expected to be normalized already (no trailing slash)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .context("Failed to build HTTP client")?;
        let base_url = base_url.into();
        debug!(%base_url, "Created HTTP notes client");
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/notes` or `{base}/notes/{id}`
    pub fn endpoint(&self, id: Option<&NoteId>) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.base_url, NOTES_PATH);
        let mut url = Url::parse(&raw)
            .map_err(|e| ApiError::transport(format!("Invalid base URL '{}': {}", self.base_url, e)))?;
        if let Some(id) = id {
            url.path_segments_mut()
                .map_err(|_| ApiError::transport(format!("Invalid base URL '{}'", self.base_url)))?
                .push(&id.to_string());
        }
        Ok(url)
    }

    #[instrument(level = "debug", skip(self, body), fields(method = %method, url = %url))]
    fn request(&self, method: Method, url: Url, body: Option<&NoteFields>) -> Result<Payload, ApiError> {
        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .map_err(|e| ApiError::transport(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let text = response
            .text()
            .map_err(|e| ApiError::transport(e.to_string()))?;
        debug!(status, %content_type, len = text.len(), "Received response");

        decode_response(status, &content_type, &text)
    }
}

impl NotesApi for HttpNotesApi {
    fn list(&mut self) -> Result<Vec<Note>, ApiError> {
        let url = self.endpoint(None)?;
        let notes: Vec<Note> = expect_json(self.request(Method::GET, url, None)?)?;
        info!(count = notes.len(), "Listed notes");
        Ok(notes)
    }

    fn create(&mut self, fields: &NoteFields) -> Result<Note, ApiError> {
        let url = self.endpoint(None)?;
        expect_json(self.request(Method::POST, url, Some(fields))?)
    }

    fn update(&mut self, id: &NoteId, fields: &NoteFields) -> Result<Note, ApiError> {
        let url = self.endpoint(Some(id))?;
        expect_json(self.request(Method::PUT, url, Some(fields))?)
    }

    fn delete(&mut self, id: &NoteId) -> Result<(), ApiError> {
        let url = self.endpoint(Some(id))?;
        // whatever comes back on success is ignored
        self.request(Method::DELETE, url, None)?;
        Ok(())
    }
}
