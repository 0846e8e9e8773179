// API client module: a small blocking HTTP client for the Pinata REST API.
// Every call is a single request; nothing is retried or cached.

use crate::config::Config;
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error occurred: {status} - {body}")]
    Http { status: StatusCode, body: String },

    #[error("An error occurred")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response from Pinata: {0}")]
    UnexpectedResponse(String),

    #[error("failed to parse response")]
    Json(#[from] serde_json::Error),

    #[error("failed to open {}", path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("stored token cannot be sent as an Authorization header, run setup again")]
    InvalidToken,
}

/// A file record as returned by the v3 files API. Every field is optional:
/// the service omits or nulls fields freely and partial data is still
/// worth showing. Fields are only ever displayed, so scalars of any JSON
/// type are kept as their text form.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FileRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub cid: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub group_id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub size: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub number_of_files: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub mime_type: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "lenient_map")]
    pub keyvalues: Option<BTreeMap<String, Value>>,
}

/// null becomes `None`; strings are taken as-is; anything else keeps its
/// JSON text.
fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Only a JSON object counts as key-value metadata.
fn lenient_map<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<BTreeMap<String, Value>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Object(map) => Some(map.into_iter().collect()),
        _ => None,
    })
}

/// Body of `PUT /v3/files/{id}`.
#[derive(Serialize, Debug)]
pub struct UpdateFileRequest<'a> {
    pub name: &'a str,
    pub keyvalues: BTreeMap<String, String>,
}

#[derive(Deserialize, Debug)]
struct AuthTestResponse {
    message: Option<String>,
}

/// Blocking client holding the HTTP connection pool, both base URLs and
/// the bearer token sent on every request.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    api_url: Url,
    uploads_url: Url,
    token: String,
}

impl ApiClient {
    pub fn new(config: &Config, token: &str) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(ApiClient {
            client,
            api_url: config.api_url.clone(),
            uploads_url: config.uploads_url.clone(),
            token: token.trim().to_string(),
        })
    }

    /// Authorization header map for the stored token.
    fn auth_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        let val = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| ApiError::InvalidToken)?;
        headers.insert(AUTHORIZATION, val);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Append path segments to a base URL, percent-encoding each one.
    fn endpoint(base: &Url, segments: &[&str]) -> Url {
        let mut url = base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn file_url(&self, id: &str) -> Url {
        Self::endpoint(&self.api_url, &["v3", "files", id])
    }

    /// Attach auth headers, send, and turn a non-2xx status into
    /// `ApiError::Http` carrying the response body.
    fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let res = req.headers(self.auth_headers()?).send()?;
        let status = res.status();
        tracing::debug!(%status, url = %res.url(), "response received");
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(ApiError::Http { status, body });
        }
        Ok(res)
    }

    /// GET /data/testAuthentication and return the service's message.
    pub fn test_authentication(&self) -> Result<String, ApiError> {
        let url = Self::endpoint(&self.api_url, &["data", "testAuthentication"]);
        let body = self.send(self.client.get(url))?.text()?;
        match serde_json::from_str::<AuthTestResponse>(&body) {
            Ok(AuthTestResponse { message: Some(m) }) => Ok(m),
            _ => Ok(body),
        }
    }

    /// Upload a local file as multipart/form-data. The base name is used
    /// both as the part's filename and as the record's display name.
    pub fn upload_file(&self, file_path: &Path) -> Result<FileRecord, ApiError> {
        let file = File::open(file_path).map_err(|source| ApiError::File {
            path: file_path.to_path_buf(),
            source,
        })?;
        let file_name = file_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        let part = multipart::Part::reader(file).file_name(file_name.clone());
        let form = multipart::Form::new()
            .text("name", file_name)
            .part("file", part);

        let url = Self::endpoint(&self.uploads_url, &["v3", "files"]);
        tracing::debug!(%url, path = %file_path.display(), "uploading file");
        let body = self.send(self.client.post(url).multipart(form))?.text()?;
        extract_record(&body)
    }

    /// GET /v3/files. Expects `{"data": {"files": [...]}}`; any other shape
    /// is returned as `UnexpectedResponse` with the raw body.
    pub fn list_files(&self) -> Result<Vec<FileRecord>, ApiError> {
        let url = Self::endpoint(&self.api_url, &["v3", "files"]);
        let body = self.send(self.client.get(url))?.text()?;
        parse_file_list(&body)
    }

    /// GET /v3/files/{id}. A response without a `data` object yields an
    /// empty record rather than an error.
    pub fn get_file(&self, id: &str) -> Result<FileRecord, ApiError> {
        let body = self.send(self.client.get(self.file_url(id)))?.text()?;
        extract_record(&body)
    }

    /// PUT /v3/files/{id} with a new name and an empty key-value map.
    pub fn update_file(&self, id: &str, name: &str) -> Result<(), ApiError> {
        let payload = UpdateFileRequest {
            name,
            keyvalues: BTreeMap::new(),
        };
        self.send(self.client.put(self.file_url(id)).json(&payload))?;
        Ok(())
    }

    /// DELETE /v3/files/{id}. Confirmation is the caller's job.
    pub fn delete_file(&self, id: &str) -> Result<(), ApiError> {
        self.send(self.client.delete(self.file_url(id)))?;
        Ok(())
    }
}

/// Pull `data.files` out of a listing response.
pub fn parse_file_list(body: &str) -> Result<Vec<FileRecord>, ApiError> {
    let json: Value =
        serde_json::from_str(body).map_err(|_| ApiError::UnexpectedResponse(body.to_string()))?;
    match json.pointer("/data/files") {
        Some(files @ Value::Array(_)) => Ok(serde_json::from_value(files.clone())?),
        _ => {
            tracing::warn!("listing response has no data.files array");
            Err(ApiError::UnexpectedResponse(body.to_string()))
        }
    }
}

/// Pull the `data` object out of a single-record response.
pub fn extract_record(body: &str) -> Result<FileRecord, ApiError> {
    let json: Value = serde_json::from_str(body)?;
    match json.get("data") {
        Some(data @ Value::Object(_)) => Ok(serde_json::from_value(data.clone())?),
        _ => Ok(FileRecord::default()),
    }
}
