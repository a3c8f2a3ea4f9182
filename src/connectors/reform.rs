//! Reform connector
//!
//! Reform extracts structured fields from documents or free text. Both
//! endpoints take the list of fields to extract and return the extracted
//! values as JSON.

use super::validate_base_url;
use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::types::JsonValue;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Connector name
pub const APP_NAME: &str = "reform";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.reformhq.com/v1/api";

const EXTRACT_PATH: &str = "/extract";
const EXTRACT_TEXT_PATH: &str = "/extract-text";
const FIELDS_PART: &str = "fields_to_extract";
const DOCUMENT_PART: &str = "document";

// ============================================================================
// Configuration
// ============================================================================

/// Reform credentials and endpoint settings
#[derive(Clone, Serialize, Deserialize)]
pub struct ReformConfig {
    /// API key from the Reform dashboard
    #[serde(default)]
    pub api_key: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ReformConfig {
    /// Config for the production API with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Check the config is usable
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::missing_field("reform.api_key"));
        }
        validate_base_url("reform.base_url", &self.base_url)
    }
}

impl std::fmt::Debug for ReformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReformConfig")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Documents and Fields
// ============================================================================

/// Where the document to process comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Publicly reachable file URL, downloaded before upload
    Url(String),
    /// Local file, e.g. `/tmp/invoice.pdf`
    Path(PathBuf),
}

impl FromStr for DocumentSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::invalid_value("document", "must not be empty"));
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Url(s.to_string()))
        } else {
            Ok(Self::Path(PathBuf::from(s)))
        }
    }
}

impl DocumentSource {
    /// File name sent with the upload
    pub fn file_name(&self) -> String {
        let name = match self {
            DocumentSource::Url(url) => url::Url::parse(url).ok().and_then(|u| {
                u.path_segments()
                    .and_then(|segments| segments.last().map(str::to_string))
            }),
            DocumentSource::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().to_string()),
        };
        name.filter(|n| !n.is_empty())
            .unwrap_or_else(|| "document".to_string())
    }

    /// Read the document bytes
    async fn load(&self, http: &HttpClient) -> Result<Vec<u8>> {
        match self {
            DocumentSource::Url(url) => http.download(url).await,
            DocumentSource::Path(path) => read_file(path).await,
        }
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::file_not_found(path.display().to_string()))
        }
        Err(e) => Err(Error::Io(e)),
    }
}

/// Content type for an upload, from the file extension
fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "tif" | "tiff" => "image/tiff",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// Turn raw field entries into field definitions
///
/// An entry holding a JSON object (`{"name": "total", "type": "number"}`)
/// is used as-is; any other entry is taken as a bare field name.
pub fn parse_fields(raw: &[String]) -> Result<Vec<JsonValue>> {
    raw.iter()
        .map(|entry| {
            let entry = entry.trim();
            if entry.starts_with('{') {
                let value: JsonValue = serde_json::from_str(entry).map_err(|e| {
                    Error::invalid_value("fields", format!("invalid field definition: {e}"))
                })?;
                Ok(value)
            } else if entry.is_empty() {
                Err(Error::invalid_value("fields", "empty field name"))
            } else {
                Ok(json!({ "name": entry }))
            }
        })
        .collect()
}

// ============================================================================
// App
// ============================================================================

/// Reform API client
#[derive(Debug)]
pub struct ReformApp {
    http: HttpClient,
}

impl ReformApp {
    /// Create a client with default HTTP settings
    pub fn new(config: &ReformConfig) -> Result<Self> {
        Self::with_http_config(config, HttpClientConfig::default())
    }

    /// Create a client on top of shared HTTP settings
    pub fn with_http_config(config: &ReformConfig, http: HttpClientConfig) -> Result<Self> {
        config.validate()?;

        let mut http = http;
        http.base_url = Some(config.base_url.clone());

        Ok(Self {
            http: HttpClient::with_auth(http, AuthConfig::bearer(config.api_key.clone()))?,
        })
    }

    /// Extract fields from a document (file upload)
    pub async fn extract_data_from_document(
        &self,
        document: &DocumentSource,
        fields: &[JsonValue],
    ) -> Result<JsonValue> {
        if fields.is_empty() {
            return Err(Error::invalid_value("fields", "at least one field is required"));
        }

        let file_name = document.file_name();
        let bytes = document.load(&self.http).await?;
        info!(
            "Extracting {} fields from '{}' ({} bytes)",
            fields.len(),
            file_name,
            bytes.len()
        );

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(guess_mime(&file_name))?;
        let form = Form::new()
            .part(DOCUMENT_PART, part)
            .text(FIELDS_PART, serde_json::to_string(fields)?);

        self.http.post_multipart_json(EXTRACT_PATH, form).await
    }

    /// Extract fields from plain text
    pub async fn extract_data_from_text(
        &self,
        text: &str,
        fields: &[JsonValue],
    ) -> Result<JsonValue> {
        if fields.is_empty() {
            return Err(Error::invalid_value("fields", "at least one field is required"));
        }

        debug!("Extracting {} fields from {} chars of text", fields.len(), text.len());
        self.http
            .post_json(
                EXTRACT_TEXT_PATH,
                json!({ "text": text, "fields_to_extract": fields }),
            )
            .await
    }
}
