//! HTTP upload client for the classifier service.
//!
//! This module posts a reviews file or a recorded audio clip to the
//! configured endpoint as multipart/form-data and returns the
//! plain-text label stream from the response body.

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from the upload client.
///
/// Policy for all of these: report a user-visible message and abort the
/// current operation. The client never retries automatically.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("cannot connect to classifier at {0}")]
    Connect(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("classifier returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("classifier returned an empty response body")]
    EmptyResponse,

    #[error("failed to read input file {path}: {source}")]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for the aspect classification service.
pub struct UploadClient {
    http_client: reqwest::Client,
    base_url: String,
    upload_path: String,
    audio_path: String,
    timeout_seconds: u64,
}

impl UploadClient {
    /// Creates a client for the given base URL with a request timeout.
    pub fn new(
        base_url: &str,
        upload_path: &str,
        audio_path: &str,
        timeout_seconds: u64,
    ) -> Result<Self, UploadError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            upload_path: upload_path.to_string(),
            audio_path: audio_path.to_string(),
            timeout_seconds,
        })
    }

    /// The endpoint used for text uploads.
    pub fn upload_url(&self) -> String {
        join_url(&self.base_url, &self.upload_path)
    }

    /// The endpoint used for audio uploads.
    pub fn audio_url(&self) -> String {
        join_url(&self.base_url, &self.audio_path)
    }

    /// Uploads a reviews text file and returns the label stream.
    ///
    /// The file is sent as the `file` field of a multipart form, matching
    /// what the classification server expects.
    pub async fn upload_text(&self, path: &Path) -> Result<String, UploadError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::ReadInput {
                path: path.to_path_buf(),
                source,
            })?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("reviews.txt")
            .to_string();

        info!("Uploading {} ({} bytes)", filename, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str("text/plain")?;
        let form = Form::new().part("file", part);

        self.post_labels(&self.upload_url(), form).await
    }

    /// Uploads a recorded WAV clip for server-side transcription and
    /// classification, returning the label stream.
    pub async fn upload_audio(&self, wav: Vec<u8>) -> Result<String, UploadError> {
        info!("Uploading recorded audio ({} bytes)", wav.len());

        let part = Part::bytes(wav)
            .file_name("speech.wav")
            .mime_str("audio/wav")?;
        let form = Form::new().part("audio", part);

        self.post_labels(&self.audio_url(), form).await
    }

    /// Posts a multipart form and returns the plain-text response body.
    async fn post_labels(&self, url: &str, form: Form) -> Result<String, UploadError> {
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UploadError::Timeout(self.timeout_seconds)
                } else if e.is_connect() {
                    UploadError::Connect(self.base_url.clone())
                } else {
                    UploadError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Status { status, body });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Err(UploadError::EmptyResponse);
        }

        debug!("Received {} bytes of labels", text.len());
        Ok(text)
    }
}

/// Joins a base URL and a path with exactly one slash between them.
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
