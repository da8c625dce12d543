//! Reqwest-backed Cloudinary image store.
//!
//! Owns transport details only: request signing, endpoint construction,
//! timeout and HTTP error mapping, and JSON decoding.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::{DestroyResponseDto, ErrorResponseDto, UploadResponseDto};
use super::signature::{SignatureAlgorithm, sign};
use crate::domain::ports::{ImageStore, ImageStoreError};
use crate::domain::{IMAGE_FOLDER, ImagePublicId, ImageUpload, ImageUrl};

/// Default API host.
pub const DEFAULT_CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com";

const DEFAULT_FILENAME: &str = "upload";

/// Account credentials. All three values are required.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryCredentials {
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl std::fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Reasons the adapter cannot be built.
#[derive(Debug, thiserror::Error)]
pub enum CloudinaryConfigError {
    #[error("cloudinary {field} is missing")]
    MissingCredential { field: &'static str },
    #[error("invalid cloudinary endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl CloudinaryCredentials {
    /// Validate that no credential is blank.
    ///
    /// # Errors
    ///
    /// Returns [`CloudinaryConfigError::MissingCredential`] naming the first
    /// blank value.
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, CloudinaryConfigError> {
        let credentials = Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        };
        for (field, value) in [
            ("cloud name", &credentials.cloud_name),
            ("API key", &credentials.api_key),
            ("API secret", &credentials.api_secret),
        ] {
            if value.trim().is_empty() {
                return Err(CloudinaryConfigError::MissingCredential { field });
            }
        }
        Ok(credentials)
    }

    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }
}

/// Image store that signs requests against a Cloudinary-compatible API.
pub struct CloudinaryImageStore {
    client: Client,
    upload_url: Url,
    destroy_url: Url,
    credentials: CloudinaryCredentials,
    algorithm: SignatureAlgorithm,
}

impl CloudinaryImageStore {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoints cannot be derived from `base_url`
    /// or the reqwest client cannot be constructed.
    pub fn new(
        base_url: &Url,
        credentials: CloudinaryCredentials,
        algorithm: SignatureAlgorithm,
        timeout: Duration,
    ) -> Result<Self, CloudinaryConfigError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            upload_url: endpoint(base_url, credentials.cloud_name(), "upload")?,
            destroy_url: endpoint(base_url, credentials.cloud_name(), "destroy")?,
            credentials,
            algorithm,
        })
    }

    fn signed(&self, params: &[(&str, &str)]) -> String {
        sign(params, &self.credentials.api_secret, self.algorithm)
    }
}

/// `{base}/v1_1/{cloud}/image/{action}`, keeping any path prefix on `base`.
fn endpoint(base: &Url, cloud_name: &str, action: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(&format!("v1_1/{cloud_name}/image/{action}"))
}

fn unix_timestamp() -> String {
    Utc::now().timestamp().to_string()
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    async fn upload(&self, image: ImageUpload) -> Result<ImageUrl, ImageStoreError> {
        let timestamp = unix_timestamp();
        let signature = self.signed(&[("folder", IMAGE_FOLDER), ("timestamp", &timestamp)]);
        let ImageUpload {
            bytes,
            filename,
            content_type,
        } = image;
        let size = bytes.len();
        let file = Part::bytes(bytes).file_name(filename.unwrap_or_else(|| DEFAULT_FILENAME.to_owned()));
        let file = match content_type {
            Some(mime) => file.mime_str(&mime).map_err(|error| {
                ImageStoreError::transport(format!("invalid image content type {mime:?}: {error}"))
            })?,
            None => file,
        };
        let form = Form::new()
            .text("api_key", self.credentials.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", IMAGE_FOLDER)
            .text("signature", signature)
            .part("file", file);

        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded: UploadResponseDto = serde_json::from_slice(&body).map_err(|error| {
            ImageStoreError::decode(format!("invalid upload response: {error}"))
        })?;
        debug!(size, url = %decoded.secure_url, "image uploaded");
        Ok(ImageUrl::new(decoded.secure_url))
    }

    async fn destroy(&self, public_id: &ImagePublicId) -> Result<(), ImageStoreError> {
        let timestamp = unix_timestamp();
        let signature = self.signed(&[("public_id", public_id.as_str()), ("timestamp", &timestamp)]);

        let response = self
            .client
            .post(self.destroy_url.clone())
            .form(&[
                ("public_id", public_id.as_str()),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.credentials.api_key.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded: DestroyResponseDto = serde_json::from_slice(&body).map_err(|error| {
            ImageStoreError::decode(format!("invalid destroy response: {error}"))
        })?;
        if !decoded.is_removed() {
            return Err(ImageStoreError::rejected(status.as_u16(), decoded.result));
        }
        debug!(%public_id, result = decoded.result.as_str(), "image destroyed");
        Ok(())
    }
}

fn map_transport_error(error: reqwest::Error) -> ImageStoreError {
    if error.is_timeout() {
        ImageStoreError::transport(format!("request timed out: {error}"))
    } else {
        ImageStoreError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ImageStoreError {
    let message = serde_json::from_slice::<ErrorResponseDto>(body)
        .map(|dto| dto.error.message)
        .unwrap_or_else(|_| body_preview(body));
    ImageStoreError::rejected(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
