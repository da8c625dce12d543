//! Stock item images held by the media host.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Folder on the media host that owns every stock image.
pub const IMAGE_FOLDER: &str = "homestock";

/// Public URL of a hosted image, as returned by the media host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageUrl(String);

impl ImageUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Identifier the media host needs to destroy this image, if the URL
    /// names one.
    pub fn public_id(&self) -> Option<ImagePublicId> {
        ImagePublicId::from_url(self)
    }
}

impl AsRef<str> for ImageUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ImageUrl> for String {
    fn from(value: ImageUrl) -> Self {
        value.0
    }
}

/// Media host identifier of an image: `<folder>/<file stem>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImagePublicId(String);

impl ImagePublicId {
    /// Derive the public id from a hosted image URL.
    ///
    /// The last path segment is cut at its first `.` and prefixed with the
    /// image folder. `None` when the text is not an absolute URL or its path
    /// ends without a file name.
    ///
    /// # Examples
    /// ```
    /// use homestock::domain::{ImagePublicId, ImageUrl};
    ///
    /// let url = ImageUrl::new("https://res.cloudinary.com/demo/image/upload/v1/homestock/abc123.jpg");
    /// let public_id = ImagePublicId::from_url(&url).expect("hosted image URL");
    /// assert_eq!(public_id.as_str(), "homestock/abc123");
    /// ```
    pub fn from_url(url: &ImageUrl) -> Option<Self> {
        let parsed = Url::parse(url.as_str()).ok()?;
        let segment = parsed.path_segments().and_then(Iterator::last)?;
        let stem = segment.split('.').next().filter(|stem| !stem.is_empty())?;
        Some(Self(format!("{IMAGE_FOLDER}/{stem}")))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImagePublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Image bytes received from a client, ready for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            filename: None,
            content_type: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Image payloads can be megabytes; keep them out of logs.
impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("len", &self.bytes.len())
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .finish()
    }
}
