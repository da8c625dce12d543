//! Port for the media host that stores stock item images.

use async_trait::async_trait;

use crate::domain::{ImagePublicId, ImageUpload, ImageUrl};

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// The media host could not be reached or timed out.
        Transport { message: String } => "media host request failed: {message}",
        /// The media host answered with an error.
        Rejected { status: u16, message: String } =>
            "media host rejected the request with status {status}: {message}",
        /// The media host answered with a body we could not interpret.
        Decode { message: String } => "media host response could not be decoded: {message}",
    }
}

/// Port for uploading and removing hosted images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `image` under the stock image folder and return its durable URL.
    async fn upload(&self, image: ImageUpload) -> Result<ImageUrl, ImageStoreError>;

    /// Remove a previously uploaded image. Removing an image the host no
    /// longer has succeeds.
    async fn destroy(&self, public_id: &ImagePublicId) -> Result<(), ImageStoreError>;
}
