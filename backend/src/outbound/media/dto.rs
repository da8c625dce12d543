//! DTOs for decoding Cloudinary JSON responses.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct UploadResponseDto {
    pub(super) secure_url: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct DestroyResponseDto {
    pub(super) result: String,
}

impl DestroyResponseDto {
    /// `ok`, or `not found` when the image is already gone.
    pub(super) fn is_removed(&self) -> bool {
        matches!(self.result.as_str(), "ok" | "not found")
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponseDto {
    pub(super) error: ErrorDetailDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorDetailDto {
    pub(super) message: String,
}
