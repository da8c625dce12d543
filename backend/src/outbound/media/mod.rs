//! Media host adapters.
//!
//! Provides the Cloudinary implementation of the `ImageStore` port.

mod cloudinary;
mod dto;
mod signature;

pub use cloudinary::{
    CloudinaryConfigError, CloudinaryCredentials, CloudinaryImageStore,
    DEFAULT_CLOUDINARY_BASE_URL,
};
pub use signature::{SignatureAlgorithm, UnknownSignatureAlgorithm, sign};
