//! Driving port for stock item mutations.
//!
//! Inbound adapters hand over raw field text and an optional image; the
//! implementation validates, uploads, and persists.

use async_trait::async_trait;

use crate::domain::{Error, ImageUpload, StockDraft, StockId, StockItem};

/// Request to create a stock item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStockRequest {
    pub draft: StockDraft,
    pub image: Option<ImageUpload>,
}

/// Request to update a stock item with the supplied fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStockRequest {
    pub id: StockId,
    pub draft: StockDraft,
    pub image: Option<ImageUpload>,
}

/// Request to delete a stock item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteStockRequest {
    pub id: StockId,
}

/// Driving port for stock write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockCommand: Send + Sync {
    /// Validate, upload the optional image, and persist a new item.
    ///
    /// Nothing is uploaded when validation fails.
    async fn create(&self, request: CreateStockRequest) -> Result<StockItem, Error>;

    /// Merge the supplied fields into an existing item, replacing its image
    /// when one is provided.
    async fn update(&self, request: UpdateStockRequest) -> Result<StockItem, Error>;

    /// Delete an item and release its hosted image.
    async fn delete(&self, request: DeleteStockRequest) -> Result<(), Error>;
}
