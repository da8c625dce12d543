//! Driving port for stock item reads.

use async_trait::async_trait;

use crate::domain::{Error, StockId, StockItem};

/// Request to fetch one stock item by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetStockRequest {
    pub id: StockId,
}

/// Driving port for stock read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockQuery: Send + Sync {
    /// Every stored item with its owner resolved.
    async fn list(&self) -> Result<Vec<StockItem>, Error>;

    /// One item, or [`crate::domain::ErrorCode::NotFound`].
    async fn get(&self, request: GetStockRequest) -> Result<StockItem, Error>;
}
