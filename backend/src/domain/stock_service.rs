//! Stock domain service.
//!
//! Implements the stock driving ports over a [`StockRepository`] and an
//! [`ImageStore`]. Uploads happen only after validation succeeds, and images
//! that end up unreferenced are destroyed best-effort: failures are logged and
//! never fail the request.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    CreateStockRequest, DeleteStockRequest, GetStockRequest, ImageStore, ImageStoreError,
    StockCommand, StockQuery, StockRepository, StockRepositoryError, UpdateStockRequest,
};
use crate::domain::{
    Error, ImageUpload, ImageUrl, NewStock, StockId, StockItem, StockPatch, StockValidationError,
};

/// Message returned whenever an identifier names no stored item.
pub const STOCK_NOT_FOUND: &str = "Stock item not found";

fn not_found() -> Error {
    Error::not_found(STOCK_NOT_FOUND)
}

fn map_validation_error(error: StockValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

fn map_repository_error(error: StockRepositoryError) -> Error {
    match error {
        StockRepositoryError::UnknownUser { .. } => Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "user", "code": "unknown_user" })),
        StockRepositoryError::Constraint { .. } => Error::invalid_request(error.to_string())
            .with_details(json!({ "code": "constraint_violation" })),
        StockRepositoryError::Connection { .. } | StockRepositoryError::Query { .. } => {
            Error::internal(error.to_string())
        }
    }
}

fn map_image_error(error: ImageStoreError) -> Error {
    Error::internal(error.to_string())
}

/// Stock service implementing the command and query driving ports.
#[derive(Clone)]
pub struct StockService<R, I> {
    stock_repo: Arc<R>,
    images: Arc<I>,
}

impl<R, I> StockService<R, I> {
    /// Create a service over the given repository and image store.
    pub fn new(stock_repo: Arc<R>, images: Arc<I>) -> Self {
        Self { stock_repo, images }
    }
}

impl<R, I> StockService<R, I>
where
    R: StockRepository,
    I: ImageStore,
{
    async fn upload(&self, image: Option<ImageUpload>) -> Result<Option<ImageUrl>, Error> {
        let Some(image) = image else {
            return Ok(None);
        };
        let url = self.images.upload(image).await.map_err(map_image_error)?;
        info!(image = %url, "uploaded stock image");
        Ok(Some(url))
    }

    async fn discard_image(&self, url: &ImageUrl, reason: &'static str) {
        let Some(public_id) = url.public_id() else {
            warn!(image = %url, reason, "stock image URL names no public id");
            return;
        };
        if let Err(error) = self.images.destroy(&public_id).await {
            warn!(%public_id, %error, reason, "failed to remove stock image");
        }
    }

    async fn existing(&self, id: &StockId) -> Result<StockItem, Error> {
        self.stock_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(not_found)
    }
}

#[async_trait]
impl<R, I> StockCommand for StockService<R, I>
where
    R: StockRepository,
    I: ImageStore,
{
    async fn create(&self, request: CreateStockRequest) -> Result<StockItem, Error> {
        let stock = NewStock::try_from(request.draft).map_err(map_validation_error)?;
        let image = self.upload(request.image).await?;

        match self.stock_repo.create(&stock.with_image(image.clone())).await {
            Ok(item) => Ok(item),
            Err(error) => {
                if let Some(url) = &image {
                    self.discard_image(url, "create failed").await;
                }
                Err(map_repository_error(error))
            }
        }
    }

    async fn update(&self, request: UpdateStockRequest) -> Result<StockItem, Error> {
        let UpdateStockRequest { id, draft, image } = request;
        let current = self.existing(&id).await?;
        let patch = StockPatch::try_from(draft).map_err(map_validation_error)?;
        let replacement = self.upload(image).await?;

        match self
            .stock_repo
            .update(&id, &patch.with_image(replacement.clone()))
            .await
        {
            Ok(Some(item)) => {
                if let (Some(old), Some(new)) = (&current.image, &replacement) {
                    if old != new {
                        self.discard_image(old, "image replaced").await;
                    }
                }
                Ok(item)
            }
            Ok(None) => {
                if let Some(url) = &replacement {
                    self.discard_image(url, "item vanished during update").await;
                }
                Err(not_found())
            }
            Err(error) => {
                if let Some(url) = &replacement {
                    self.discard_image(url, "update failed").await;
                }
                Err(map_repository_error(error))
            }
        }
    }

    async fn delete(&self, request: DeleteStockRequest) -> Result<(), Error> {
        let current = self.existing(&request.id).await?;
        let deleted = self
            .stock_repo
            .delete(&request.id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(not_found());
        }
        if let Some(url) = &current.image {
            self.discard_image(url, "item deleted").await;
        }
        Ok(())
    }
}

#[async_trait]
impl<R, I> StockQuery for StockService<R, I>
where
    R: StockRepository,
    I: ImageStore,
{
    async fn list(&self) -> Result<Vec<StockItem>, Error> {
        self.stock_repo
            .list_all()
            .await
            .map_err(map_repository_error)
    }

    async fn get(&self, request: GetStockRequest) -> Result<StockItem, Error> {
        self.existing(&request.id).await
    }
}

#[cfg(test)]
#[path = "stock_service_tests.rs"]
mod tests;
