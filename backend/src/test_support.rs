//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError, StockRepository, StockRepositoryError};
use crate::domain::{
    IMAGE_FOLDER, ImagePublicId, ImageUpload, ImageUrl, NewStock, StockId, StockItem, StockPatch,
    UserId, UserSummary,
};

/// Owner seeded into [`InMemoryStockRepository::with_sample_user`].
pub const SAMPLE_USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// Boundary used by [`multipart_body`].
pub const MULTIPART_BOUNDARY: &str = "homestock-test-boundary";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The user behind [`SAMPLE_USER_ID`].
pub fn sample_user() -> UserSummary {
    UserSummary {
        id: UserId::from_uuid(Uuid::from_u128(0x3fa8_5f64_5717_4562_b3fc_2c96_3f66_afa6)),
        name: "Ada Lovelace".to_owned(),
        email: "ada@example.com".to_owned(),
    }
}

/// Stock repository kept in memory, with the same owner checks as the
/// database: writes naming an unknown user fail with
/// [`StockRepositoryError::UnknownUser`].
#[derive(Debug, Default)]
pub struct InMemoryStockRepository {
    users: Mutex<HashMap<UserId, UserSummary>>,
    items: Mutex<Vec<StockItem>>,
}

impl InMemoryStockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository that already knows [`sample_user`].
    pub fn with_sample_user() -> Self {
        let repo = Self::new();
        repo.add_user(sample_user());
        repo
    }

    pub fn add_user(&self, user: UserSummary) {
        lock(&self.users).insert(user.id, user);
    }

    /// Snapshot of every stored item.
    pub fn items(&self) -> Vec<StockItem> {
        lock(&self.items).clone()
    }

    fn resolve(&self, id: &UserId) -> Result<UserSummary, StockRepositoryError> {
        lock(&self.users)
            .get(id)
            .cloned()
            .ok_or_else(|| StockRepositoryError::unknown_user(id.to_string()))
    }
}

#[async_trait]
impl StockRepository for InMemoryStockRepository {
    async fn create(&self, stock: &NewStock) -> Result<StockItem, StockRepositoryError> {
        let user = self.resolve(&stock.user)?;
        let item = StockItem {
            id: StockId::random(),
            name: stock.name.clone(),
            category: stock.category,
            quantity: stock.quantity,
            unit: stock.unit,
            expiration_date: stock.expiration_date,
            added_date: Utc::now(),
            notes: stock.notes.clone(),
            user,
            image: stock.image.clone(),
        };
        lock(&self.items).push(item.clone());
        Ok(item)
    }

    async fn list_all(&self) -> Result<Vec<StockItem>, StockRepositoryError> {
        Ok(self.items())
    }

    async fn find_by_id(&self, id: &StockId) -> Result<Option<StockItem>, StockRepositoryError> {
        Ok(lock(&self.items).iter().find(|item| item.id == *id).cloned())
    }

    async fn update(
        &self,
        id: &StockId,
        patch: &StockPatch,
    ) -> Result<Option<StockItem>, StockRepositoryError> {
        let owner = patch.user.as_ref().map(|user| self.resolve(user)).transpose()?;
        let mut items = lock(&self.items);
        let Some(item) = items.iter_mut().find(|item| item.id == *id) else {
            return Ok(None);
        };
        item.apply(patch.clone());
        if let Some(owner) = owner {
            item.user = owner;
        }
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: &StockId) -> Result<bool, StockRepositoryError> {
        let mut items = lock(&self.items);
        let before = items.len();
        items.retain(|item| item.id != *id);
        Ok(items.len() != before)
    }
}

/// Image store that records calls instead of talking to a media host.
#[derive(Debug, Default)]
pub struct RecordingImageStore {
    uploads: Mutex<Vec<ImageUpload>>,
    destroyed: Mutex<Vec<ImagePublicId>>,
    fail_uploads: bool,
    fail_destroys: bool,
}

impl RecordingImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every upload answers with a transport error.
    pub fn failing_uploads() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    /// Every destroy answers with a rejection.
    pub fn failing_destroys() -> Self {
        Self {
            fail_destroys: true,
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> Vec<ImageUpload> {
        lock(&self.uploads).clone()
    }

    pub fn destroyed(&self) -> Vec<ImagePublicId> {
        lock(&self.destroyed).clone()
    }
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn upload(&self, image: ImageUpload) -> Result<ImageUrl, ImageStoreError> {
        if self.fail_uploads {
            return Err(ImageStoreError::transport("media host unreachable"));
        }
        let mut uploads = lock(&self.uploads);
        uploads.push(image);
        Ok(ImageUrl::new(format!(
            "https://res.cloudinary.com/test/image/upload/v1/{IMAGE_FOLDER}/upload-{}.jpg",
            uploads.len()
        )))
    }

    async fn destroy(&self, public_id: &ImagePublicId) -> Result<(), ImageStoreError> {
        lock(&self.destroyed).push(public_id.clone());
        if self.fail_destroys {
            return Err(ImageStoreError::rejected(500_u16, "destroy failed"));
        }
        Ok(())
    }
}

/// Encode text fields and an optional `image` file as `multipart/form-data`.
///
/// Returns the `Content-Type` header value and the body.
pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    (
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        body,
    )
}
