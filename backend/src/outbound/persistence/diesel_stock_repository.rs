//! PostgreSQL-backed `StockRepository` implementation using Diesel ORM.
//!
//! Every read joins `users` so items come back with their owner resolved.
//! Identifier and `added_date` are assigned by column defaults.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{StockRepository, StockRepositoryError};
use crate::domain::{
    ImageUrl, NewStock, Quantity, StockId, StockItem, StockName, StockPatch, StockValidationError,
    UserId, UserSummary,
};

use super::diesel_basic_error_mapping::{
    ConstraintKind, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewStockItemRow, StockItemChangeset, StockItemRow, UserSummaryRow};
use super::pool::{DbPool, PoolError};
use super::schema::{stock_items, users};

/// Diesel-backed implementation of the [`StockRepository`] port.
#[derive(Clone)]
pub struct DieselStockRepository {
    pool: DbPool,
}

impl DieselStockRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StockRepositoryError {
    map_basic_pool_error(error, |message| StockRepositoryError::connection(message))
}

/// Foreign key rejections name an unknown owner; other rule violations are
/// reported as constraint failures.
fn map_diesel_error(error: diesel::result::Error) -> StockRepositoryError {
    match constraint_violation(&error) {
        Some((ConstraintKind::ForeignKey, message)) => StockRepositoryError::unknown_user(message),
        Some((ConstraintKind::Row, message)) => StockRepositoryError::constraint(message),
        None => map_basic_diesel_error(
            error,
            |message| StockRepositoryError::query(message),
            |message| StockRepositoryError::connection(message),
        ),
    }
}

type JoinedRow = (StockItemRow, UserSummaryRow);

/// Convert a joined row into a domain item. Rows written outside this
/// service that fail validation are reported as query errors.
fn row_to_item((row, owner): JoinedRow) -> Result<StockItem, StockRepositoryError> {
    let id = row.id;
    let invalid = |err: StockValidationError| {
        StockRepositoryError::query(format!("stored stock item {id} is invalid: {err}"))
    };

    Ok(StockItem {
        id: StockId::from_uuid(id),
        name: StockName::new(row.name).map_err(invalid)?,
        category: row.category.parse().map_err(invalid)?,
        quantity: Quantity::new(row.quantity).map_err(invalid)?,
        unit: row.unit.parse().map_err(invalid)?,
        expiration_date: row.expiration_date,
        added_date: row.added_date,
        notes: row.notes,
        user: UserSummary {
            id: UserId::from_uuid(owner.id),
            name: owner.name,
            email: owner.email,
        },
        image: row.image.map(ImageUrl::new),
    })
}

fn new_row(stock: &NewStock) -> NewStockItemRow<'_> {
    NewStockItemRow {
        name: stock.name.as_ref(),
        category: stock.category.as_str(),
        quantity: stock.quantity.value(),
        unit: stock.unit.as_str(),
        expiration_date: stock.expiration_date,
        notes: stock.notes.as_deref(),
        user_id: *stock.user.as_uuid(),
        image: stock.image.as_ref().map(ImageUrl::as_str),
    }
}

fn changeset(patch: &StockPatch) -> StockItemChangeset<'_> {
    StockItemChangeset {
        name: patch.name.as_ref().map(|name| name.as_ref()),
        category: patch.category.map(|category| category.as_str()),
        quantity: patch.quantity.map(Quantity::value),
        unit: patch.unit.map(|unit| unit.as_str()),
        expiration_date: patch.expiration_date,
        notes: patch.notes.as_deref(),
        user_id: patch.user.map(|user| *user.as_uuid()),
        image: patch.image.as_ref().map(ImageUrl::as_str),
    }
}

async fn load_item(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> Result<Option<StockItem>, StockRepositoryError> {
    let row: Option<JoinedRow> = stock_items::table
        .inner_join(users::table)
        .filter(stock_items::id.eq(id))
        .select((StockItemRow::as_select(), UserSummaryRow::as_select()))
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

    row.map(row_to_item).transpose()
}

#[async_trait]
impl StockRepository for DieselStockRepository {
    async fn create(&self, stock: &NewStock) -> Result<StockItem, StockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id: Uuid = diesel::insert_into(stock_items::table)
            .values(&new_row(stock))
            .returning(stock_items::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        load_item(&mut conn, id)
            .await?
            .ok_or_else(|| {
                StockRepositoryError::query(format!("stock item {id} vanished after insert"))
            })
    }

    async fn list_all(&self) -> Result<Vec<StockItem>, StockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<JoinedRow> = stock_items::table
            .inner_join(users::table)
            .order((stock_items::added_date.asc(), stock_items::id.asc()))
            .select((StockItemRow::as_select(), UserSummaryRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_item).collect()
    }

    async fn find_by_id(&self, id: &StockId) -> Result<Option<StockItem>, StockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_item(&mut conn, *id.as_uuid()).await
    }

    async fn update(
        &self,
        id: &StockId,
        patch: &StockPatch,
    ) -> Result<Option<StockItem>, StockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Diesel refuses an UPDATE with no columns.
        if !patch.is_empty() {
            let updated = diesel::update(stock_items::table.find(*id.as_uuid()))
                .set(&changeset(patch))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
            if updated == 0 {
                return Ok(None);
            }
        }

        load_item(&mut conn, *id.as_uuid()).await
    }

    async fn delete(&self, id: &StockId) -> Result<bool, StockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(stock_items::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
