//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{stock_items, users};

/// Owner columns resolved on every stock read.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserSummaryRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Row struct for reading from the stock_items table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stock_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StockItemRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    pub expiration_date: Option<DateTime<Utc>>,
    pub added_date: DateTime<Utc>,
    pub notes: Option<String>,
    #[expect(dead_code, reason = "owner is read through the users join")]
    pub user_id: Uuid,
    pub image: Option<String>,
}

/// Insertable struct for new stock items. `id` and `added_date` come from
/// column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stock_items)]
pub(crate) struct NewStockItemRow<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub quantity: f64,
    pub unit: &'a str,
    pub expiration_date: Option<DateTime<Utc>>,
    pub notes: Option<&'a str>,
    pub user_id: Uuid,
    pub image: Option<&'a str>,
}

/// Partial update. `None` leaves a column untouched; for
/// `expiration_date`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = stock_items)]
pub(crate) struct StockItemChangeset<'a> {
    pub name: Option<&'a str>,
    pub category: Option<&'a str>,
    pub quantity: Option<f64>,
    pub unit: Option<&'a str>,
    pub expiration_date: Option<Option<DateTime<Utc>>>,
    pub notes: Option<&'a str>,
    pub user_id: Option<Uuid>,
    pub image: Option<&'a str>,
}
