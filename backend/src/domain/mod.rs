//! Domain primitives, ports, and services.
//!
//! Purpose: define the strongly typed stock entity, the ports that inbound and
//! outbound adapters meet at, and the service that orchestrates them. Nothing
//! here depends on HTTP, SQL, or the media host wire format.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - StockItem and its validated inputs (`NewStock`, `StockPatch`).
//! - StockService: implements the stock driving ports.
//! - TraceId: request correlation identifier.

pub mod error;
mod image;
pub mod ports;
mod stock;
mod stock_service;
mod trace_id;
mod user;

pub use self::error::{Error, ErrorCode};
pub use self::image::{IMAGE_FOLDER, ImagePublicId, ImageUpload, ImageUrl};
pub use self::stock::{
    Category, NewStock, Quantity, StockDraft, StockId, StockItem, StockName, StockPatch,
    StockValidationError, Unit, parse_stock_date,
};
pub use self::stock_service::{STOCK_NOT_FOUND, StockService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserSummary, UserValidationError};

/// Convenient result alias for handlers and services.
///
/// # Examples
/// ```
/// use homestock::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("Stock item not found"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
