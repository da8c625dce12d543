//! Stock item HTTP handlers.
//!
//! ```text
//! GET    /api/v1/stock        List every stock item
//! POST   /api/v1/stock        Create a stock item (multipart or JSON)
//! GET    /api/v1/stock/{id}   Fetch one stock item
//! PATCH  /api/v1/stock/{id}   Update supplied fields, optionally replacing the image
//! DELETE /api/v1/stock/{id}   Delete a stock item and its image
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::{
    CreateStockRequest, DeleteStockRequest, GetStockRequest, UpdateStockRequest,
};
use crate::domain::{Error, STOCK_NOT_FOUND, StockId, StockItem, UserSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, MessageBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::stock_form::{StockFieldsBody, StockFormSchema, read_stock_form};

/// Message returned after a successful delete.
pub const STOCK_DELETED: &str = "Stock item deleted successfully";

/// Owning user as returned on reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
}

impl From<UserSummary> for UserBody {
    fn from(value: UserSummary) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            email: value.email,
        }
    }
}

/// Stock item response payload.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockItemBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(example = "Apples")]
    pub name: String,
    #[schema(example = "Fruits")]
    pub category: String,
    #[schema(example = 5.0)]
    pub quantity: f64,
    #[schema(example = "kg")]
    pub unit: String,
    #[schema(format = "date-time")]
    pub expiration_date: Option<String>,
    #[schema(format = "date-time")]
    pub added_date: String,
    pub notes: Option<String>,
    pub user: UserBody,
    #[schema(format = "uri")]
    pub image: Option<String>,
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<StockItem> for StockItemBody {
    fn from(value: StockItem) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.into(),
            category: value.category.to_string(),
            quantity: value.quantity.value(),
            unit: value.unit.to_string(),
            expiration_date: value.expiration_date.map(timestamp),
            added_date: timestamp(value.added_date),
            notes: value.notes,
            user: value.user.into(),
            image: value.image.map(String::from),
        }
    }
}

/// Resolve a path segment to an identifier. Text that cannot be an
/// identifier names no stored item.
fn parse_stock_id(raw: &str) -> Result<StockId, Error> {
    StockId::parse(raw).ok_or_else(|| Error::not_found(STOCK_NOT_FOUND))
}

fn reject(state: &HttpState, summary: &str) -> impl FnOnce(Error) -> Error {
    let policy = state.error_policy;
    let summary = summary.to_owned();
    move |error| policy.apply(error.summarised(summary))
}

/// List every stock item with its owner resolved.
#[utoipa::path(
    get,
    path = "/api/v1/stock",
    responses(
        (status = 200, description = "Stock items", body = [StockItemBody]),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["stock"],
    operation_id = "listStock"
)]
#[get("")]
pub async fn list_stock(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<StockItemBody>>> {
    let items = state
        .stock_query
        .list()
        .await
        .map_err(reject(&state, "Error fetching stock"))?;
    Ok(web::Json(items.into_iter().map(StockItemBody::from).collect()))
}

/// Create a stock item, uploading the optional `image` part first.
#[utoipa::path(
    post,
    path = "/api/v1/stock",
    request_body(content(
        (StockFormSchema = "multipart/form-data"),
        (StockFieldsBody = "application/json")
    )),
    responses(
        (status = 201, description = "Stock item created", body = StockItemBody),
        (status = 400, description = "Invalid stock fields", body = ErrorSchema),
        (status = 413, description = "Request body too large", body = ErrorSchema),
        (status = 500, description = "Store or media host failure", body = ErrorSchema)
    ),
    tags = ["stock"],
    operation_id = "createStock"
)]
#[post("")]
pub async fn create_stock(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let summary = "Error creating stock item";
    let form = read_stock_form(&req, payload, state.max_body_bytes)
        .await
        .map_err(reject(&state, summary))?;
    let item = state
        .stock_commands
        .create(CreateStockRequest {
            draft: form.draft,
            image: form.image,
        })
        .await
        .map_err(reject(&state, summary))?;
    Ok(HttpResponse::Created().json(StockItemBody::from(item)))
}

/// Fetch one stock item.
#[utoipa::path(
    get,
    path = "/api/v1/stock/{id}",
    params(("id" = String, Path, description = "Stock item identifier")),
    responses(
        (status = 200, description = "Stock item", body = StockItemBody),
        (status = 404, description = "Stock item not found", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["stock"],
    operation_id = "getStock"
)]
#[get("/{id}")]
pub async fn get_stock(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<StockItemBody>> {
    let summary = "Error fetching stock item";
    let id = parse_stock_id(&path).map_err(reject(&state, summary))?;
    let item = state
        .stock_query
        .get(GetStockRequest { id })
        .await
        .map_err(reject(&state, summary))?;
    Ok(web::Json(item.into()))
}

/// Update the supplied fields of a stock item.
#[utoipa::path(
    patch,
    path = "/api/v1/stock/{id}",
    params(("id" = String, Path, description = "Stock item identifier")),
    request_body(content(
        (StockFormSchema = "multipart/form-data"),
        (StockFieldsBody = "application/json")
    )),
    responses(
        (status = 200, description = "Updated stock item", body = StockItemBody),
        (status = 400, description = "Invalid stock fields", body = ErrorSchema),
        (status = 404, description = "Stock item not found", body = ErrorSchema),
        (status = 413, description = "Request body too large", body = ErrorSchema),
        (status = 500, description = "Store or media host failure", body = ErrorSchema)
    ),
    tags = ["stock"],
    operation_id = "updateStock"
)]
#[patch("/{id}")]
pub async fn update_stock(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<web::Json<StockItemBody>> {
    let summary = "Error updating stock item";
    let id = parse_stock_id(&path).map_err(reject(&state, summary))?;
    let form = read_stock_form(&req, payload, state.max_body_bytes)
        .await
        .map_err(reject(&state, summary))?;
    let item = state
        .stock_commands
        .update(UpdateStockRequest {
            id,
            draft: form.draft,
            image: form.image,
        })
        .await
        .map_err(reject(&state, summary))?;
    Ok(web::Json(item.into()))
}

/// Delete a stock item. Removing its hosted image is best-effort.
#[utoipa::path(
    delete,
    path = "/api/v1/stock/{id}",
    params(("id" = String, Path, description = "Stock item identifier")),
    responses(
        (status = 200, description = "Stock item deleted", body = MessageBody),
        (status = 404, description = "Stock item not found", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["stock"],
    operation_id = "deleteStock"
)]
#[delete("/{id}")]
pub async fn delete_stock(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageBody>> {
    let summary = "Error deleting stock item";
    let id = parse_stock_id(&path).map_err(reject(&state, summary))?;
    state
        .stock_commands
        .delete(DeleteStockRequest { id })
        .await
        .map_err(reject(&state, summary))?;
    Ok(web::Json(MessageBody::new(STOCK_DELETED)))
}

#[cfg(test)]
#[path = "stock_tests.rs"]
mod tests;
