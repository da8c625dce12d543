//! Route table for the stock resource.

use actix_web::web;

use crate::inbound::http::stock::{create_stock, delete_stock, get_stock, list_stock, update_stock};

/// Mount point of the stock resource.
pub const STOCK_SCOPE: &str = "/api/v1/stock";

/// Register the stock endpoints under [`STOCK_SCOPE`].
///
/// Trailing slashes are tolerated when the app is wrapped in
/// `NormalizePath::trim()`, which the server always does.
pub fn configure_stock_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(STOCK_SCOPE)
            .service(list_stock)
            .service(create_stock)
            .service(get_stock)
            .service(update_stock)
            .service(delete_stock),
    );
}
