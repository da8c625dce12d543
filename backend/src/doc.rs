//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates the stock and health endpoints together with the
//! inbound schema wrappers ([`ErrorSchema`], [`ErrorCodeSchema`]) so domain
//! types stay free of utoipa. The document backs Swagger UI in debug builds
//! and is printed by `cargo run --bin openapi-dump`.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, MessageBody};
use crate::inbound::http::stock::{StockItemBody, UserBody};
use crate::inbound::http::stock_form::{StockFieldsBody, StockFormSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Home Stock API",
        description = "Household stock tracking with optional item images.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::stock::list_stock,
        crate::inbound::http::stock::create_stock,
        crate::inbound::http::stock::get_stock,
        crate::inbound::http::stock::update_stock,
        crate::inbound::http::stock::delete_stock,
        crate::inbound::http::health::welcome,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        StockItemBody,
        UserBody,
        StockFieldsBody,
        StockFormSchema,
        MessageBody,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "stock", description = "Household stock items"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
