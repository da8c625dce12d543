//! Builders wiring outbound adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use homestock::domain::StockService;
use homestock::domain::ports::{ImageStore, StockRepository};
use homestock::inbound::http::state::HttpState;

use super::ServerConfig;

/// Build the HTTP state around one [`StockService`] serving both the command
/// and the query port.
pub(crate) fn build_http_state<R, I>(
    config: &ServerConfig,
    stock_repo: Arc<R>,
    images: Arc<I>,
) -> web::Data<HttpState>
where
    R: StockRepository + 'static,
    I: ImageStore + 'static,
{
    let service = Arc::new(StockService::new(stock_repo, images));
    web::Data::new(
        HttpState::new(service.clone(), service)
            .with_error_policy(config.error_policy)
            .with_max_body_bytes(config.max_body_bytes),
    )
}
