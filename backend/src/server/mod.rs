//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, ServerConfig, SettingsError};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::NormalizePath;
use actix_web::{App, HttpServer, web};

use homestock::Trace;
#[cfg(debug_assertions)]
use homestock::doc::ApiDoc;
use homestock::domain::ports::{ImageStore, StockRepository};
use homestock::inbound::http::cors::CorsPolicy;
use homestock::inbound::http::health::{HealthState, live, ready, welcome};
use homestock::inbound::http::routes::configure_stock_routes;
use homestock::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cors: CorsPolicy,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        cors,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .wrap(NormalizePath::trim())
        .wrap(cors.middleware())
        .configure(configure_stock_routes)
        .service(welcome)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server around the stock adapters.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server<R, I>(
    health_state: web::Data<HealthState>,
    config: &ServerConfig,
    stock_repo: Arc<R>,
    images: Arc<I>,
) -> std::io::Result<Server>
where
    R: StockRepository + 'static,
    I: ImageStore + 'static,
{
    let server_health_state = health_state.clone();
    let http_state = build_http_state(config, stock_repo, images);
    let cors = config.cors.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            cors: cors.clone(),
        })
    })
    .bind(config.bind_addr())?
    .run();

    health_state.mark_ready();
    Ok(server)
}
