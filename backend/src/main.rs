//! HomeStock entry point: loads settings, prepares the database and media
//! adapters, and serves the REST API.

mod server;

use std::process::ExitCode;
use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use homestock::inbound::http::health::HealthState;
use homestock::outbound::media::{CloudinaryConfigError, CloudinaryImageStore};
use homestock::outbound::persistence::{
    DbPool, DieselStockRepository, MigrationError, PoolError, run_pending_migrations,
};
use server::{AppSettings, SettingsError, create_server};

/// Reasons the process cannot start or keep serving.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("failed to load settings: {0}")]
    Config(String),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Migrations(#[from] MigrationError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Media(#[from] CloudinaryConfigError),
    #[error("HTTP server failed: {0}")]
    Server(#[from] std::io::Error),
}

async fn run(settings: AppSettings) -> Result<(), StartupError> {
    let database_url = settings.database_url()?;
    let media = settings.media()?;
    let config = settings.server_config();

    if settings.run_migrations() {
        run_pending_migrations(database_url).await?;
    }
    let pool = DbPool::new(settings.pool_config()?).await?;
    let images = CloudinaryImageStore::new(
        &media.base_url,
        media.credentials,
        media.algorithm,
        media.timeout,
    )?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        &config,
        Arc::new(DieselStockRepository::new(pool)),
        Arc::new(images),
    )?;
    info!(addr = %config.bind_addr(), "listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.map_err(StartupError::from)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let outcome = match AppSettings::load() {
        Ok(settings) => run(settings).await,
        Err(err) => Err(StartupError::Config(err.to_string())),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "homestock stopped");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    //! Startup failures must stop the process before it serves anything.
    use rstest::{fixture, rstest};

    use super::*;

    const UNREACHABLE_DATABASE: &str = "postgres://homestock@127.0.0.1:1/homestock";

    #[fixture]
    fn settings() -> AppSettings {
        AppSettings {
            database_url: Some(UNREACHABLE_DATABASE.to_owned()),
            cloudinary_cloud_name: Some("demo".to_owned()),
            cloudinary_api_key: Some("key".to_owned()),
            cloudinary_api_secret: Some("secret".to_owned()),
            db_connect_timeout_secs: Some(1),
            port: Some(0),
            ..AppSettings::default()
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_database_url_stops_startup(settings: AppSettings) {
        let settings = AppSettings {
            database_url: None,
            ..settings
        };

        let outcome = run(settings).await;

        assert!(matches!(
            outcome,
            Err(StartupError::Settings(SettingsError::MissingDatabaseUrl))
        ));
    }

    #[rstest]
    #[actix_web::test]
    async fn incomplete_media_credentials_stop_startup(settings: AppSettings) {
        let settings = AppSettings {
            cloudinary_api_secret: None,
            ..settings
        };

        let outcome = run(settings).await;

        assert!(matches!(
            outcome,
            Err(StartupError::Settings(SettingsError::MissingMediaSetting(
                "API_SECRET"
            )))
        ));
    }

    #[rstest]
    #[actix_web::test]
    async fn unreachable_database_fails_migrations(settings: AppSettings) {
        let outcome = run(settings).await;

        assert!(matches!(
            outcome,
            Err(StartupError::Migrations(MigrationError::Connect { .. }))
        ));
    }

    #[rstest]
    #[actix_web::test]
    async fn unreachable_database_fails_the_pool(settings: AppSettings) {
        let settings = AppSettings {
            run_migrations: Some(false),
            ..settings
        };

        let outcome = run(settings).await;

        assert!(matches!(
            outcome,
            Err(StartupError::Pool(PoolError::Build { .. }))
        ));
    }
}
