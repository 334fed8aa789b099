use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use chrono::Duration;
use std::sync::Arc;

use taskguard::auth::{AuthMiddleware, CredentialStore, TokenService};
use taskguard::config::{Config, StorageBackend};
use taskguard::routes::{self, health};
use taskguard::store::{MemoryStore, PgStore};
use taskguard::AppState;

fn startup_error(context: &str, error: impl std::fmt::Display) -> std::io::Error {
    log::error!("{}: {}", context, error);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, error))
}

async fn build_state(config: &Config) -> std::io::Result<AppState> {
    let tokens = TokenService::new(
        config.jwt_secret.as_bytes(),
        Duration::hours(config.jwt_ttl_hours),
    );
    let credentials = CredentialStore::new(config.bcrypt_cost)
        .map_err(|e| startup_error("invalid bcrypt cost", e))?;

    match (config.storage, config.database_url.as_deref()) {
        (StorageBackend::Postgres, Some(database_url)) => {
            let store = PgStore::connect(database_url, config.database_max_connections)
                .await
                .map_err(|e| startup_error("failed to connect to database", e))?;
            store
                .migrate()
                .await
                .map_err(|e| startup_error("failed to run migrations", e))?;
            log::info!("connected to postgres, migrations applied");
            Ok(AppState::new(Arc::new(store), tokens, credentials))
        }
        (StorageBackend::Postgres, None) => Err(startup_error(
            "invalid configuration",
            "DATABASE_URL must be set",
        )),
        (StorageBackend::Memory, _) => {
            log::warn!("using in-memory storage; all data is lost on shutdown");
            Ok(AppState::new(Arc::new(MemoryStore::new()), tokens, credentials))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| startup_error("invalid configuration", e))?;
    let state = web::Data::new(build_state(&config).await?);

    log::info!("Starting taskguard server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api/v1")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
            .default_service(web::to(routes::not_found))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
