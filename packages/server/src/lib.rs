#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the ResiTrack relief registry.
//!
//! Serves the REST API the coordination frontend talks to: household
//! registration and safety-status tracking, incident reporting, and the
//! aggregate metrics dashboard. All state lives in the registry `SQLite`
//! database; every request is an independent operation against it.

mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use resitrack_database::{create_schema, db};
use std::sync::Arc;
use switchy_database::Database;

/// Shared application state.
pub struct AppState {
    /// Registry database connection.
    pub db: Arc<dyn Database>,
}

/// Registers all API routes under the `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/households", web::get().to(handlers::list_households))
            .route("/households", web::post().to(handlers::create_household))
            .route("/households/{id}", web::put().to(handlers::update_household))
            .route(
                "/households/{id}",
                web::delete().to(handlers::delete_household),
            )
            .route(
                "/households/{id}/status",
                web::put().to(handlers::set_household_status),
            )
            .route(
                "/households/{id}/history",
                web::get().to(handlers::household_history),
            )
            .route("/incidents", web::get().to(handlers::list_incidents))
            .route("/incidents", web::post().to(handlers::create_incident))
            .route("/incidents/{id}", web::put().to(handlers::update_incident))
            .route(
                "/incidents/{id}",
                web::delete().to(handlers::delete_incident),
            )
            .route("/metrics", web::get().to(handlers::get_metrics)),
    );
}

/// Starts the registry API server.
///
/// Opens (or creates) the registry database, ensures the schema exists, and
/// starts the Actix-Web HTTP server. This is a regular async function — the
/// caller is responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the database cannot be opened or the schema cannot be created.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Opening registry database...");
    let db_conn = db::open_from_env().expect("Failed to open registry database");

    log::info!("Ensuring registry schema...");
    create_schema(db_conn.as_ref())
        .await
        .expect("Failed to create registry schema");

    let state = web::Data::new(AppState {
        db: Arc::from(db_conn),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
