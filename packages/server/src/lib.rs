#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the wage map dashboard.
//!
//! Serves the processed wage data as a REST API plus the static data file
//! and frontend assets for the choropleth map. The wage store is loaded
//! once at startup into an immutable shared snapshot; a reload means a
//! restart with a new file, never in-place mutation.

pub mod handlers;

use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use wage_map_store::WageRecordStore;

/// Default location of the processed wage data file.
pub const DEFAULT_DATA_PATH: &str = "data/processed/h1b_wage_by_county_job.json";

/// Shared application state.
pub struct AppState {
    /// Immutable wage record snapshot, shared read-only across workers.
    pub store: Arc<WageRecordStore>,
}

/// Starts the wage map API server.
///
/// Loads the processed wage JSON into memory and starts the Actix-Web
/// HTTP server. This is a regular async function — the caller provides
/// the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the wage data file cannot be read or parsed.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let data_path =
        std::env::var("DATA_PATH").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());

    log::info!("Loading wage data from {data_path}...");
    let store = WageRecordStore::load(Path::new(&data_path)).expect("Failed to load wage data");

    let state = web::Data::new(AppState {
        store: Arc::new(store),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    // Optional prefix when serving under a subpath; applies to the static
    // asset mounts only.
    let base_path = std::env::var("BASE_PATH").unwrap_or_default();

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/wages", web::get().to(handlers::wages))
                    .route("/job-titles", web::get().to(handlers::job_titles))
                    .route("/bands", web::get().to(handlers::bands)),
            )
            // Serve the processed data file
            .service(Files::new(
                &format!("{base_path}/data"),
                "data/processed",
            ))
            // Serve frontend static files (production)
            .service(
                Files::new(&format!("{base_path}/"), "app/dist").index_file("index.html"),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
