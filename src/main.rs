//! PR Reviewer Service - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pr_reviewer_lib::api;
use pr_reviewer_lib::config::{Config, StoreBackend};
use pr_reviewer_lib::db::DbPool;
use pr_reviewer_lib::db::memory::InMemoryStore;
use pr_reviewer_lib::middleware::RequestLogger;
use pr_reviewer_lib::services::{AssignmentEngine, CandidateSelector};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            eprintln!();
            eprintln!("Please check your environment variables:");
            eprintln!("  - RUST_ENV must be set to 'development' or 'production'");
            eprintln!("  - In production, DATABASE_URL must be set and PRR_STORE must be postgres");
            std::process::exit(1);
        }
    };

    // Initialize logging; RUST_LOG wins over PRR_LOG_LEVEL
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("========================================");
    info!("  PR Reviewer Service");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let selector = CandidateSelector::from_entropy();
    let engine = match config.store {
        StoreBackend::Postgres => {
            let pool = match DbPool::new(&config.database).await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("Failed to initialize database: {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = pool.run_migrations().await {
                error!("Failed to run migrations: {}", e);
                std::process::exit(1);
            }
            AssignmentEngine::new(Arc::new(pool), selector, config.engine.clone())
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store - all data is lost on restart");
            AssignmentEngine::new(
                Arc::new(InMemoryStore::new()),
                selector,
                config.engine.clone(),
            )
        }
    };

    info!(
        store = engine.backend_name(),
        reviewers_per_pr = config.engine.reviewers_per_pr,
        merge_policy = config.engine.merge_policy.as_str(),
        timeout_secs = config.engine.call_timeout.as_secs(),
        "Assignment engine ready"
    );

    let engine = web::Data::new(engine);
    let bind_address = config.bind_address();

    let worker_count = if config.is_development() {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)
            .app_data(engine.clone())
            .configure(api::configure_routes)
    })
    .workers(worker_count)
    .bind(&bind_address)?
    .run()
    .await
}
