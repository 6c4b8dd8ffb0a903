//! Card Catalog Backend
//!
//! Keeps a personal trading card collection in a single SQLite storage slot and looks up
//! reference artwork from PokéAPI.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod query;
mod reference;
mod store;
mod view;

use std::sync::Arc;

use axum::{
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::sync::{Mutex, RwLock};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::SlotStorage;
use reference::{CatalogClient, ReferenceService, SelectionSlot};
use store::CardStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<CardStore>>,
    pub reference: Arc<ReferenceService>,
    pub selection: Arc<Mutex<SelectionSlot>>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Card Catalog Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Reference catalog: {}", config.catalog_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize storage and load the collection
    let pool = db::init_database(&config.db_path).await?;
    let storage = SlotStorage::new(pool, &config.storage_key, config.max_storage_bytes);
    tracing::info!("Loading collection from slot {}", storage.key());
    let store = CardStore::open(storage).await;
    if store.load_error().is_some() {
        tracing::warn!("Starting with an empty collection");
    } else if store.is_empty() {
        tracing::info!("No cards stored yet");
    } else {
        tracing::info!("Loaded {} cards", store.len());
    }

    let client = CatalogClient::new(&config.catalog_url, config.lookup_timeout)?;
    let reference = Arc::new(ReferenceService::new(client, &config));

    // Warm the candidate list without delaying startup
    let warming = Arc::clone(&reference);
    tokio::spawn(async move {
        match warming.warm().await {
            Ok(count) => tracing::info!("Reference catalog ready with {} candidates", count),
            Err(e) => tracing::warn!("Reference catalog unavailable: {}", e),
        }
    });

    let state = AppState {
        store: Arc::new(RwLock::new(store)),
        reference,
        selection: Arc::new(Mutex::new(SelectionSlot::new())),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/status", get(api::get_status))
        // Cards
        .route("/cards", get(api::list_cards).post(api::create_card))
        .route(
            "/cards/{id}",
            get(api::get_card)
                .put(api::update_card)
                .delete(api::delete_card),
        )
        .route("/sets", get(api::list_sets))
        // Reference lookup
        .route("/reference/candidates", get(api::search_candidates))
        .route(
            "/reference/selection",
            get(api::get_selection)
                .put(api::select_reference)
                .delete(api::clear_selection),
        );

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .route("/assets/card-placeholder.svg", get(placeholder_image))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// Built-in placeholder card art.
async fn placeholder_image() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "image/svg+xml")],
        view::PLACEHOLDER_SVG,
    )
}
