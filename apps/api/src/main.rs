mod allocation;
mod config;
mod costing;
mod customers;
mod db;
mod designs;
mod drive;
mod errors;
mod layout;
mod leads;
mod models;
mod orders;
mod quotation;
mod routes;
mod state;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::allocation::allocator_from_config;
use crate::config::Config;
use crate::db::create_pool;
use crate::drive::DriveClient;
use crate::layout::LayoutOptions;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Printdesk API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis (quotation render queue hand-off)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize S3 / MinIO (quotation snapshots)
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize the Drive link client
    let drive = DriveClient::new();
    info!(
        "Drive client initialized (probe {})",
        if config.drive_probe_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    // Initialize the sales allocator (round_robin by default — swap via ALLOCATION_STRATEGY)
    let allocator = allocator_from_config(&config.allocation_strategy);
    info!("Allocator: {}", config.allocation_strategy);

    // Default imposition parameters: 10mm sheet margin, 3mm gutter
    let layout_defaults = LayoutOptions::default();
    info!(
        "Layout defaults: {}mm margin / {}mm gutter",
        layout_defaults.margin_mm, layout_defaults.gutter_mm
    );

    // Build app state
    let state = AppState {
        db,
        redis,
        s3,
        drive,
        config: config.clone(),
        allocator,
        layout_defaults,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "printdesk-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
