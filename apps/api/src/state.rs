use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::allocation::Allocator;
use crate::config::Config;
use crate::drive::DriveClient;
use crate::layout::LayoutOptions;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Redis client reserved for the async quotation PDF render queue.
    #[allow(dead_code)]
    pub redis: RedisClient,
    pub s3: S3Client,
    pub drive: DriveClient,
    pub config: Config,
    /// Pluggable sales allocator. Default: RoundRobinAllocator. Swap via ALLOCATION_STRATEGY.
    pub allocator: Arc<dyn Allocator>,
    /// Default imposition parameters (sheet margin and gutter) used when an
    /// estimate request does not override them.
    pub layout_defaults: LayoutOptions,
}
