//! Pipeline assembly for embedding applications.
//!
//! Mirrors the usual startup sequence: load configuration, initialize
//! logging, connect the database pool, run migrations, then hand back the
//! wired observer and event API.

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::events::AuditService;
use crate::logging::init_logging;
use crate::observer::AuditObserver;
use crate::recorder::AuditRecorder;

/// A fully wired audit pipeline over the Postgres store.
#[derive(Clone)]
pub struct AuditPipeline {
    pub observer: AuditObserver,
    pub events: AuditService,
}

/// Load configuration, initialize logging and connect the structured store.
pub async fn bootstrap() -> Result<AuditPipeline> {
    let config = Config::load()?;
    init_logging(&config.logging);

    info!("Starting audit pipeline v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let recorder = AuditRecorder::postgres(pool);
    Ok(AuditPipeline {
        observer: AuditObserver::new(recorder.clone()),
        events: AuditService::new(recorder),
    })
}
