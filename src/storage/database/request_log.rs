//! Request log backed by SeaORM
//!
//! Records `(url, method, status)` for each completed sub-request. Writes run
//! after the batch response has been computed and never influence it.

use super::entities::{self, request_log};
use super::migration::Migrator;
use crate::config::DatabaseConfig;
use crate::core::dispatch::CompletedCall;
use crate::utils::error::{GatewayError, Result};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Persistent log of completed sub-requests
#[derive(Debug, Clone)]
pub struct RequestLogStore {
    db: DatabaseConnection,
}

impl RequestLogStore {
    /// Connect to the configured database
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connection_timeout))
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        let db = Database::connect(opt)
            .await
            .map_err(GatewayError::Database)?;

        info!(
            "Request log database connected ({:?})",
            db.get_database_backend()
        );
        Ok(Self { db })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running request log migrations...");
        Migrator::up(&self.db, None).await.map_err(|e| {
            warn!("Migration failed: {}", e);
            GatewayError::Database(e)
        })?;
        info!("Request log migrations completed");
        Ok(())
    }

    /// Insert one row per completed call, returns the number of rows written
    pub async fn record(&self, calls: &[CompletedCall]) -> Result<usize> {
        if calls.is_empty() {
            return Ok(0);
        }

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let rows = calls.iter().map(|call| request_log::ActiveModel {
            url: Set(call.url.clone()),
            method: Set(call.method.clone()),
            response_code: Set(i32::from(call.status_code)),
            created_at: Set(now),
            ..Default::default()
        });

        entities::RequestLog::insert_many(rows)
            .exec(&self.db)
            .await
            .map_err(GatewayError::Database)?;

        debug!(rows = calls.len(), "Request log updated");
        Ok(calls.len())
    }

    /// Most recent rows, newest first
    pub async fn recent(&self, limit: u64) -> Result<Vec<request_log::Model>> {
        entities::RequestLog::find()
            .order_by_desc(request_log::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(GatewayError::Database)
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        self.db.ping().await.map_err(GatewayError::Database)
    }
}
