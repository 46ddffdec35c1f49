//! Direct access to the repository's Postgres database, for maintenance the
//! REST API does not offer.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::DatabaseConfig;

/// Admin-database operations used by the commands.
#[async_trait]
pub trait Database: Send + Sync {
    /// Ids of users holding more than `keep` notifications.
    async fn users_exceeding(&self, keep: i64) -> Result<Vec<i64>>;

    /// Delete all but the newest `keep` notifications of a user; returns the
    /// number of deleted rows.
    async fn truncate_notifications(&self, user_id: i64, keep: i64) -> Result<u64>;
}

const USERS_EXCEEDING: &str = "SELECT user_id FROM usernotification \
     GROUP BY user_id HAVING COUNT(user_id) > $1";

const TRUNCATE_NOTIFICATIONS: &str = "DELETE FROM usernotification \
     WHERE user_id = $1 AND id NOT IN (\
         SELECT id FROM usernotification WHERE user_id = $1 \
         ORDER BY senddate DESC LIMIT $2)";

pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    /// The caller closes the connection with [`close`](Self::close) when done.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let url = config.connection_url()?;
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(url.as_str())
            .await
            .with_context(|| {
                format!(
                    "failed to connect to database {} on {}:{}",
                    config.database, config.host, config.port
                )
            })?;
        info!("Connected to the database");
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn users_exceeding(&self, keep: i64) -> Result<Vec<i64>> {
        let users = sqlx::query_scalar::<_, i64>(USERS_EXCEEDING)
            .bind(keep)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn truncate_notifications(&self, user_id: i64, keep: i64) -> Result<u64> {
        let result = sqlx::query(TRUNCATE_NOTIFICATIONS)
            .bind(user_id)
            .bind(keep)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
