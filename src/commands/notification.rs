use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use clap::Args;
use tracing::info;

use super::{DelayArgs, batch, run_on_console};
use crate::batch::{Action, BatchProcessorBuilder, BatchSummary, LabeledItem};
use crate::database::Database;

#[derive(Debug, Args)]
pub struct TruncateNotificationsCmd {
    #[command(flatten)]
    pub users: UserSelection,

    /// Number of notifications to keep per user
    #[arg(value_name = "NUMBER_OF_RECORDS_TO_KEEP", allow_negative_numbers = true)]
    pub keep: i64,

    #[command(flatten)]
    pub delay: DelayArgs,
}

#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct UserSelection {
    /// Database id of the user whose notifications are truncated
    #[arg(long)]
    pub user: Option<i64>,

    /// Truncate the notifications of every user holding more than the limit
    #[arg(long)]
    pub all_users: bool,
}

impl TruncateNotificationsCmd {
    pub fn validate(&self) -> Result<()> {
        if self.keep < 0 {
            bail!(
                "Number of records to keep must be a positive integer, now it was {}.",
                self.keep
            );
        }
        Ok(())
    }

    pub async fn run(&self, db: Arc<dyn Database>) -> Result<BatchSummary> {
        run_on_console(self.prepare(db).await?).await
    }

    /// Select the users and attach the truncation action.
    pub async fn prepare(
        &self,
        db: Arc<dyn Database>,
    ) -> Result<BatchProcessorBuilder<i64, String>> {
        self.validate()?;
        let users = match self.users.user {
            Some(user) => vec![user],
            None => {
                let users = db.users_exceeding(self.keep).await?;
                info!(
                    "Number of users found for notification truncation: {}",
                    users.len()
                );
                users
            }
        };
        let items = users
            .into_iter()
            .map(|user| LabeledItem::new(user.to_string(), user))
            .collect();
        Ok(batch(items, &self.delay).action(TruncateNotifications {
            db,
            keep: self.keep,
        }))
    }
}

struct TruncateNotifications {
    db: Arc<dyn Database>,
    keep: i64,
}

#[async_trait]
impl Action<i64, String> for TruncateNotifications {
    async fn apply(&self, user_id: &i64) -> Result<String> {
        let deleted = self.db.truncate_notifications(*user_id, self.keep).await?;
        Ok(format!(
            "Deleted {deleted} record(s) for user with id {user_id}"
        ))
    }
}
