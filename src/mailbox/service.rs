//! Mailbox service: lifetime validation and address provisioning on top of
//! the repositories.

use chrono::Utc;
use tracing::debug;

use crate::config::MailboxConfig;
use crate::db::Database;
use crate::email::{Email, EmailRepository};
use crate::{EphemailError, Result};

use super::address::AddressPolicy;
use super::repository::MailboxRepository;
use super::types::Mailbox;

/// Attempts at drawing an unused random address before giving up.
const MAX_GENERATION_ATTEMPTS: usize = 16;

/// Service for mailbox operations.
pub struct MailboxService<'a> {
    db: &'a Database,
    policy: &'a AddressPolicy,
    default_expires_in_hours: i64,
    max_expires_in_hours: i64,
}

impl<'a> MailboxService<'a> {
    /// Create a new service over the given database and policy.
    pub fn new(db: &'a Database, policy: &'a AddressPolicy, config: &MailboxConfig) -> Self {
        Self {
            db,
            policy,
            default_expires_in_hours: config.default_expires_in_hours,
            max_expires_in_hours: config.max_expires_in_hours,
        }
    }

    /// Validate a requested lifetime, falling back to the default.
    fn resolve_expires_in_hours(&self, requested: Option<i64>) -> Result<i64> {
        let hours = requested.unwrap_or(self.default_expires_in_hours);
        if hours < 1 {
            return Err(EphemailError::InvalidInput(
                "expiresInHours must be at least 1".to_string(),
            ));
        }
        if hours > self.max_expires_in_hours {
            return Err(EphemailError::InvalidInput(format!(
                "expiresInHours must be at most {}",
                self.max_expires_in_hours
            )));
        }
        Ok(hours)
    }

    /// Create a mailbox at a random address.
    ///
    /// Collisions with existing mailboxes show up as a store-level conflict
    /// on insert; a fresh candidate is drawn and the insert retried. The
    /// advisory existence check is skipped entirely here since the
    /// constraint already decides the winner.
    pub async fn create_random(&self, expires_in_hours: Option<i64>) -> Result<Mailbox> {
        let hours = self.resolve_expires_in_hours(expires_in_hours)?;
        let repo = MailboxRepository::new(self.db.pool());

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let address = self.policy.random_candidate();
            let now = Utc::now().timestamp();
            match repo.create(&address, now, now + hours * 3600).await {
                Ok(mailbox) => return Ok(mailbox),
                Err(EphemailError::Conflict(_)) => {
                    debug!(attempt, %address, "random address collided, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(EphemailError::Store(format!(
            "no unused random address after {} attempts",
            MAX_GENERATION_ATTEMPTS
        )))
    }

    /// Create a mailbox at a client-chosen address.
    ///
    /// The policy only normalizes and validates syntax; `Conflict` for a
    /// taken address comes from the store's uniqueness constraint, so the
    /// check-then-insert race has one winner.
    pub async fn create_custom(
        &self,
        candidate: &str,
        expires_in_hours: Option<i64>,
    ) -> Result<Mailbox> {
        let hours = self.resolve_expires_in_hours(expires_in_hours)?;
        let address = self.policy.normalize_custom(candidate)?;

        let now = Utc::now().timestamp();
        MailboxRepository::new(self.db.pool())
            .create(&address, now, now + hours * 3600)
            .await
    }

    /// Get a mailbox. Expired-but-unswept mailboxes read as absent.
    pub async fn get(&self, address: &str) -> Result<Mailbox> {
        let address = address.trim().to_lowercase();
        let mailbox = MailboxRepository::new(self.db.pool())
            .get(&address)
            .await?
            .filter(|m| !m.is_expired(Utc::now().timestamp()));

        mailbox.ok_or_else(|| EphemailError::NotFound(format!("mailbox {}", address)))
    }

    /// List a mailbox's emails, newest first.
    ///
    /// Fails with `NotFound` when the mailbox is absent or expired, so a
    /// deleted mailbox never reads as merely empty.
    pub async fn list_emails(&self, address: &str) -> Result<Vec<Email>> {
        let mailbox = self.get(address).await?;
        EmailRepository::new(self.db.pool())
            .list(&mailbox.address)
            .await
    }

    /// Delete a mailbox and, atomically, all its emails.
    pub async fn delete(&self, address: &str) -> Result<()> {
        let address = address.trim().to_lowercase();
        let deleted = MailboxRepository::new(self.db.pool())
            .delete(&address)
            .await?;

        if deleted {
            Ok(())
        } else {
            Err(EphemailError::NotFound(format!("mailbox {}", address)))
        }
    }
}
