//! Email repository for ephemail.

use uuid::Uuid;

use crate::db::DbPool;
use crate::{EphemailError, Result};

use super::types::{Email, NewEmail};

const EMAIL_COLUMNS: &str = "id, mailbox_address, sender, subject, body, size_bytes, \
                             received_at, expires_at, is_read, read_at";

/// Repository for email rows.
pub struct EmailRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> EmailRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert an email, assigning it a fresh id.
    ///
    /// The foreign-key constraint is the final authority on the owning
    /// mailbox: an insert racing a mailbox deletion fails with `NotFound`
    /// instead of leaving a dangling row.
    pub async fn insert(&self, new_email: &NewEmail) -> Result<Email> {
        let id = Uuid::new_v4().to_string();

        let result = sqlx::query_as::<_, Email>(&format!(
            "INSERT INTO emails (id, mailbox_address, sender, subject, body, size_bytes, \
                                 received_at, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {EMAIL_COLUMNS}"
        ))
        .bind(&id)
        .bind(&new_email.mailbox_address)
        .bind(&new_email.sender)
        .bind(&new_email.subject)
        .bind(&new_email.body)
        .bind(new_email.size_bytes)
        .bind(new_email.received_at)
        .bind(new_email.expires_at)
        .fetch_one(self.pool)
        .await;

        match result {
            Ok(email) => Ok(email),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => Err(
                EphemailError::NotFound(format!("mailbox {}", new_email.mailbox_address)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// Get an email by id.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Email>> {
        let email = sqlx::query_as::<_, Email>(&format!(
            "SELECT {EMAIL_COLUMNS} FROM emails WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(email)
    }

    /// List emails for a mailbox, newest first.
    pub async fn list(&self, mailbox_address: &str) -> Result<Vec<Email>> {
        let emails = sqlx::query_as::<_, Email>(&format!(
            "SELECT {EMAIL_COLUMNS} FROM emails
             WHERE mailbox_address = $1
             ORDER BY received_at DESC, id DESC"
        ))
        .bind(mailbox_address)
        .fetch_all(self.pool)
        .await?;

        Ok(emails)
    }

    /// Mark an email as read.
    ///
    /// Idempotent: re-marking succeeds without moving `read_at`, which is
    /// set exactly once on the first transition and anchors the
    /// read-retention grace window.
    pub async fn mark_read(&self, id: &str, now: i64) -> Result<Email> {
        let email = sqlx::query_as::<_, Email>(&format!(
            "UPDATE emails
             SET is_read = 1, read_at = COALESCE(read_at, $2)
             WHERE id = $1
             RETURNING {EMAIL_COLUMNS}"
        ))
        .bind(id)
        .bind(now)
        .fetch_optional(self.pool)
        .await?;

        email.ok_or_else(|| EphemailError::NotFound(format!("email {}", id)))
    }

    /// Delete emails with `expires_at <= now`. Returns the number removed.
    pub async fn sweep_expired(&self, now: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM emails WHERE expires_at <= $1")
            .bind(now)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete read emails whose grace window has elapsed
    /// (`now - read_at >= grace_secs`). Returns the number removed.
    pub async fn sweep_read(&self, now: i64, grace_secs: i64) -> Result<u64> {
        let cutoff = now - grace_secs;
        let result = sqlx::query(
            "DELETE FROM emails WHERE is_read = 1 AND read_at IS NOT NULL AND read_at <= $1",
        )
        .bind(cutoff)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Count emails for a mailbox.
    pub async fn count_for_mailbox(&self, mailbox_address: &str) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM emails WHERE mailbox_address = $1")
                .bind(mailbox_address)
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }
}
