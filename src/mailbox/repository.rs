//! Mailbox repository for ephemail.

use crate::db::DbPool;
use crate::{EphemailError, Result};

use super::types::Mailbox;

/// Repository for mailbox rows.
pub struct MailboxRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> MailboxRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a mailbox.
    ///
    /// The primary-key constraint closes the race between any advisory
    /// existence check and this insert: concurrent creations of the same
    /// address resolve to exactly one winner, the rest get `Conflict`.
    pub async fn create(&self, address: &str, created_at: i64, expires_at: i64) -> Result<Mailbox> {
        let result = sqlx::query_as::<_, Mailbox>(
            "INSERT INTO mailboxes (address, created_at, expires_at)
             VALUES ($1, $2, $3)
             RETURNING address, created_at, expires_at",
        )
        .bind(address)
        .bind(created_at)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await;

        match result {
            Ok(mailbox) => Ok(mailbox),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                EphemailError::Conflict(format!("mailbox {}", address)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a mailbox by address.
    pub async fn get(&self, address: &str) -> Result<Option<Mailbox>> {
        let mailbox = sqlx::query_as::<_, Mailbox>(
            "SELECT address, created_at, expires_at FROM mailboxes WHERE address = $1",
        )
        .bind(address)
        .fetch_optional(self.pool)
        .await?;

        Ok(mailbox)
    }

    /// Check whether a mailbox exists.
    pub async fn exists(&self, address: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM mailboxes WHERE address = $1)")
                .bind(address)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    /// Delete a mailbox. Returns false when no such mailbox exists.
    ///
    /// All of the mailbox's emails go with it: the FK cascade fires inside
    /// this single statement, so no reader can observe orphaned emails and
    /// no insert can slip in against a half-deleted mailbox.
    pub async fn delete(&self, address: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM mailboxes WHERE address = $1")
            .bind(address)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every mailbox with `expires_at <= now`, cascading their emails.
    ///
    /// Returns the number of mailboxes removed (cascaded emails are not
    /// counted). Running it again with no new expirations removes 0.
    pub async fn sweep_expired(&self, now: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM mailboxes WHERE expires_at <= $1")
            .bind(now)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Count mailboxes.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mailboxes")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = setup_db().await;
        let repo = MailboxRepository::new(db.pool());

        let created = repo.create("abc@ephemail.test", 1_000, 4_600).await.unwrap();
        assert_eq!(created.address, "abc@ephemail.test");
        assert_eq!(created.created_at, 1_000);
        assert_eq!(created.expires_at, 4_600);

        let fetched = repo.get("abc@ephemail.test").await.unwrap().unwrap();
        assert_eq!(fetched.address, created.address);
        assert_eq!(fetched.expires_at, created.expires_at);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = setup_db().await;
        let repo = MailboxRepository::new(db.pool());

        assert!(repo.get("nobody@ephemail.test").await.unwrap().is_none());
        assert!(!repo.exists("nobody@ephemail.test").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_duplicate_conflicts() {
        let db = setup_db().await;
        let repo = MailboxRepository::new(db.pool());

        repo.create("a@ephemail.test", 1_000, 4_600).await.unwrap();
        let result = repo.create("a@ephemail.test", 1_100, 4_700).await;
        assert!(matches!(result, Err(EphemailError::Conflict(_))));

        // Loser did not clobber the winner
        let row = repo.get("a@ephemail.test").await.unwrap().unwrap();
        assert_eq!(row.created_at, 1_000);
    }

    #[tokio::test]
    async fn test_expiry_check_constraint() {
        let db = setup_db().await;
        let repo = MailboxRepository::new(db.pool());

        // expires_at must be strictly after created_at
        let result = repo.create("bad@ephemail.test", 1_000, 1_000).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = setup_db().await;
        let repo = MailboxRepository::new(db.pool());

        repo.create("gone@ephemail.test", 1_000, 4_600).await.unwrap();
        assert!(repo.delete("gone@ephemail.test").await.unwrap());
        assert!(!repo.delete("gone@ephemail.test").await.unwrap());
        assert!(repo.get("gone@ephemail.test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sweep_expired_exact_boundary() {
        let db = setup_db().await;
        let repo = MailboxRepository::new(db.pool());

        repo.create("old@ephemail.test", 100, 1_000).await.unwrap();
        repo.create("edge@ephemail.test", 100, 2_000).await.unwrap();
        repo.create("live@ephemail.test", 100, 3_000).await.unwrap();

        // expires_at <= now is swept, strictly later survives
        let removed = repo.sweep_expired(2_000).await.unwrap();
        assert_eq!(removed, 2);
        assert!(repo.get("live@ephemail.test").await.unwrap().is_some());

        // Idempotent: nothing new expired, second pass removes nothing
        assert_eq!(repo.sweep_expired(2_000).await.unwrap(), 0);
    }
}
