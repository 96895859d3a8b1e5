//! Mailbox types for ephemail.

/// A disposable mailbox.
///
/// Timestamps are Unix seconds (UTC).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Mailbox {
    /// Full address (local-part@domain), lowercase. Primary key.
    pub address: String,
    /// When the mailbox was created.
    pub created_at: i64,
    /// When the mailbox and all its emails become eligible for deletion.
    pub expires_at: i64,
}

impl Mailbox {
    /// Check whether the mailbox is expired at the given instant.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}
