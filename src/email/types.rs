//! Email types for ephemail.

/// A received email.
///
/// Timestamps are Unix seconds (UTC).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Email {
    /// Email ID, assigned at ingestion.
    pub id: String,
    /// Owning mailbox address.
    pub mailbox_address: String,
    /// Envelope sender.
    pub sender: String,
    /// Subject line, when one was present.
    pub subject: Option<String>,
    /// Message body.
    pub body: String,
    /// Raw message size in bytes.
    pub size_bytes: i64,
    /// When the email was ingested.
    pub received_at: i64,
    /// Independent expiry, set at ingestion. The mailbox cascade applies
    /// regardless of this value.
    pub expires_at: i64,
    /// Whether the client has retrieved the email.
    pub is_read: bool,
    /// Set the moment `is_read` first transitions to true.
    pub read_at: Option<i64>,
}

/// A new email to persist.
#[derive(Debug, Clone)]
pub struct NewEmail {
    /// Owning mailbox address.
    pub mailbox_address: String,
    /// Envelope sender.
    pub sender: String,
    /// Subject line.
    pub subject: Option<String>,
    /// Message body.
    pub body: String,
    /// Raw message size in bytes.
    pub size_bytes: i64,
    /// Ingestion timestamp.
    pub received_at: i64,
    /// Expiry timestamp.
    pub expires_at: i64,
}
