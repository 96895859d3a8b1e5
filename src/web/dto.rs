//! Request and response DTOs for the Web API.
//!
//! Wire shapes are camelCase with a `success` flag, separate from the
//! domain types. Timestamps are Unix seconds.

use serde::{Deserialize, Serialize};

use crate::email::Email;
use crate::ingest::{Envelope, RouteOutcome};
use crate::mailbox::Mailbox;

// ============================================================================
// Requests
// ============================================================================

/// Body for POST /api/mailboxes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMailboxRequest {
    /// Desired address (local part or full address). Absent means random.
    #[serde(default)]
    pub address: Option<String>,
    /// Requested lifetime in hours. Absent means the configured default.
    #[serde(default)]
    pub expires_in_hours: Option<i64>,
}

/// Body for POST /api/inbound: a parsed inbound message from the transport.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundRequest {
    /// Envelope sender.
    pub sender: String,
    /// Recipient addresses.
    pub recipients: Vec<String>,
    /// Transport receive time (Unix seconds). Absent means now.
    #[serde(default)]
    pub received_at: Option<i64>,
    /// Subject line.
    #[serde(default)]
    pub subject: Option<String>,
    /// Message body.
    pub body: String,
}

impl InboundRequest {
    /// Convert into a routing envelope, stamping the receive time.
    pub fn into_envelope(self, now: i64) -> Envelope {
        Envelope {
            sender: self.sender,
            recipients: self.recipients,
            received_at: self.received_at.unwrap_or(now),
            subject: self.subject,
            body: self.body,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Mailbox as serialized over the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxDto {
    /// Full address.
    pub address: String,
    /// Creation time.
    pub created_at: i64,
    /// Expiry time.
    pub expires_at: i64,
}

impl From<Mailbox> for MailboxDto {
    fn from(m: Mailbox) -> Self {
        Self {
            address: m.address,
            created_at: m.created_at,
            expires_at: m.expires_at,
        }
    }
}

/// Email as serialized over the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDto {
    /// Email id.
    pub id: String,
    /// Owning mailbox address.
    pub mailbox_address: String,
    /// Envelope sender.
    pub sender: String,
    /// Subject line.
    pub subject: Option<String>,
    /// Message body.
    pub body: String,
    /// Raw size in bytes.
    pub size_bytes: i64,
    /// Ingestion time.
    pub received_at: i64,
    /// Expiry time.
    pub expires_at: i64,
    /// Whether the client has retrieved the email.
    pub read: bool,
    /// First read time, when read.
    pub read_at: Option<i64>,
}

impl From<Email> for EmailDto {
    fn from(e: Email) -> Self {
        Self {
            id: e.id,
            mailbox_address: e.mailbox_address,
            sender: e.sender,
            subject: e.subject,
            body: e.body,
            size_bytes: e.size_bytes,
            received_at: e.received_at,
            expires_at: e.expires_at,
            read: e.is_read,
            read_at: e.read_at,
        }
    }
}

/// Response carrying one mailbox.
#[derive(Debug, Serialize)]
pub struct MailboxResponse {
    /// Always true.
    pub success: bool,
    /// The mailbox.
    pub mailbox: MailboxDto,
}

impl MailboxResponse {
    /// Wrap a mailbox.
    pub fn new(mailbox: Mailbox) -> Self {
        Self {
            success: true,
            mailbox: mailbox.into(),
        }
    }
}

/// Response carrying a mailbox's emails, newest first.
#[derive(Debug, Serialize)]
pub struct EmailListResponse {
    /// Always true.
    pub success: bool,
    /// The emails.
    pub emails: Vec<EmailDto>,
}

impl EmailListResponse {
    /// Wrap a list of emails.
    pub fn new(emails: Vec<Email>) -> Self {
        Self {
            success: true,
            emails: emails.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response carrying one email.
#[derive(Debug, Serialize)]
pub struct EmailResponse {
    /// Always true.
    pub success: bool,
    /// The email.
    pub email: EmailDto,
}

impl EmailResponse {
    /// Wrap an email.
    pub fn new(email: Email) -> Self {
        Self {
            success: true,
            email: email.into(),
        }
    }
}

/// Bare success acknowledgement.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    /// Always true.
    pub success: bool,
}

impl AckResponse {
    /// Build an acknowledgement.
    pub fn new() -> Self {
        Self { success: true }
    }
}

impl Default for AckResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response for an inbound routing call.
#[derive(Debug, Serialize)]
pub struct InboundResponse {
    /// Always true (partial matches are an outcome, not an error).
    pub success: bool,
    /// Number of email rows inserted.
    pub delivered: usize,
    /// Recipients with no live mailbox.
    pub unmatched: Vec<String>,
}

impl From<RouteOutcome> for InboundResponse {
    fn from(outcome: RouteOutcome) -> Self {
        Self {
            success: true,
            delivered: outcome.delivered,
            unmatched: outcome.unmatched,
        }
    }
}
