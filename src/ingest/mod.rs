//! Ingestion router: delivers parsed inbound messages to mailboxes.
//!
//! The mail transport hands over an already-parsed envelope; this layer only
//! records what it can match. Unknown or expired recipients are dropped
//! silently, never bounced.

use tracing::debug;

use crate::db::Database;
use crate::email::{EmailRepository, NewEmail};
use crate::mailbox::MailboxRepository;
use crate::{EphemailError, Result};

/// A parsed inbound message.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Envelope sender.
    pub sender: String,
    /// Recipient addresses, in transport order.
    pub recipients: Vec<String>,
    /// When the transport received the message (Unix seconds).
    pub received_at: i64,
    /// Subject line, when one was present.
    pub subject: Option<String>,
    /// Message body.
    pub body: String,
}

impl Envelope {
    /// Raw message size in bytes.
    pub fn size_bytes(&self) -> i64 {
        self.body.len() as i64
    }
}

/// Result of routing one envelope.
#[derive(Debug, Clone, Default)]
pub struct RouteOutcome {
    /// Number of email rows inserted.
    pub delivered: usize,
    /// Recipients with no live mailbox.
    pub unmatched: Vec<String>,
}

/// Routes envelopes into mailboxes.
pub struct IngestionRouter<'a> {
    db: &'a Database,
    email_ttl_hours: i64,
}

impl<'a> IngestionRouter<'a> {
    /// Create a router that stamps each delivered email with the given TTL.
    pub fn new(db: &'a Database, email_ttl_hours: i64) -> Self {
        Self {
            db,
            email_ttl_hours,
        }
    }

    /// Route an envelope: one email row per matching, non-expired mailbox.
    ///
    /// An envelope with zero matching recipients is a successful no-op. A
    /// sweep deleting a mailbox between the lookup and the insert surfaces
    /// as `NotFound` from the store and the recipient lands in `unmatched`;
    /// only a store failure aborts the whole route.
    pub async fn route(&self, envelope: &Envelope) -> Result<RouteOutcome> {
        let mailboxes = MailboxRepository::new(self.db.pool());
        let emails = EmailRepository::new(self.db.pool());

        let mut outcome = RouteOutcome::default();

        for recipient in &envelope.recipients {
            let address = recipient.trim().to_lowercase();

            let mailbox = mailboxes
                .get(&address)
                .await?
                .filter(|m| !m.is_expired(envelope.received_at));

            let Some(mailbox) = mailbox else {
                debug!(%address, "no live mailbox for recipient, dropping");
                outcome.unmatched.push(address);
                continue;
            };

            let new_email = NewEmail {
                mailbox_address: mailbox.address,
                sender: envelope.sender.clone(),
                subject: envelope.subject.clone(),
                body: envelope.body.clone(),
                size_bytes: envelope.size_bytes(),
                received_at: envelope.received_at,
                expires_at: envelope.received_at + self.email_ttl_hours * 3600,
            };

            match emails.insert(&new_email).await {
                Ok(_) => outcome.delivered += 1,
                // Mailbox swept between lookup and insert
                Err(EphemailError::NotFound(_)) => {
                    debug!(%address, "mailbox vanished during delivery, dropping");
                    outcome.unmatched.push(address);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(outcome)
    }
}
