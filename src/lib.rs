//! ephemail - disposable mailbox service.
//!
//! Short-lived inboxes: a caller requests a random or chosen address,
//! receives mail at it for a bounded time window, reads it through the HTTP
//! API, and a retention sweeper reclaims storage once mailboxes or messages
//! expire.

pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod mailbox;
pub mod sweep;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use email::{Email, EmailRepository, NewEmail};
pub use error::{EphemailError, Result};
pub use ingest::{Envelope, IngestionRouter, RouteOutcome};
pub use mailbox::{AddressPolicy, Mailbox, MailboxRepository, MailboxService};
pub use sweep::{RetentionSweeper, SweepReport};
pub use web::WebServer;
