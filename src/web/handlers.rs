//! API handlers for the ephemail Web API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::config::Config;
use crate::db::Database;
use crate::email::EmailRepository;
use crate::ingest::IngestionRouter;
use crate::mailbox::{AddressPolicy, MailboxService};

use super::dto::{
    AckResponse, CreateMailboxRequest, EmailListResponse, EmailResponse, InboundRequest,
    InboundResponse, MailboxResponse,
};
use super::error::ApiError;

/// Shared application state.
pub struct AppState {
    /// Database handle.
    pub db: Arc<Database>,
    /// Address policy for the service domain.
    pub policy: AddressPolicy,
    /// Mailbox policy settings.
    pub mailbox_config: crate::config::MailboxConfig,
    /// Retention policy settings.
    pub retention_config: crate::config::RetentionConfig,
}

impl AppState {
    /// Create application state from configuration.
    pub fn new(db: Arc<Database>, config: &Config) -> Self {
        let policy = AddressPolicy::new(
            &config.mailbox.domain,
            config.mailbox.random_local_part_len,
        );
        Self {
            db,
            policy,
            mailbox_config: config.mailbox.clone(),
            retention_config: config.retention.clone(),
        }
    }

    fn mailboxes(&self) -> MailboxService<'_> {
        MailboxService::new(&self.db, &self.policy, &self.mailbox_config)
    }
}

/// POST /api/mailboxes - Create a mailbox (random or chosen address).
pub async fn create_mailbox(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateMailboxRequest>,
) -> Result<(StatusCode, Json<MailboxResponse>), ApiError> {
    let service = state.mailboxes();

    let mailbox = match request.address {
        Some(address) => {
            service
                .create_custom(&address, request.expires_in_hours)
                .await?
        }
        None => service.create_random(request.expires_in_hours).await?,
    };

    tracing::info!(address = %mailbox.address, expires_at = mailbox.expires_at, "mailbox created");
    Ok((StatusCode::CREATED, Json(MailboxResponse::new(mailbox))))
}

/// GET /api/mailboxes/:address - Fetch a mailbox.
pub async fn get_mailbox(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<MailboxResponse>, ApiError> {
    let mailbox = state.mailboxes().get(&address).await?;
    Ok(Json(MailboxResponse::new(mailbox)))
}

/// DELETE /api/mailboxes/:address - Delete a mailbox and its emails.
pub async fn delete_mailbox(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<AckResponse>, ApiError> {
    state.mailboxes().delete(&address).await?;
    tracing::info!(%address, "mailbox deleted");
    Ok(Json(AckResponse::new()))
}

/// GET /api/mailboxes/:address/emails - List a mailbox's emails, newest first.
pub async fn list_emails(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<EmailListResponse>, ApiError> {
    let emails = state.mailboxes().list_emails(&address).await?;
    Ok(Json(EmailListResponse::new(emails)))
}

/// POST /api/emails/:id/read - Mark an email as read.
pub async fn mark_email_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EmailResponse>, ApiError> {
    let email = EmailRepository::new(state.db.pool())
        .mark_read(&id, Utc::now().timestamp())
        .await?;
    Ok(Json(EmailResponse::new(email)))
}

/// POST /api/inbound - Route a parsed inbound message from the transport.
pub async fn ingest_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InboundRequest>,
) -> Result<Json<InboundResponse>, ApiError> {
    let envelope = request.into_envelope(Utc::now().timestamp());

    let router = IngestionRouter::new(&state.db, state.retention_config.email_ttl_hours);
    let outcome = router.route(&envelope).await?;

    tracing::info!(
        delivered = outcome.delivered,
        unmatched = outcome.unmatched.len(),
        "inbound message routed"
    );
    Ok(Json(outcome.into()))
}
