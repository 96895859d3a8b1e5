//! Retention sweeper: periodic batch deletion enforcing TTL policy.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};

use crate::config::RetentionConfig;
use crate::db::Database;
use crate::email::EmailRepository;
use crate::mailbox::MailboxRepository;

/// Per-phase counts from one sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Expired mailboxes removed (their emails cascade, uncounted).
    pub mailboxes: u64,
    /// Expired emails removed.
    pub expired_emails: u64,
    /// Read emails past the grace window removed.
    pub read_emails: u64,
}

/// Periodic retention sweeper.
///
/// Runs on its own timer, independent of request handling, and may overlap
/// with in-flight requests or another sweep: every phase is a plain bounded
/// DELETE, so overlapping runs simply find nothing left to remove.
pub struct RetentionSweeper {
    db: Arc<Database>,
    sweep_interval: Duration,
    read_grace_secs: i64,
}

impl RetentionSweeper {
    /// Create a sweeper from the retention configuration.
    pub fn new(db: Arc<Database>, config: &RetentionConfig) -> Self {
        Self {
            db,
            sweep_interval: Duration::from_secs(config.sweep_interval_secs),
            read_grace_secs: config.read_grace_secs,
        }
    }

    /// Run the sweep loop indefinitely.
    pub async fn run(&self) {
        info!(
            "Retention sweeper started (interval: {} seconds, read grace: {} seconds)",
            self.sweep_interval.as_secs(),
            self.read_grace_secs
        );

        let mut timer = interval(self.sweep_interval);
        // The first tick fires immediately; skip it so startup is quiet
        timer.tick().await;

        loop {
            timer.tick().await;
            let report = self.run_sweep(Utc::now().timestamp()).await;
            debug!(?report, "sweep finished");
        }
    }

    /// Run one sweep at the given instant, returning per-phase counts.
    ///
    /// Phase order matters only for economy: cascading the expired mailboxes
    /// first leaves fewer email rows for the later phases. Phases are
    /// isolated; a failing phase is logged and the rest still run.
    pub async fn run_sweep(&self, now: i64) -> SweepReport {
        let mut report = SweepReport::default();

        let mailboxes = MailboxRepository::new(self.db.pool());
        match mailboxes.sweep_expired(now).await {
            Ok(count) => {
                report.mailboxes = count;
                if count > 0 {
                    info!(count, "swept expired mailboxes");
                }
            }
            Err(e) => warn!(error = %e, "failed to sweep expired mailboxes"),
        }

        let emails = EmailRepository::new(self.db.pool());
        match emails.sweep_expired(now).await {
            Ok(count) => {
                report.expired_emails = count;
                if count > 0 {
                    info!(count, "swept expired emails");
                }
            }
            Err(e) => warn!(error = %e, "failed to sweep expired emails"),
        }

        match emails.sweep_read(now, self.read_grace_secs).await {
            Ok(count) => {
                report.read_emails = count;
                if count > 0 {
                    info!(count, "swept read emails past grace window");
                }
            }
            Err(e) => warn!(error = %e, "failed to sweep read emails"),
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::{EmailRepository, NewEmail};

    fn retention(grace: i64) -> RetentionConfig {
        RetentionConfig {
            sweep_interval_secs: 3600,
            read_grace_secs: grace,
            email_ttl_hours: 24,
        }
    }

    async fn seed_mailbox(db: &Database, address: &str, expires_at: i64) {
        MailboxRepository::new(db.pool())
            .create(address, 100, expires_at)
            .await
            .unwrap();
    }

    async fn seed_email(db: &Database, mailbox: &str, expires_at: i64) -> String {
        EmailRepository::new(db.pool())
            .insert(&NewEmail {
                mailbox_address: mailbox.to_string(),
                sender: "s@example.com".to_string(),
                subject: None,
                body: "x".to_string(),
                size_bytes: 1,
                received_at: 200,
                expires_at,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_sweep_phases_and_counts() {
        let db = Arc::new(Database::open_in_memory().await.unwrap());

        seed_mailbox(&db, "dead@ephemail.test", 1_000).await;
        seed_mailbox(&db, "live@ephemail.test", 100_000).await;

        // Two emails in the dying mailbox: the cascade removes them without
        // them counting as swept emails
        seed_email(&db, "dead@ephemail.test", 50_000).await;
        seed_email(&db, "dead@ephemail.test", 50_000).await;

        // One expired and one live email in the surviving mailbox
        seed_email(&db, "live@ephemail.test", 1_500).await;
        seed_email(&db, "live@ephemail.test", 50_000).await;

        // One read email past its grace window
        let read_id = seed_email(&db, "live@ephemail.test", 50_000).await;
        EmailRepository::new(db.pool())
            .mark_read(&read_id, 1_000)
            .await
            .unwrap();

        let sweeper = RetentionSweeper::new(db.clone(), &retention(600));
        let report = sweeper.run_sweep(2_000).await;

        assert_eq!(report.mailboxes, 1);
        assert_eq!(report.expired_emails, 1);
        assert_eq!(report.read_emails, 1);

        // Exactly one live, unread email remains
        let remaining = EmailRepository::new(db.pool())
            .count_for_mailbox("live@ephemail.test")
            .await
            .unwrap();
        assert_eq!(remaining, 1);
    }

    #[tokio::test]
    async fn test_sweep_idempotent() {
        let db = Arc::new(Database::open_in_memory().await.unwrap());
        seed_mailbox(&db, "dead@ephemail.test", 1_000).await;

        let sweeper = RetentionSweeper::new(db.clone(), &retention(600));
        let first = sweeper.run_sweep(2_000).await;
        assert_eq!(first.mailboxes, 1);

        let second = sweeper.run_sweep(2_000).await;
        assert_eq!(second, SweepReport::default());
    }

    #[tokio::test]
    async fn test_failing_phase_does_not_abort_others() {
        let db = Arc::new(Database::open_in_memory().await.unwrap());
        seed_mailbox(&db, "dead@ephemail.test", 1_000).await;

        // Break both email phases; the mailbox phase must still run and the
        // broken ones land in the report as zeros instead of aborting
        sqlx::query("DROP TABLE emails")
            .execute(db.pool())
            .await
            .unwrap();

        let sweeper = RetentionSweeper::new(db.clone(), &retention(600));
        let report = sweeper.run_sweep(2_000).await;

        assert_eq!(report.mailboxes, 1);
        assert_eq!(report.expired_emails, 0);
        assert_eq!(report.read_emails, 0);

        assert!(MailboxRepository::new(db.pool())
            .get("dead@ephemail.test")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_sweep_retains_read_email_inside_grace() {
        let db = Arc::new(Database::open_in_memory().await.unwrap());
        seed_mailbox(&db, "live@ephemail.test", 100_000).await;

        let id = seed_email(&db, "live@ephemail.test", 50_000).await;
        EmailRepository::new(db.pool())
            .mark_read(&id, 1_000)
            .await
            .unwrap();

        let sweeper = RetentionSweeper::new(db.clone(), &retention(600));

        // now - read_at < grace: retained
        let report = sweeper.run_sweep(1_599).await;
        assert_eq!(report.read_emails, 0);

        // now - read_at >= grace: reclaimed
        let report = sweeper.run_sweep(1_600).await;
        assert_eq!(report.read_emails, 1);
    }
}
