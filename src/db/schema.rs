//! Database schema and migrations for ephemail.
//!
//! Migrations are applied sequentially when the database is opened; the
//! schema_version table tracks which have already run, so re-opening is a
//! cheap version check.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: mailboxes and emails
    r#"
-- Disposable mailboxes, keyed by their full address.
-- Timestamps are Unix seconds (UTC).
CREATE TABLE mailboxes (
    address     TEXT PRIMARY KEY,
    created_at  INTEGER NOT NULL,
    expires_at  INTEGER NOT NULL,
    CHECK (expires_at > created_at)
);

CREATE INDEX idx_mailboxes_expires_at ON mailboxes(expires_at);

-- Received emails. A row never outlives its mailbox: deleting the mailbox
-- cascades here in the same statement.
CREATE TABLE emails (
    id              TEXT PRIMARY KEY,
    mailbox_address TEXT NOT NULL REFERENCES mailboxes(address) ON DELETE CASCADE,
    sender          TEXT NOT NULL,
    subject         TEXT,
    body            TEXT NOT NULL,
    size_bytes      INTEGER NOT NULL DEFAULT 0,
    received_at     INTEGER NOT NULL,
    expires_at      INTEGER NOT NULL,
    is_read         INTEGER NOT NULL DEFAULT 0,
    read_at         INTEGER
);

CREATE INDEX idx_emails_mailbox_address ON emails(mailbox_address);
CREATE INDEX idx_emails_expires_at ON emails(expires_at);
CREATE INDEX idx_emails_read_at ON emails(is_read, read_at);
"#,
];
