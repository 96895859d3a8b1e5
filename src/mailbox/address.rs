//! Address policy: generation and validation of mailbox addresses.
//!
//! The policy is purely computational. Uniqueness is enforced by the store's
//! primary-key constraint; callers observing a conflict on a generated
//! address simply draw a new candidate.

use rand::{distr::Alphanumeric, Rng};

use crate::{EphemailError, Result};

/// Maximum accepted local-part length.
pub const LOCAL_PART_MAX_LENGTH: usize = 64;

/// Address generation and validation rules for one service domain.
#[derive(Debug, Clone)]
pub struct AddressPolicy {
    domain: String,
    random_local_part_len: usize,
}

impl AddressPolicy {
    /// Create a policy for the given domain.
    pub fn new(domain: impl Into<String>, random_local_part_len: usize) -> Self {
        Self {
            domain: domain.into().to_lowercase(),
            random_local_part_len,
        }
    }

    /// The service domain this policy stamps onto addresses.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Produce a random, syntactically valid address candidate.
    ///
    /// Collisions with existing mailboxes are rare but possible; the caller
    /// retries on a store-level uniqueness conflict.
    pub fn random_candidate(&self) -> String {
        let local: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.random_local_part_len)
            .map(|b| (b as char).to_ascii_lowercase())
            .collect();
        format!("{}@{}", local, self.domain)
    }

    /// Normalize and validate a client-supplied address.
    ///
    /// Accepts a bare local part (the service domain is appended) or a full
    /// `local@domain` whose domain matches this policy. The result is
    /// trimmed and lowercased.
    pub fn normalize_custom(&self, candidate: &str) -> Result<String> {
        let candidate = candidate.trim().to_lowercase();
        if candidate.is_empty() {
            return Err(EphemailError::InvalidInput(
                "address must not be empty".to_string(),
            ));
        }

        let local = match candidate.split_once('@') {
            Some((local, domain)) => {
                if domain != self.domain {
                    return Err(EphemailError::InvalidInput(format!(
                        "domain must be {}",
                        self.domain
                    )));
                }
                local.to_string()
            }
            None => candidate,
        };

        if !is_valid_local_part(&local) {
            return Err(EphemailError::InvalidInput(
                "local part may contain a-z, 0-9 and interior . _ -".to_string(),
            ));
        }

        Ok(format!("{}@{}", local, self.domain))
    }
}

/// Check local-part syntax: lowercase alphanumerics with `.`, `_` or `-`
/// allowed between them.
pub fn is_valid_local_part(local: &str) -> bool {
    if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH {
        return false;
    }
    if local.starts_with(['.', '_', '-']) || local.ends_with(['.', '_', '-']) {
        return false;
    }
    local
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AddressPolicy {
        AddressPolicy::new("ephemail.test", 10)
    }

    #[test]
    fn test_random_candidate_shape() {
        let policy = policy();
        let address = policy.random_candidate();
        let (local, domain) = address.split_once('@').unwrap();
        assert_eq!(domain, "ephemail.test");
        assert_eq!(local.len(), 10);
        assert!(is_valid_local_part(local));
    }

    #[test]
    fn test_random_candidates_differ() {
        let policy = policy();
        let a = policy.random_candidate();
        let b = policy.random_candidate();
        // 36^10 candidates; two draws colliding would indicate a broken RNG
        assert_ne!(a, b);
    }

    #[test]
    fn test_normalize_bare_local_part() {
        let policy = policy();
        assert_eq!(
            policy.normalize_custom("  Alice.B  ").unwrap(),
            "alice.b@ephemail.test"
        );
    }

    #[test]
    fn test_normalize_full_address() {
        let policy = policy();
        assert_eq!(
            policy.normalize_custom("Bob@Ephemail.Test").unwrap(),
            "bob@ephemail.test"
        );
    }

    #[test]
    fn test_normalize_rejects_empty() {
        let policy = policy();
        assert!(matches!(
            policy.normalize_custom("   "),
            Err(EphemailError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_normalize_rejects_foreign_domain() {
        let policy = policy();
        assert!(matches!(
            policy.normalize_custom("alice@example.com"),
            Err(EphemailError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_normalize_rejects_bad_syntax() {
        let policy = policy();
        for bad in [".alice", "alice.", "al ice", "al@ice@x", "a/b"] {
            assert!(
                policy.normalize_custom(bad).is_err(),
                "expected rejection of {bad:?}"
            );
        }
    }

    #[test]
    fn test_local_part_length_bound() {
        assert!(is_valid_local_part(&"a".repeat(LOCAL_PART_MAX_LENGTH)));
        assert!(!is_valid_local_part(&"a".repeat(LOCAL_PART_MAX_LENGTH + 1)));
    }
}
