//! Mailbox domain: address policy, storage and provisioning.

mod address;
mod repository;
mod service;
mod types;

pub use address::{is_valid_local_part, AddressPolicy, LOCAL_PART_MAX_LENGTH};
pub use repository::MailboxRepository;
pub use service::MailboxService;
pub use types::Mailbox;
