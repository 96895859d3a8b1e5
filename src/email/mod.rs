//! Email domain: storage of received messages.

mod repository;
mod types;

pub use repository::EmailRepository;
pub use types::{Email, NewEmail};
