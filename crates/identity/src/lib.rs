//! `gatekey-identity` — account model, lifecycle state machine, and the
//! services that orchestrate them.
//!
//! Storage, token signing, password hashing and mail delivery are injected
//! behind traits; nothing in this crate talks to HTTP.

pub mod account;
pub mod lifecycle;
pub mod mail;
pub mod service;
pub mod store;

pub use account::{Account, Profile, ProfilePatch, VerificationState};
pub use mail::{MailSender, TracingMailSender};
pub use service::{Actor, AuthService, ProfileService, ServiceConfig};
pub use store::{AccountStore, InMemoryAccountStore};
