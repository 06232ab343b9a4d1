//! Verification-mail dispatch contract.
//!
//! Delivery is an external collaborator; the default implementation just logs
//! the dispatch so the flow is observable without an SMTP dependency.

use gatekey_core::AccountId;

/// Dispatches verification email for a freshly registered account.
pub trait MailSender: Send + Sync {
    fn send_verification(&self, email: &str, account_id: AccountId, token: &str);
}

/// Logs the dispatch instead of delivering.
#[derive(Debug, Default)]
pub struct TracingMailSender;

impl MailSender for TracingMailSender {
    fn send_verification(&self, email: &str, account_id: AccountId, token: &str) {
        tracing::info!(
            %account_id,
            email,
            token_len = token.len(),
            "dispatching verification email"
        );
    }
}
