//! Collaborator wiring for the HTTP layer.

use std::sync::Arc;

use gatekey_auth::{Argon2Verifier, CredentialVerifier, Hs256TokenIssuer, TokenIssuer};
use gatekey_identity::{
    AccountStore, AuthService, InMemoryAccountStore, MailSender, ProfileService, ServiceConfig,
    TracingMailSender,
};

/// The services a request handler can reach.
pub struct AppServices {
    pub auth: AuthService,
    pub profiles: ProfileService,
    pub tokens: Arc<dyn TokenIssuer>,
}

impl AppServices {
    /// Default wiring: in-memory store, Argon2id hashing, HS256 tokens,
    /// logged mail dispatch.
    pub fn in_memory(jwt_secret: &str, config: ServiceConfig) -> Self {
        Self::with_collaborators(
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(Argon2Verifier),
            Arc::new(Hs256TokenIssuer::new(jwt_secret.as_bytes())),
            Arc::new(TracingMailSender),
            config,
        )
    }

    /// Explicit wiring; the seam tests use to substitute collaborators.
    pub fn with_collaborators(
        store: Arc<dyn AccountStore>,
        credentials: Arc<dyn CredentialVerifier>,
        tokens: Arc<dyn TokenIssuer>,
        mail: Arc<dyn MailSender>,
        config: ServiceConfig,
    ) -> Self {
        let auth = AuthService::new(
            store.clone(),
            credentials.clone(),
            tokens.clone(),
            mail,
            config.clone(),
        );
        let profiles = ProfileService::new(store, credentials, config);

        Self {
            auth,
            profiles,
            tokens,
        }
    }
}
