//! Authentication pass orchestration
//!
//! One pass walks precondition check, server binding, the deadline-bounded
//! RADIUS exchange, and record resolution, classifying every failure into
//! the fixed taxonomy of [`crate::error::AuthError`]. Nothing is thrown past
//! this boundary; the caller always receives a complete [`Outcome`].

use crate::client::{AuthResponse, ClientError, RadiusClient};
use crate::config::RadiusConfig;
use crate::credentials::Credentials;
use crate::error::{AuthError, ValidationErrors};
use crate::resolver::{RecordResolver, RegistrationHook};
use crate::store::{UserRecord, UserStore};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::lookup_host;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Result of one authentication pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Authentication succeeded and a usable local record was resolved
    Success(UserRecord),
    /// The pass failed; the error set describes why
    Failure(ValidationErrors),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn record(&self) -> Option<&UserRecord> {
        match self {
            Outcome::Success(record) => Some(record),
            Outcome::Failure(_) => None,
        }
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(errors) => Some(errors),
        }
    }
}

/// RADIUS authenticator
///
/// Composes the credential parser, the RADIUS client, and the record store
/// into a single validation pass. Guarantees at most one network
/// authentication attempt and at most one record-creation attempt per pass;
/// retry policy, if any, belongs to the caller.
pub struct RadiusAuthenticator {
    client: Arc<dyn RadiusClient>,
    store: Arc<dyn UserStore>,
    registration_hook: Option<RegistrationHook>,
}

impl RadiusAuthenticator {
    pub fn new(client: Arc<dyn RadiusClient>, store: Arc<dyn UserStore>) -> Self {
        RadiusAuthenticator {
            client,
            store,
            registration_hook: None,
        }
    }

    /// Install a hook run once per auto-registration, before save
    pub fn with_registration_hook(mut self, hook: RegistrationHook) -> Self {
        self.registration_hook = Some(hook);
        self
    }

    /// Run one authentication pass
    ///
    /// `raw` is the loosely-typed credential input from the host (an object,
    /// or an array whose first element is one); `config` is read-only for
    /// the duration of the pass.
    pub async fn validate(&self, raw: &Value, config: &RadiusConfig) -> Outcome {
        let credentials = Credentials::parse(raw, config);
        let mut errors = ValidationErrors::new();

        if credentials.login.is_empty() {
            errors.push(AuthError::MissingLogin);
        }
        if credentials.password.is_empty() {
            errors.push(AuthError::MissingPassword);
        }
        // No network call on invalid input.
        if !errors.is_empty() {
            debug!(login = %credentials.login, "credential preconditions failed");
            return Outcome::Failure(errors);
        }

        let server = match self.resolve_server(config).await {
            Ok(addr) => addr,
            Err(error) => {
                warn!(login = %credentials.login, error = %error, "RADIUS server binding failed");
                errors.push(error);
                return Outcome::Failure(errors);
            }
        };

        if let Err(error) = self.authenticate(server, &credentials, config).await {
            errors.push(error);
            return Outcome::Failure(errors);
        }

        let resolver = RecordResolver::new(
            self.store.as_ref(),
            self.registration_hook.as_ref(),
            config,
        );
        match resolver.resolve(&credentials).await {
            Ok(record) => {
                info!(login = %credentials.login, "authentication pass succeeded");
                Outcome::Success(record)
            }
            Err(error) => {
                errors.push(error);
                Outcome::Failure(errors)
            }
        }
    }

    /// Resolve the configured server to a socket address
    ///
    /// Resolution failure is a binding failure: the pass stops before any
    /// network authentication attempt. Resolution shares the pass deadline
    /// so a stalled resolver cannot block the caller either.
    async fn resolve_server(&self, config: &RadiusConfig) -> Result<SocketAddr, AuthError> {
        let addr = config
            .server_addr()
            .ok_or_else(|| AuthError::ServerUnreachable("no RADIUS server configured".into()))?;

        let resolved = timeout(config.timeout(), lookup_host(addr.as_str()))
            .await
            .map_err(|_| AuthError::ServerUnreachable(format!("{}: resolution timed out", addr)))?
            .map_err(|e| AuthError::ServerUnreachable(format!("{}: {}", addr, e)))?;

        let first = resolved
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::ServerUnreachable(format!("{}: no addresses", addr)));
        first
    }

    /// The single network authentication attempt, under the configured
    /// deadline
    ///
    /// The deadline is enforced here regardless of the client's own timeout
    /// handling; a late result is discarded with the abandoned future and no
    /// partial state from it is applied.
    async fn authenticate(
        &self,
        server: SocketAddr,
        credentials: &Credentials,
        config: &RadiusConfig,
    ) -> Result<(), AuthError> {
        let secret = config.shared_secret.as_deref().unwrap_or_default();

        debug!(login = %credentials.login, server = %server, "sending RADIUS authentication request");

        let result = timeout(
            config.timeout(),
            self.client
                .authenticate(server, &credentials.login, &credentials.password, secret),
        )
        .await;

        match result {
            Err(_elapsed) => {
                warn!(
                    login = %credentials.login,
                    server = %server,
                    timeout_secs = config.timeout_secs,
                    "no response from RADIUS server within deadline"
                );
                Err(AuthError::ServerTimeout)
            }
            Ok(Err(ClientError::Unreachable(detail))) => {
                warn!(login = %credentials.login, server = %server, detail = %detail, "RADIUS server unreachable");
                Err(AuthError::ServerUnreachable(detail))
            }
            Ok(Err(error)) => {
                warn!(login = %credentials.login, server = %server, error = %error, "RADIUS exchange failed");
                Err(AuthError::Radius(error.to_string()))
            }
            Ok(Ok(AuthResponse::Reject)) => {
                info!(login = %credentials.login, server = %server, "RADIUS authentication rejected");
                Err(AuthError::AuthenticationFailed)
            }
            Ok(Ok(AuthResponse::Accept)) => {
                debug!(login = %credentials.login, server = %server, "RADIUS authentication accepted");
                Ok(())
            }
        }
    }
}
