//! RADIUS client interface
//!
//! The wire protocol is not implemented here; the authenticator calls an
//! externally supplied client through this narrow interface and wraps every
//! invocation in its own deadline rather than trusting the client's internal
//! timeout, because client implementations vary.

use async_trait::async_trait;
use std::collections::HashMap;
use std::net::SocketAddr;
use thiserror::Error;

/// Transport-level failures, distinguishable from a protocol Reject
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("server unreachable: {0}")]
    Unreachable(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Outcome of one RADIUS exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthResponse {
    /// Access-Accept
    Accept,
    /// Access-Reject
    Reject,
}

/// RADIUS client capability
///
/// One operation: attempt authentication of (login, password) against the
/// given server using the shared secret, returning Accept or Reject, or a
/// [`ClientError`] on any transport failure.
#[async_trait]
pub trait RadiusClient: Send + Sync {
    async fn authenticate(
        &self,
        server: SocketAddr,
        login: &str,
        password: &str,
        shared_secret: &str,
    ) -> Result<AuthResponse, ClientError>;
}

/// In-memory client answering from a fixed login/password table
///
/// Useful for tests and for embedding without a real RADIUS server.
#[derive(Debug, Clone, Default)]
pub struct StaticRadiusClient {
    users: HashMap<String, String>,
}

impl StaticRadiusClient {
    pub fn new() -> Self {
        StaticRadiusClient::default()
    }

    pub fn add_user(&mut self, login: impl Into<String>, password: impl Into<String>) {
        self.users.insert(login.into(), password.into());
    }
}

#[async_trait]
impl RadiusClient for StaticRadiusClient {
    async fn authenticate(
        &self,
        _server: SocketAddr,
        login: &str,
        password: &str,
        _shared_secret: &str,
    ) -> Result<AuthResponse, ClientError> {
        match self.users.get(login) {
            Some(expected) if expected == password => Ok(AuthResponse::Accept),
            _ => Ok(AuthResponse::Reject),
        }
    }
}
