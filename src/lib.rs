//! RADIUS authentication with local account resolution
//!
//! This crate authenticates a user against a remote RADIUS server and
//! reconciles the result with a local user record store, optionally
//! auto-provisioning a new record on first successful authentication.
//!
//! # Features
//!
//! - Async I/O with Tokio; the RADIUS exchange runs under a hard deadline
//! - Pluggable RADIUS client and user record store collaborators
//! - Fixed failure taxonomy returned by value, never thrown
//! - JSON configuration
//! - Structured logging via `tracing`
//!
//! # Example
//!
//! ```rust,no_run
//! use radius_auth::{MemoryUserStore, RadiusAuthenticator, RadiusConfig, StaticRadiusClient};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut client = StaticRadiusClient::new();
//!     client.add_user("alice", "secret");
//!
//!     let authenticator =
//!         RadiusAuthenticator::new(Arc::new(client), Arc::new(MemoryUserStore::new()));
//!
//!     let config = RadiusConfig {
//!         host: Some("radius.example.com".to_string()),
//!         shared_secret: Some("testing123".to_string()),
//!         ..RadiusConfig::default()
//!     };
//!
//!     let raw = json!({"radius_login": "alice@corp.example", "radius_password": "secret"});
//!     let outcome = authenticator.validate(&raw, &config).await;
//!     println!("authenticated: {}", outcome.is_success());
//! }
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod resolver;
pub mod session;
pub mod store;

pub use client::{AuthResponse, ClientError, RadiusClient, StaticRadiusClient};
pub use config::{ConfigError, RadiusConfig};
pub use credentials::Credentials;
pub use error::{AuthError, ValidationErrors};
pub use resolver::{RecordResolver, RegistrationHook};
pub use session::{Outcome, RadiusAuthenticator};
pub use store::{FieldError, MemoryUserStore, SaveRejection, UserRecord, UserStore};
