//! Credential extraction from raw, loosely-typed input
//!
//! The host hands the authenticator whatever its login form produced: a JSON
//! object, or an array whose first element is one. Anything else yields empty
//! credentials, which the orchestrator's precondition check turns into the
//! appropriate validation errors rather than failing here.

use crate::config::RadiusConfig;
use serde_json::Value;
use std::fmt;

/// Password field name in the raw credential input
pub const PASSWORD_FIELD: &str = "radius_password";

/// Transient credential triple for one authentication attempt
///
/// Never persisted. A login of the form `alice@corp.example` is split on the
/// first `@` so that the domain can drive domain-aware auto-registration; a
/// bare login falls back to the configured `auto_register_domain`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub domain: Option<String>,
    pub password: String,
}

impl Credentials {
    /// Extract credentials from raw input
    ///
    /// Pure transformation: no logging, no I/O, and the password is copied
    /// verbatim if present.
    pub fn parse(raw: &Value, config: &RadiusConfig) -> Self {
        let fields = match raw {
            Value::Object(map) => Some(map),
            Value::Array(items) => items.first().and_then(Value::as_object),
            _ => None,
        };

        let Some(fields) = fields else {
            return Credentials::empty();
        };

        let raw_login = fields
            .get(&config.login_field)
            .and_then(Value::as_str)
            .unwrap_or_default();

        let password = fields
            .get(PASSWORD_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        // Split on the first '@' only: "a@b@c" keeps "b@c" as the domain so
        // that login + "@" + domain reconstructs the typed value.
        let (login, domain) = match raw_login.split_once('@') {
            Some((login, domain)) => (login.to_string(), Some(domain.to_string())),
            None => (raw_login.to_string(), config.auto_register_domain.clone()),
        };

        Credentials {
            login,
            domain,
            password,
        }
    }

    pub fn empty() -> Self {
        Credentials {
            login: String::new(),
            domain: None,
            password: String::new(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("domain", &self.domain)
            .field("password", &"<protected>")
            .finish()
    }
}
