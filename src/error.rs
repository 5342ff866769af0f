//! Failure taxonomy for one authentication pass
//!
//! Every way a pass can fail maps to exactly one variant; variants are never
//! merged, and nothing is thrown past the orchestrator boundary. The caller
//! always receives the complete ordered set for the pass.

use crate::store::SaveRejection;
use std::fmt;
use std::mem;
use thiserror::Error;

/// Field names validation errors attach to, mirroring the credential input
pub const LOGIN_ERROR_FIELD: &str = "radius_login";
pub const PASSWORD_ERROR_FIELD: &str = "radius_password";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("can not be blank")]
    MissingLogin,
    #[error("can not be blank")]
    MissingPassword,
    #[error("RADIUS server unreachable: {0}")]
    ServerUnreachable(String),
    #[error("no response from RADIUS server")]
    ServerTimeout,
    #[error("authentication failed")]
    AuthenticationFailed,
    #[error("does not exist")]
    LocalRecordNotFound,
    #[error("could not create local account: {0}")]
    LocalRecordCreationFailed(SaveRejection),
    #[error("RADIUS error: {0}")]
    Radius(String),
}

impl AuthError {
    /// Credential field this error is attached to, or `None` for base errors
    pub fn field(&self) -> Option<&'static str> {
        match self {
            AuthError::MissingLogin | AuthError::LocalRecordNotFound => Some(LOGIN_ERROR_FIELD),
            AuthError::MissingPassword => Some(PASSWORD_ERROR_FIELD),
            _ => None,
        }
    }
}

/// Ordered collection of validation errors accumulated during one pass
///
/// Non-empty exactly when the pass failed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<AuthError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        ValidationErrors::default()
    }

    pub fn push(&mut self, error: AuthError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether the set contains an error of the same variant, ignoring any
    /// attached detail
    pub fn contains(&self, error: &AuthError) -> bool {
        self.errors
            .iter()
            .any(|e| mem::discriminant(e) == mem::discriminant(error))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuthError> {
        self.errors.iter()
    }

    /// `(field, message)` pairs in accumulation order, for display
    pub fn messages(&self) -> Vec<(Option<&'static str>, String)> {
        self.errors
            .iter()
            .map(|e| (e.field(), e.to_string()))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            match error.field() {
                Some(field) => write!(f, "{} {}", field, error)?,
                None => write!(f, "{}", error)?,
            }
        }
        Ok(())
    }
}

impl IntoIterator for ValidationErrors {
    type Item = AuthError;
    type IntoIter = std::vec::IntoIter<AuthError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
