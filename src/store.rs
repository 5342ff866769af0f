//! Local user record store interface
//!
//! The record store is an external collaborator; the authenticator only
//! knows it by two operations: find a record by login, and save a new one.
//! Persistence, schema, and uniqueness constraints live entirely on the
//! store's side of this trait.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const LOGIN_FIELD: &str = "login";
pub const EMAIL_FIELD: &str = "email";

/// Opaque local user record: a bag of named fields
///
/// The authenticator never interprets fields beyond `login` and `email`;
/// the registration hook and the store may attach anything else.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserRecord {
    fields: BTreeMap<String, String>,
}

impl UserRecord {
    pub fn new() -> Self {
        UserRecord::default()
    }

    pub fn with_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        UserRecord {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn login(&self) -> Option<&str> {
        self.get(LOGIN_FIELD)
    }

    pub fn email(&self) -> Option<&str> {
        self.get(EMAIL_FIELD)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// One field-level validation error reported by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field the error is attached to; `None` for record-level errors
    pub field: Option<String>,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn base(message: impl Into<String>) -> Self {
        FieldError {
            field: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(ref field) => write!(f, "{} {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Store-side refusal to save a record, carrying its validation detail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRejection {
    pub errors: Vec<FieldError>,
}

impl SaveRejection {
    pub fn new(errors: Vec<FieldError>) -> Self {
        SaveRejection { errors }
    }
}

impl fmt::Display for SaveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for SaveRejection {}

/// Contract the authenticator requires from the record store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find an existing record by its login field
    async fn find_by_login(&self, login: &str) -> Option<UserRecord>;

    /// Persist a newly constructed record
    ///
    /// Returns the saved record, or the store's validation detail when the
    /// record is refused (including a storage-layer uniqueness violation
    /// when a concurrent pass created the same login first).
    async fn save(&self, record: UserRecord) -> Result<UserRecord, SaveRejection>;
}

/// In-memory record store
///
/// Keyed by login, enforcing login uniqueness the way a database unique
/// index would. Intended for tests and single-process embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    records: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        MemoryUserStore::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_login(&self, login: &str) -> Option<UserRecord> {
        self.records.read().await.get(login).cloned()
    }

    async fn save(&self, record: UserRecord) -> Result<UserRecord, SaveRejection> {
        let login = match record.login() {
            Some(login) if !login.is_empty() => login.to_string(),
            _ => {
                return Err(SaveRejection::new(vec![FieldError::new(
                    LOGIN_FIELD,
                    "can not be blank",
                )]))
            }
        };

        let mut records = self.records.write().await;
        if records.contains_key(&login) {
            return Err(SaveRejection::new(vec![FieldError::new(
                LOGIN_FIELD,
                "has already been taken",
            )]));
        }
        records.insert(login, record.clone());
        Ok(record)
    }
}
