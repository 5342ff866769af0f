//! Record resolution after a successful RADIUS authentication
//!
//! The only place this crate mutates external state: an existing record is
//! looked up by login, or, when auto-registration is enabled, a new one is
//! constructed and saved. Finding is idempotent; creation is not, and a
//! concurrent pass for the same never-yet-registered login may lose the race
//! to the store's uniqueness constraint.

use crate::config::RadiusConfig;
use crate::credentials::Credentials;
use crate::error::AuthError;
use crate::store::{UserRecord, UserStore, EMAIL_FIELD, LOGIN_FIELD};
use std::sync::Arc;
use tracing::{debug, info};

/// Caller-supplied hook run once per auto-registration, before save
///
/// May attach arbitrary fields to the new record (role assignment, flags).
pub type RegistrationHook = Arc<dyn Fn(&mut UserRecord) + Send + Sync>;

pub struct RecordResolver<'a> {
    store: &'a dyn UserStore,
    hook: Option<&'a RegistrationHook>,
    config: &'a RadiusConfig,
}

impl<'a> RecordResolver<'a> {
    pub fn new(
        store: &'a dyn UserStore,
        hook: Option<&'a RegistrationHook>,
        config: &'a RadiusConfig,
    ) -> Self {
        RecordResolver {
            store,
            hook,
            config,
        }
    }

    /// Find the local record for an authenticated login, or auto-register one
    ///
    /// At most one save attempt; no retries.
    pub async fn resolve(&self, credentials: &Credentials) -> Result<UserRecord, AuthError> {
        let login = &credentials.login;

        if let Some(record) = self.store.find_by_login(login).await {
            debug!(login = %login, "found existing local record");
            return Ok(record);
        }

        if !self.config.auto_register {
            debug!(login = %login, "no local record and auto-registration is disabled");
            return Err(AuthError::LocalRecordNotFound);
        }

        let mut record = UserRecord::new();
        record.set(LOGIN_FIELD, login.clone());
        if let Some(ref domain) = credentials.domain {
            record.set(EMAIL_FIELD, format!("{}@{}", login, domain));
        }
        if let Some(hook) = self.hook {
            hook(&mut record);
        }

        match self.store.save(record).await {
            Ok(record) => {
                info!(login = %login, "created local user record");
                Ok(record)
            }
            Err(rejection) => {
                debug!(login = %login, detail = %rejection, "local record creation refused by store");
                Err(AuthError::LocalRecordCreationFailed(rejection))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryUserStore;

    fn credentials(login: &str, domain: Option<&str>) -> Credentials {
        Credentials {
            login: login.to_string(),
            domain: domain.map(str::to_string),
            password: "pw".to_string(),
        }
    }

    #[tokio::test]
    async fn test_existing_record_wins() {
        let store = MemoryUserStore::new();
        let existing = UserRecord::with_fields([("login", "alice"), ("email", "old@corp")]);
        store.save(existing.clone()).await.unwrap();

        let config = RadiusConfig::default();
        let resolver = RecordResolver::new(&store, None, &config);
        let record = resolver
            .resolve(&credentials("alice", Some("new.example")))
            .await
            .unwrap();

        assert_eq!(record, existing);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_auto_register_builds_email_from_domain() {
        let store = MemoryUserStore::new();
        let config = RadiusConfig::default();
        let resolver = RecordResolver::new(&store, None, &config);

        let record = resolver
            .resolve(&credentials("alice", Some("corp.example")))
            .await
            .unwrap();

        assert_eq!(record.login(), Some("alice"));
        assert_eq!(record.email(), Some("alice@corp.example"));
        assert!(store.find_by_login("alice").await.is_some());
    }

    #[tokio::test]
    async fn test_auto_register_without_domain_omits_email() {
        let store = MemoryUserStore::new();
        let config = RadiusConfig::default();
        let resolver = RecordResolver::new(&store, None, &config);

        let record = resolver.resolve(&credentials("alice", None)).await.unwrap();

        assert_eq!(record.login(), Some("alice"));
        assert_eq!(record.email(), None);
    }

    #[tokio::test]
    async fn test_disabled_auto_register_reports_not_found() {
        let store = MemoryUserStore::new();
        let config = RadiusConfig {
            auto_register: false,
            ..RadiusConfig::default()
        };
        let resolver = RecordResolver::new(&store, None, &config);

        let result = resolver.resolve(&credentials("alice", None)).await;

        assert_eq!(result, Err(AuthError::LocalRecordNotFound));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_hook_runs_before_save() {
        let store = MemoryUserStore::new();
        let config = RadiusConfig::default();
        let hook: RegistrationHook = Arc::new(|record: &mut UserRecord| {
            record.set("role", "member");
        });
        let resolver = RecordResolver::new(&store, Some(&hook), &config);

        let record = resolver
            .resolve(&credentials("bob", Some("corp")))
            .await
            .unwrap();

        assert_eq!(record.get("role"), Some("member"));
        let stored = store.find_by_login("bob").await.unwrap();
        assert_eq!(stored.get("role"), Some("member"));
    }

    /// Store that loses the duplicate-create race: the record is absent at
    /// find time but the save is refused by the uniqueness constraint.
    struct RacingStore;

    #[async_trait::async_trait]
    impl UserStore for RacingStore {
        async fn find_by_login(&self, _login: &str) -> Option<UserRecord> {
            None
        }

        async fn save(
            &self,
            _record: UserRecord,
        ) -> Result<UserRecord, crate::store::SaveRejection> {
            Err(crate::store::SaveRejection::new(vec![
                crate::store::FieldError::new("login", "has already been taken"),
            ]))
        }
    }

    #[tokio::test]
    async fn test_save_rejection_maps_to_creation_failed() {
        let store = RacingStore;
        let config = RadiusConfig::default();
        let resolver = RecordResolver::new(&store, None, &config);

        let result = resolver.resolve(&credentials("alice", Some("corp"))).await;

        match result {
            Err(AuthError::LocalRecordCreationFailed(rejection)) => {
                assert_eq!(rejection.to_string(), "login has already been taken");
            }
            other => panic!("expected LocalRecordCreationFailed, got {:?}", other),
        }
    }
}
