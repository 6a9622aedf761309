use super::storage_keys::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::notice::{Notice, NoticeBoard};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// [`CredentialService`] keeping accounts and the session in a [`KvStore`].
///
/// This is a local toy account model: secrets are stored in plain text
/// because the catalog needs them verbatim as its API key.
pub struct LocalCredentialStore {
    kv: Arc<dyn KvStore>,
    notices: Arc<NoticeBoard>,
}

impl LocalCredentialStore {
    /// Opens the store and reconciles whatever session was persisted.
    pub fn new(kv: Arc<dyn KvStore>, notices: Arc<NoticeBoard>) -> Self {
        let store = LocalCredentialStore { kv, notices };
        store.reconcile_session();
        store
    }

    /// A persisted "logged in" flag only counts if the active credential,
    /// the current identifier and a matching registry record are all there.
    /// Anything less is reset to logged out.
    pub fn reconcile_session(&self) {
        if self.read(LOGGED_IN_KEY).as_deref() != Some(LOGGED_IN_SENTINEL) {
            return;
        }

        let credential = self.read(ACTIVE_CREDENTIAL_KEY).map(Secret::new);
        let current = self.read(CURRENT_USER_KEY).map(Identifier::new);
        let valid = match (&current, &credential) {
            (Some(identifier), Some(secret)) => self
                .read_registry()
                .map(|users| {
                    users
                        .iter()
                        .any(|u| &u.identifier == identifier && &u.secret == secret)
                })
                .unwrap_or(false),
            _ => false,
        };

        if valid {
            debug!(identifier = ?current, "restored session");
        } else {
            info!("persisted session is stale, logging out");
            self.clear_session();
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.kv.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to read session key");
                None
            }
        }
    }

    /// Missing or unparseable registries read as empty.
    fn read_registry(&self) -> Result<Vec<UserRecord>, CredentialError> {
        let raw = match self.kv.get(USERS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(Vec::new()),
            Err(KvError::Corrupt(e)) => {
                self.report_corrupt_registry(&e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(users) => Ok(users),
            Err(e) => {
                self.report_corrupt_registry(&e.to_string());
                Ok(Vec::new())
            }
        }
    }

    fn report_corrupt_registry(&self, error: &str) {
        warn!(error, "user registry is unreadable, treating as empty");
        self.notices.post(Notice::from(&CredentialError::StorageCorrupt(
            error.to_string(),
        )));
    }

    fn write_registry(&self, users: &[UserRecord]) -> Result<(), CredentialError> {
        let raw = serde_json::to_string(users)
            .map_err(|e| CredentialError::StorageUnavailable(e.to_string()))?;
        self.kv.set(USERS_KEY, &raw)?;
        Ok(())
    }

    fn write_session(&self, record: &UserRecord) -> Result<(), KvError> {
        self.kv.set(ACTIVE_CREDENTIAL_KEY, record.secret.expose())?;
        self.kv.set(CURRENT_USER_KEY, record.identifier.as_str())?;
        self.kv.set(LOGGED_IN_KEY, LOGGED_IN_SENTINEL)?;
        Ok(())
    }

    fn restore(&self, key: &str, previous: Option<String>) {
        let result = match previous {
            Some(value) => self.kv.set(key, &value),
            None => self.kv.remove(key),
        };
        if let Err(e) = result {
            warn!(key, error = %e, "failed to roll back session key");
        }
    }

    fn clear_session(&self) {
        for key in [ACTIVE_CREDENTIAL_KEY, CURRENT_USER_KEY, LOGGED_IN_KEY] {
            if let Err(e) = self.kv.remove(key) {
                warn!(key, error = %e, "failed to clear session key");
                self.notices.post(Notice::from(&CredentialError::from(e)));
            }
        }
    }
}

impl CredentialService for LocalCredentialStore {
    fn register(
        &self,
        identifier: &Identifier,
        secret: &Secret,
    ) -> Result<UserRecord, CredentialError> {
        if !secret.is_strong_enough() {
            return Err(CredentialError::WeakSecret);
        }

        // read-modify-write of the whole list; a concurrent writer can lose
        // this record or have its own record lost
        let mut users = self.read_registry()?;
        if users.iter().any(|u| &u.identifier == identifier) {
            return Err(CredentialError::DuplicateIdentifier);
        }

        let record = UserRecord {
            identifier: identifier.clone(),
            secret: secret.clone(),
            created_at: Utc::now(),
        };
        users.push(record.clone());
        self.write_registry(&users)?;

        info!(%identifier, "registered");
        Ok(record)
    }

    fn login(
        &self,
        identifier: &Identifier,
        secret: &Secret,
    ) -> Result<UserRecord, CredentialError> {
        let users = self.read_registry()?;
        let Some(record) = users
            .into_iter()
            .find(|u| &u.identifier == identifier && &u.secret == secret)
        else {
            info!(%identifier, "login rejected");
            return Err(CredentialError::InvalidCredentials);
        };

        let keys = [ACTIVE_CREDENTIAL_KEY, CURRENT_USER_KEY, LOGGED_IN_KEY];
        let previous: Vec<Option<String>> = keys.iter().map(|key| self.read(key)).collect();

        if let Err(e) = self.write_session(&record) {
            warn!(%identifier, error = %e, "login could not be persisted, rolling back");
            for (key, value) in keys.into_iter().zip(previous) {
                self.restore(key, value);
            }
            return Err(e.into());
        }

        info!(%identifier, "logged in");
        Ok(record)
    }

    fn logout(&self) {
        let was_logged_in = self.is_logged_in();
        self.clear_session();
        if was_logged_in {
            info!("logged out");
        }
    }

    fn is_logged_in(&self) -> bool {
        self.read(ACTIVE_CREDENTIAL_KEY).is_some()
            && self.read(LOGGED_IN_KEY).as_deref() == Some(LOGGED_IN_SENTINEL)
    }

    fn current_identifier(&self) -> Option<Identifier> {
        if !self.is_logged_in() {
            return None;
        }
        self.read(CURRENT_USER_KEY).map(Identifier::new)
    }

    fn active_credential(&self) -> Option<Secret> {
        if !self.is_logged_in() {
            return None;
        }
        self.read(ACTIVE_CREDENTIAL_KEY).map(Secret::new)
    }

    fn remember_identifier(&self, identifier: Option<&Identifier>) {
        let result = match identifier {
            Some(identifier) => self.kv.set(SAVED_EMAIL_KEY, identifier.as_str()),
            None => self.kv.remove(SAVED_EMAIL_KEY),
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to persist remembered identifier");
            self.notices.post(Notice::from(&CredentialError::from(e)));
        }
    }

    fn remembered_identifier(&self) -> Option<Identifier> {
        self.read(SAVED_EMAIL_KEY).map(Identifier::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_kv::MemoryKvStore;

    fn store_on(kv: Arc<dyn KvStore>) -> (LocalCredentialStore, Arc<NoticeBoard>) {
        let notices = Arc::new(NoticeBoard::new());
        (LocalCredentialStore::new(kv, notices.clone()), notices)
    }

    fn fresh() -> (LocalCredentialStore, Arc<dyn KvStore>) {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        (store_on(kv.clone()).0, kv)
    }

    fn registry_len(kv: &Arc<dyn KvStore>) -> usize {
        let raw = kv.get(USERS_KEY).unwrap().unwrap_or_else(|| "[]".into());
        serde_json::from_str::<Vec<UserRecord>>(&raw).unwrap().len()
    }

    #[test]
    fn register_then_login() {
        let (store, _) = fresh();
        let id = Identifier::from("a@x.com");
        let secret = Secret::from("secret1");

        let record = store.register(&id, &secret).unwrap();
        assert_eq!(record.identifier, id);
        assert!(!store.is_logged_in());

        store.login(&id, &secret).unwrap();
        assert!(store.is_logged_in());
        assert_eq!(store.current_identifier(), Some(id.clone()));
        assert_eq!(store.active_credential(), Some(secret));
        assert_eq!(store.session(), SessionState::LoggedIn { identifier: id });
    }

    #[test]
    fn duplicate_identifier_is_rejected() {
        let (store, kv) = fresh();
        let id = Identifier::from("a@x.com");
        store.register(&id, &Secret::from("secret1")).unwrap();

        let err = store.register(&id, &Secret::from("other-secret")).unwrap_err();
        assert_eq!(err, CredentialError::DuplicateIdentifier);
        assert_eq!(registry_len(&kv), 1);
    }

    #[test]
    fn identifiers_are_case_sensitive() {
        let (store, kv) = fresh();
        store
            .register(&Identifier::from("a@x.com"), &Secret::from("secret1"))
            .unwrap();
        store
            .register(&Identifier::from("A@x.com"), &Secret::from("secret1"))
            .unwrap();
        assert_eq!(registry_len(&kv), 2);
    }

    #[test]
    fn weak_secret_creates_nothing() {
        let (store, kv) = fresh();
        let err = store
            .register(&Identifier::from("a@x.com"), &Secret::from("12345"))
            .unwrap_err();
        assert_eq!(err, CredentialError::WeakSecret);
        assert_eq!(registry_len(&kv), 0);
    }

    #[test]
    fn wrong_secret_leaves_session_untouched() {
        let (store, _) = fresh();
        let id = Identifier::from("a@x.com");
        store.register(&id, &Secret::from("secret1")).unwrap();

        let err = store.login(&id, &Secret::from("secret2")).unwrap_err();
        assert_eq!(err, CredentialError::InvalidCredentials);
        assert!(!store.is_logged_in());
        assert_eq!(store.current_identifier(), None);

        let other = Identifier::from("b@x.com");
        store.register(&other, &Secret::from("secret3")).unwrap();
        store.login(&other, &Secret::from("secret3")).unwrap();
        assert!(store.login(&id, &Secret::from("nope!!")).is_err());
        assert_eq!(store.current_identifier(), Some(other));
    }

    #[test]
    fn unknown_identifier_is_invalid_credentials() {
        let (store, _) = fresh();
        let err = store
            .login(&Identifier::from("ghost@x.com"), &Secret::from("secret1"))
            .unwrap_err();
        assert_eq!(err, CredentialError::InvalidCredentials);
    }

    #[test]
    fn logout_is_idempotent() {
        let (store, _) = fresh();
        let id = Identifier::from("a@x.com");
        store.register(&id, &Secret::from("secret1")).unwrap();
        store.login(&id, &Secret::from("secret1")).unwrap();

        store.logout();
        assert!(!store.is_logged_in());
        assert_eq!(store.current_identifier(), None);
        assert_eq!(store.active_credential(), None);
        store.logout();
        assert!(!store.is_logged_in());
    }

    #[test]
    fn session_survives_reopen() {
        let (store, kv) = fresh();
        let id = Identifier::from("a@x.com");
        store.register(&id, &Secret::from("secret1")).unwrap();
        store.login(&id, &Secret::from("secret1")).unwrap();
        drop(store);

        let (reopened, _) = store_on(kv);
        assert!(reopened.is_logged_in());
        assert_eq!(reopened.current_identifier(), Some(id));
    }

    #[test]
    fn stale_flag_without_credential_is_logged_out_on_open() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        kv.set(LOGGED_IN_KEY, LOGGED_IN_SENTINEL).unwrap();
        kv.set(CURRENT_USER_KEY, "a@x.com").unwrap();

        let (store, _) = store_on(kv.clone());
        assert!(!store.is_logged_in());
        assert_eq!(kv.get(LOGGED_IN_KEY).unwrap(), None);
        assert_eq!(kv.get(CURRENT_USER_KEY).unwrap(), None);
    }

    #[test]
    fn credential_not_in_registry_is_logged_out_on_open() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        kv.set(LOGGED_IN_KEY, LOGGED_IN_SENTINEL).unwrap();
        kv.set(CURRENT_USER_KEY, "a@x.com").unwrap();
        kv.set(ACTIVE_CREDENTIAL_KEY, "secret1").unwrap();

        let (store, _) = store_on(kv);
        assert!(!store.is_logged_in());
    }

    #[test]
    fn flag_must_equal_sentinel() {
        let (store, kv) = fresh();
        let id = Identifier::from("a@x.com");
        store.register(&id, &Secret::from("secret1")).unwrap();
        store.login(&id, &Secret::from("secret1")).unwrap();

        kv.set(LOGGED_IN_KEY, "yes").unwrap();
        assert!(!store.is_logged_in());
        assert_eq!(store.current_identifier(), None);
    }

    #[test]
    fn corrupt_registry_reads_as_empty_with_notice() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        kv.set(USERS_KEY, "{oops").unwrap();
        let (store, notices) = store_on(kv.clone());

        let err = store
            .login(&Identifier::from("a@x.com"), &Secret::from("secret1"))
            .unwrap_err();
        assert_eq!(err, CredentialError::InvalidCredentials);
        assert_eq!(notices.drain().len(), 1);

        store
            .register(&Identifier::from("a@x.com"), &Secret::from("secret1"))
            .unwrap();
        assert_eq!(registry_len(&kv), 1);
    }

    /// Memory store whose writes to one chosen key fail on demand.
    #[derive(Default)]
    struct FlakyKv {
        inner: MemoryKvStore,
        failing_key: std::sync::Mutex<Option<&'static str>>,
    }

    impl KvStore for FlakyKv {
        fn get(&self, key: &str) -> Result<Option<String>, KvError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
            if *self.failing_key.lock().unwrap() == Some(key) {
                return Err(KvError::Unavailable("quota exceeded".into()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), KvError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_login_write_restores_previous_session() {
        let kv = Arc::new(FlakyKv::default());
        let (store, _) = store_on(kv.clone());
        let a = Identifier::from("a@x.com");
        let b = Identifier::from("b@x.com");
        store.register(&a, &Secret::from("secret-a")).unwrap();
        store.register(&b, &Secret::from("secret-b")).unwrap();
        store.login(&b, &Secret::from("secret-b")).unwrap();

        *kv.failing_key.lock().unwrap() = Some(LOGGED_IN_KEY);
        let err = store.login(&a, &Secret::from("secret-a")).unwrap_err();
        assert!(matches!(err, CredentialError::StorageUnavailable(_)));

        assert!(store.is_logged_in());
        assert_eq!(store.current_identifier(), Some(b));
        assert_eq!(store.active_credential(), Some(Secret::from("secret-b")));
    }

    #[test]
    fn failed_registry_write_is_reported() {
        let kv = Arc::new(FlakyKv::default());
        *kv.failing_key.lock().unwrap() = Some(USERS_KEY);
        let (store, _) = store_on(kv.clone());

        let err = store
            .register(&Identifier::from("a@x.com"), &Secret::from("secret1"))
            .unwrap_err();
        assert!(matches!(err, CredentialError::StorageUnavailable(_)));
        assert_eq!(kv.get(USERS_KEY).unwrap(), None);
    }

    #[test]
    fn remembered_identifier_round_trip() {
        let (store, _) = fresh();
        assert_eq!(store.remembered_identifier(), None);
        let id = Identifier::from("a@x.com");
        store.remember_identifier(Some(&id));
        assert_eq!(store.remembered_identifier(), Some(id));
        store.remember_identifier(None);
        assert_eq!(store.remembered_identifier(), None);
    }

    #[test]
    fn missing_current_user_keeps_flag_but_hides_identity() {
        let (store, kv) = fresh();
        let id = Identifier::from("a@x.com");
        store.register(&id, &Secret::from("secret1")).unwrap();
        store.login(&id, &Secret::from("secret1")).unwrap();

        // another process sharing the store drops only this key
        kv.remove(CURRENT_USER_KEY).unwrap();
        assert!(store.is_logged_in());
        assert_eq!(store.current_identifier(), None);
        assert_eq!(store.session(), SessionState::LoggedOut);
    }
}
