use crate::domain_model::*;
use crate::domain_port::KvError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("identifier already registered")]
    DuplicateIdentifier,
    #[error("secret must be at least {} characters", MIN_SECRET_LEN)]
    WeakSecret,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("stored data is corrupt: {0}")]
    StorageCorrupt(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<KvError> for CredentialError {
    fn from(err: KvError) -> Self {
        match err {
            KvError::Unavailable(e) => CredentialError::StorageUnavailable(e),
            KvError::Corrupt(e) => CredentialError::StorageCorrupt(e),
        }
    }
}

/// Local account registry plus the single process-wide session.
///
/// `LoggedOut -> LoggedIn` only through [`login`](Self::login),
/// `LoggedIn -> LoggedOut` only through [`logout`](Self::logout).
/// Registering never changes the session.
pub trait CredentialService: Send + Sync {
    fn register(&self, identifier: &Identifier, secret: &Secret)
    -> Result<UserRecord, CredentialError>;

    /// Exact match on (identifier, secret). On failure nothing is changed.
    fn login(&self, identifier: &Identifier, secret: &Secret)
    -> Result<UserRecord, CredentialError>;

    /// Idempotent.
    fn logout(&self);

    /// True when the active credential and the logged-in flag are both set.
    /// `currentUser` is not consulted, so if another process sharing the
    /// store removes only that key this stays true while
    /// [`current_identifier`](Self::current_identifier) is `None`.
    fn is_logged_in(&self) -> bool;

    /// `Some` iff logged in and `currentUser` is present.
    fn current_identifier(&self) -> Option<Identifier>;

    fn session(&self) -> SessionState {
        match self.current_identifier() {
            Some(identifier) => SessionState::LoggedIn { identifier },
            None => SessionState::LoggedOut,
        }
    }

    /// The secret of the logged-in user, forwarded to the catalog as its API key.
    fn active_credential(&self) -> Option<Secret>;

    /// Remember (or forget, with `None`) the identifier to pre-fill next login.
    fn remember_identifier(&self, identifier: Option<&Identifier>);

    fn remembered_identifier(&self) -> Option<Identifier>;
}
