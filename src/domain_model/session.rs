use crate::domain_model::Identifier;

/// Process-wide login status. `LoggedIn` always carries the active identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn { identifier: Identifier },
}
