use crate::application_port::*;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{}] {}", tag, self.message)
    }
}

impl From<&CredentialError> for Notice {
    fn from(error: &CredentialError) -> Self {
        match error {
            CredentialError::DuplicateIdentifier => {
                Notice::error("This email is already registered.")
            }
            CredentialError::WeakSecret => {
                Notice::error(format!(
                    "The password must be at least {} characters.",
                    crate::domain_model::MIN_SECRET_LEN
                ))
            }
            CredentialError::InvalidCredentials => {
                Notice::error("Email or password is incorrect.")
            }
            CredentialError::StorageCorrupt(_) => {
                Notice::warning("Saved data was unreadable and has been reset.")
            }
            CredentialError::StorageUnavailable(_) => {
                Notice::warning("Local storage is unavailable; changes were not saved.")
            }
        }
    }
}

impl From<&CatalogError> for Notice {
    fn from(error: &CatalogError) -> Self {
        match error {
            CatalogError::NotLoggedIn => Notice::warning("Please sign in first."),
            CatalogError::InvalidCredentials => Notice::error(
                "The catalog rejected your password as an API key. \
                 Register again with a valid TMDb API key.",
            ),
            CatalogError::NotFound => Notice::warning("That movie could not be found."),
            CatalogError::Status(code) => {
                Notice::error(format!("The catalog is unavailable (HTTP {}).", code))
            }
            CatalogError::Network(_) => Notice::error("Could not reach the catalog."),
            CatalogError::Parse(_) => Notice::error("The catalog sent an unexpected response."),
        }
    }
}

/// Thread-safe queue of pending notices, shared by the stores and the front end.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    pending: Mutex<VecDeque<Notice>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, notice: Notice) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.push_back(notice);
    }

    /// Take every pending notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }
}
