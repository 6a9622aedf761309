use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum accepted secret length, in characters.
pub const MIN_SECRET_LEN: usize = 6;

/// Login identifier (an email address in practice). Compared exactly as given.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Identifier(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier(value.to_string())
    }
}

/// The user's password, which is also the API key forwarded to the catalog.
///
/// Stored and forwarded verbatim. `Debug` is redacted so it never ends up in logs.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_strong_enough(&self) -> bool {
        self.0.chars().count() >= MIN_SECRET_LEN
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Secret(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub identifier: Identifier,
    pub secret: Secret,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_strength_counts_characters() {
        assert!(!Secret::from("abcde").is_strong_enough());
        assert!(Secret::from("abcdef").is_strong_enough());
        // six multi-byte characters
        assert!(Secret::from("가나다라마바").is_strong_enough());
    }

    #[test]
    fn secret_debug_is_redacted() {
        let record = UserRecord {
            identifier: Identifier::from("a@x.com"),
            secret: Secret::from("hunter22"),
            created_at: Utc::now(),
        };
        let printed = format!("{record:?}");
        assert!(printed.contains("a@x.com"));
        assert!(!printed.contains("hunter22"));
    }

    #[test]
    fn user_record_serializes_plain_strings() {
        let record = UserRecord {
            identifier: Identifier::from("a@x.com"),
            secret: Secret::from("secret1"),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["identifier"], "a@x.com");
        assert_eq!(json["secret"], "secret1");
    }
}
