use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

const REDACTED: &str = "[REDACTED]";

/// Opaque wrapper around a secret string value (client secrets, access
/// tokens).
///
/// `Debug`, `Display` and `Serialize` all emit `[REDACTED]`, so a secret
/// never leaks through logs or a dumped configuration. Use
/// [`expose`](Self::expose) when building an HTTP header or form body.
///
/// `Deserialize` reads the plain value, which lets configuration files and
/// environment variables carry secrets directly.
///
/// On [`Drop`] the backing buffer is zeroed via the [`zeroize`] crate.
#[derive(Zeroize, ZeroizeOnDrop, Default)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new `SecretString` from a plain value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read-only access to the underlying secret.
    ///
    /// Callers must not log or persist the returned slice.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `true` when no secret was provided.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn debug_and_display_are_redacted() {
        let s = SecretString::new("hunter2");
        assert_eq!(format!("{s:?}"), "[REDACTED]");
        assert_eq!(format!("{s}"), "[REDACTED]");
    }

    #[test]
    fn expose_returns_original_value() {
        let s = SecretString::new("hunter2");
        assert_eq!(s.expose(), "hunter2");
        assert!(!s.is_empty());
        assert!(SecretString::default().is_empty());
    }

    #[test]
    fn serialize_never_emits_secret() {
        #[derive(Serialize)]
        struct Creds {
            secret: SecretString,
        }

        let json = serde_json::to_string(&Creds {
            secret: SecretString::new("super-secret-value"),
        })
        .unwrap();
        assert_eq!(json, r#"{"secret":"[REDACTED]"}"#);
    }

    #[test]
    fn deserialize_reads_plain_value() {
        #[derive(Deserialize)]
        struct Creds {
            secret: SecretString,
        }

        let creds: Creds = serde_json::from_str(r#"{"secret":"from-env"}"#).unwrap();
        assert_eq!(creds.secret.expose(), "from-env");
    }

    #[test]
    fn zeroize_clears_buffer() {
        let mut s = SecretString::new("sensitive");
        s.zeroize();
        assert!(s.0.is_empty(), "buffer should be empty after zeroize");
    }
}
