//! Serde adapter for human readable [`Duration`] values (`30s`, `1m 30s`).
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Http {
//!     #[serde(with = "assetkit_utils::humantime_serde")]
//!     request_timeout: Duration,
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserializer, Serializer, de};

/// Serializes a `Duration` as a humantime string.
///
/// # Errors
/// Propagates the serializer's error.
pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&humantime::format_duration(*d))
}

/// Deserializes a `Duration` from a humantime string.
///
/// # Errors
/// Returns an `invalid_value` error when the string is not a duration.
pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
    d.deserialize_str(DurationVisitor)
}

struct DurationVisitor;

impl de::Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a duration such as \"30s\" or \"1m 30s\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
        humantime::parse_duration(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Serialize, Deserialize)]
    struct Foo {
        #[serde(with = "super")]
        timeout: Duration,
    }

    #[test]
    fn parses_and_formats() {
        let foo: Foo = serde_json::from_str(r#"{"timeout": "10m 10s"}"#).unwrap();
        assert_eq!(foo.timeout, Duration::new(610, 0));
        let reverse = serde_json::to_string(&foo).unwrap();
        assert_eq!(reverse, r#"{"timeout":"10m 10s"}"#);
    }

    #[test]
    fn rejects_garbage() {
        let result: Result<Foo, _> = serde_json::from_str(r#"{"timeout": "soon"}"#);
        let err = result.err().unwrap().to_string();
        assert!(err.contains("soon"), "unexpected error: {err}");
    }
}
