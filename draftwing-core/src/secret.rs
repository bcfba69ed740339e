use serde::{Serialize, Serializer};
use std::fmt;

/// A wrapper for credentials that must not leak into logs.
///
/// `Secret<T>` replaces the inner value in `Debug` and `Display` output, so
/// API keys carried inside request descriptors can be traced safely.
///
/// # Examples
///
/// ```
/// use draftwing_core::Secret;
///
/// let api_key = Secret::new("sk-very-private");
/// assert_eq!(format!("{api_key:?}"), "[REDACTED]");
/// ```
#[derive(Clone)]
pub struct Secret<T>(T);

impl<T> Secret<T> {
    /// Wraps a credential
    pub fn new(value: T) -> Self {
        Secret(value)
    }

    /// Exposes the inner value for use in an outgoing request.
    ///
    /// Call sites should pass the result straight into a header or URL and
    /// never format it into a message.
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consumes the wrapper and returns the credential
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("••••••")
    }
}

// Serializing a credential is always a bug; configuration stores keys as
// plain fields before they are wrapped.
impl<T> Serialize for Secret<T> {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        unreachable!("Secret must never be serialized")
    }
}
