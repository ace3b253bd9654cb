//! Namespaced storage key derivation
//!
//! Every record lives under `authgear_<namespace>_<suffix>`, where the suffix is
//! fixed per [`SecretKind`]. Two namespaces can only collide if one of them
//! already embeds the delimiter followed by a kind suffix, so callers should
//! use plain identifiers as namespaces.

use std::fmt;

/// Prefix shared by every derived key
pub const KEY_PREFIX: &str = "authgear";

/// Separator between prefix, namespace and kind suffix
pub const KEY_DELIMITER: char = '_';

/// The kinds of secret a namespace can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretKind {
    RefreshToken,
    AnonymousKeyId,
    BiometricKeyId,
}

impl SecretKind {
    /// All kinds, in declaration order
    pub const ALL: [SecretKind; 3] = [
        SecretKind::RefreshToken,
        SecretKind::AnonymousKeyId,
        SecretKind::BiometricKeyId,
    ];

    /// Suffix appended to the namespace for this kind
    pub fn suffix(self) -> &'static str {
        match self {
            SecretKind::RefreshToken => "refreshToken",
            SecretKind::AnonymousKeyId => "anonymousKeyID",
            SecretKind::BiometricKeyId => "biometricKeyID",
        }
    }
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Maps (namespace, kind) pairs to physical storage keys
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyDeriver;

impl KeyDeriver {
    pub fn new() -> Self {
        Self
    }

    /// Derive the storage key for `kind` within `namespace`
    pub fn derive(&self, namespace: &str, kind: SecretKind) -> String {
        format!(
            "{prefix}{d}{namespace}{d}{suffix}",
            prefix = KEY_PREFIX,
            d = KEY_DELIMITER,
            suffix = kind.suffix()
        )
    }

    pub fn refresh_token(&self, namespace: &str) -> String {
        self.derive(namespace, SecretKind::RefreshToken)
    }

    pub fn anonymous_key_id(&self, namespace: &str) -> String {
        self.derive(namespace, SecretKind::AnonymousKeyId)
    }

    pub fn biometric_key_id(&self, namespace: &str) -> String {
        self.derive(namespace, SecretKind::BiometricKeyId)
    }
}
