//! Storage key derivation
//!
//! The request path and the storage namespace share a layout: the storage key
//! is the request path with the leading separator stripped. For convertible
//! images the key additionally swaps the source extension for the target
//! compressed extension, so the probe and the write always address the same
//! object. This is an explicit contract, not an implicit string transform.

use std::fmt;
use std::path::Path;

/// Identifier addressing an artifact within the durable store
///
/// StorageKey is a wrapper around the derived key string to provide type
/// safety and keep the path-to-key mapping in one place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Derive the key for a request path
    ///
    /// Strips any leading `/`; the rest of the path is used verbatim.
    pub fn from_path(request_path: &str) -> Self {
        Self(request_path.trim_start_matches('/').to_string())
    }

    /// Return the key with its extension replaced by `extension`
    ///
    /// `extension` is given without a leading dot (`"webp"`). A key without
    /// an extension gets one appended.
    pub fn with_extension(&self, extension: &str) -> Self {
        match self.0.rfind('.') {
            // A dot inside the final path segment is an extension separator
            Some(idx) if !self.0[idx..].contains('/') => {
                Self(format!("{}.{}", &self.0[..idx], extension))
            }
            _ => Self(format!("{}.{}", self.0, extension)),
        }
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extract the lowercased extension of a request path, if any
pub fn path_extension(request_path: &str) -> Option<String> {
    Path::new(request_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
