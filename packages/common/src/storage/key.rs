use std::fmt;

use uuid::Uuid;

use super::error::StorageError;

/// A validated blob storage key.
///
/// Keys are the 32-character lowercase hex form of the owning record's UUID,
/// so a key maps 1:1 to exactly one record and is never reused.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BlobKey(String);

impl BlobKey {
    /// Derive the storage key for a record identifier.
    pub fn from_id(id: Uuid) -> Self {
        Self(id.as_simple().to_string())
    }

    /// Parse a key previously produced by [`BlobKey::from_id`].
    ///
    /// Rejects anything that is not exactly 32 lowercase hex characters, so a
    /// corrupted `storage_path` in a metadata record surfaces as an error
    /// instead of a probe at an arbitrary filesystem location.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        if s.len() != 32 {
            return Err(StorageError::InvalidKey(format!(
                "expected 32 hex characters, got {}",
                s.len()
            )));
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(StorageError::InvalidKey(
                "key must be lowercase hex".into(),
            ));
        }

        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 2 hex characters (shard directory for filesystem layout).
    pub fn shard_prefix(&self) -> &str {
        &self.0[..2]
    }

    /// Remaining 30 hex characters (filename within the shard).
    pub fn shard_suffix(&self) -> &str {
        &self.0[2..]
    }
}

impl fmt::Debug for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobKey({})", self.0)
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
