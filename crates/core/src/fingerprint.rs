//! Deterministic version fingerprint of a [`SeriesCollection`].
//!
//! The canonical string of a character is
//!
//! ```text
//! name:<sorted name values> avatars:<sorted avatar ids> types:<sorted types> tags:<tags>
//! ```
//!
//! with every list joined by a single comma. The collection fingerprint is
//! the hex digest of all character strings concatenated in ascending id
//! order. Published version markers were produced with MD5, so changing
//! [`DEFAULT_ALGORITHM`] invalidates every remote marker.

use std::fmt;
use std::str::FromStr;

use crate::entity::{Character, SeriesCollection};
use crate::hashing::{md5_hex, sha256_hex};

/// Algorithm the existing remote version markers were computed with.
pub const DEFAULT_ALGORITHM: FingerprintAlgorithm = FingerprintAlgorithm::Md5;

/// Digest used for the collection fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FingerprintAlgorithm {
    #[default]
    Md5,
    Sha256,
}

impl FingerprintAlgorithm {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
        }
    }

    /// Hex digest of `data` with this algorithm.
    pub fn digest_hex(&self, data: &[u8]) -> String {
        match self {
            Self::Md5 => md5_hex(data),
            Self::Sha256 => sha256_hex(data),
        }
    }
}

impl fmt::Display for FingerprintAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a configured algorithm name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fingerprint algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for FingerprintAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Canonical fingerprint string of one character.
pub fn character_fingerprint(character: &Character) -> String {
    let mut names: Vec<&str> = character.names().values().map(String::as_str).collect();
    names.sort_unstable();

    // BTreeMap / BTreeSet iteration is already sorted.
    let avatars: Vec<&str> = character.avatars().keys().map(String::as_str).collect();
    let types: Vec<&str> = character.types().iter().map(String::as_str).collect();

    format!(
        "name:{} avatars:{} types:{} tags:{}",
        names.join(","),
        avatars.join(","),
        types.join(","),
        character.tags().join(","),
    )
}

/// Fingerprint of the whole collection.
pub fn compute_fingerprint(collection: &SeriesCollection, algorithm: FingerprintAlgorithm) -> String {
    let canonical: String = collection
        .characters()
        .values()
        .map(character_fingerprint)
        .collect();
    algorithm.digest_hex(canonical.as_bytes())
}
