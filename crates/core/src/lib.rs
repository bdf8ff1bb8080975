//! Canonical model and pure algorithms of the character resource sync engine.
//!
//! - [`entity`]: avatars, characters and the per-series collection.
//! - [`fingerprint`]: deterministic version hash of a collection.
//! - [`document`]: the published JSON projection.
//! - [`overrides`]: manual override document and merge.
//! - [`diff`]: avatars that still need publishing.
//! - [`capability`]: fetch / upload / adapter traits consumed by the pipeline.

pub mod capability;
pub mod diff;
pub mod document;
pub mod entity;
pub mod error;
pub mod fingerprint;
pub mod hashing;
pub mod overrides;
pub mod paths;

pub use capability::{Adapter, Fetcher, Uploader};
pub use document::{PublishedCharacter, PublishedDocument};
pub use entity::{Avatar, AvatarLocation, Character, CharacterKind, SeriesCollection};
pub use error::{SyncError, SyncResult};
pub use fingerprint::{compute_fingerprint, FingerprintAlgorithm};
