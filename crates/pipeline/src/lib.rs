//! Publish pipeline of the character resource sync engine.
//!
//! [`Pipeline`] drives one series through population, override merge,
//! fingerprint comparison and, when needed, the incremental avatar upload
//! followed by publication of the version marker, the document and the
//! local snapshot.

pub mod encoder;
pub mod overrides;
pub mod snapshot;
pub mod update;

pub use encoder::{AvatarEncoder, Rendition, WebpEncoder};
pub use snapshot::SnapshotStore;
pub use update::{Phase, Pipeline, PublishSummary, UpdateOptions, UpdateOutcome};
