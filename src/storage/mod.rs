//! Local persistence for the saved email and the last digest.
//!
//! Three independent string slots live in one key-value store:
//! - `parentingDigest_email`: the raw saved address
//! - `parentingDigest_lastDigest`: JSON-serialized [`DigestData`](crate::models::DigestData)
//! - `parentingDigest_lastGenerated`: RFC 3339 timestamp of the last successful run
//!
//! On disk the store is a single `storage.json` object in the data directory,
//! rewritten atomically on every change.

pub mod slots;
pub mod store;

pub use slots::{DIGEST_KEY, DigestStorage, EMAIL_KEY, LAST_GENERATED_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};
