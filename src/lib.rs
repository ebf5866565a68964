//! Parenting Science Digest - ask a research agent for the latest parenting
//! science and browse what it found
//!
//! The crate keeps everything on this side of the agent call:
//!
//! - Saving and validating the recipient email address
//! - Calling the agent with a fixed instruction and normalizing its loosely
//!   shaped reply into a typed [`DigestData`]
//! - Persisting the last digest to a local JSON key-value file
//! - Grouping findings by topic for the terminal UI and the `show` command
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use parenting_digest::{DigestStorage, MemoryStore, Session, UnconfiguredClient};
//!
//! let storage = DigestStorage::new(MemoryStore::new());
//! storage.save_email("parent@example.com")?;
//!
//! let mut session = Session::load(storage, Duration::from_millis(500));
//! if let Err(e) = session.generate(&UnconfiguredClient) {
//!     println!("{}", e.user_message());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod agent;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod session;
pub mod storage;
pub mod tui;
pub mod utils;
pub mod view;

// Re-export commonly used types
pub use agent::{AgentClient, AgentEnvelope, HttpAgentClient, UnconfiguredClient};
pub use error::GenerationError;
pub use models::{DigestData, Finding};
pub use normalizer::normalize_reply;
pub use session::{Session, validate_email};
pub use storage::{DigestStorage, FileStore, KeyValueStore, MemoryStore};
pub use view::{findings_for, topic_groups};
