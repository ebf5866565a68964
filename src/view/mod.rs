//! Presentation-side derivations over a digest: topic groups, counts and
//! the current topic filter.

pub mod topics;

pub use topics::{EmptyState, TopicFilter, TopicGroup, empty_state, findings_for, topic_groups};
