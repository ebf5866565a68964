//! Client-side session state: the email form, the notification banner and
//! the generation workflow that ties them to storage and the agent.

pub mod email;
pub mod notification;
pub mod workflow;

pub use email::{EmailError, EmailForm, validate_email};
pub use notification::{Notification, NotificationKind, NotificationState};
pub use workflow::{GenerationRequest, GenerationState, Session};
