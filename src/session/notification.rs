/// Kind of user-facing status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Holds at most one notification until it is dismissed or replaced
#[derive(Debug, Clone, Default)]
pub struct NotificationState {
    current: Option<Notification>,
}

impl NotificationState {
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(NotificationKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(NotificationKind::Error, message);
    }

    fn show(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.current = Some(Notification { kind, message: message.into() });
    }

    /// Returns whether anything was dismissed
    pub fn dismiss(&mut self) -> bool {
        self.current.take().is_some()
    }
}
