use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Short user-facing outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: &'static str,
}

impl Notification {
    pub fn success(message: &'static str) -> Self {
        Self {
            level: NotificationLevel::Success,
            message,
        }
    }

    pub fn error(message: &'static str) -> Self {
        Self {
            level: NotificationLevel::Error,
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }

    /// CSS modifier used by the templates.
    pub fn css_class(&self) -> &'static str {
        match self.level {
            NotificationLevel::Success => "notice notice-success",
            NotificationLevel::Error => "notice notice-error",
        }
    }
}
