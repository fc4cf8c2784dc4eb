//! Notification model

use super::task::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notification delivered to the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    /// Task this notification refers to, if any
    #[serde(default)]
    pub task: Option<TaskId>,
    pub created_at: DateTime<Utc>,
}

/// Body for marking a notification read
#[derive(Debug, Clone, Serialize)]
pub struct MarkRead {
    pub read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_defaults() {
        let json = r#"{"id": 1, "message": "Task assigned to you", "created_at": "2025-06-01T09:00:00Z"}"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert!(!n.read);
        assert_eq!(n.task, None);
    }
}
