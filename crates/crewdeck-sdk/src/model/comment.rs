//! Per-task chat messages

use super::task::TaskId;
use super::user::UserRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message on a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub task: Option<TaskId>,
    #[serde(default)]
    pub author: Option<UserRef>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Body for posting a comment
#[derive(Debug, Clone, Serialize)]
pub struct CreateComment {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user::UserId;

    #[test]
    fn test_comment_parses_with_scalar_author() {
        let json = r#"{"id": 5, "task": 10, "author": 2, "text": "on it", "created_at": "2025-06-01T09:00:00Z"}"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.author.unwrap().id, UserId::from(2));
        assert_eq!(comment.text, "on it");
    }
}
