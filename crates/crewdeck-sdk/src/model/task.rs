//! Task model

use super::team::TeamId;
use super::user::{UserId, UserRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TaskId = i64;

/// Server-side task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Assigned,
    Received,
    InProcess,
    Completed,
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Medium,
    High,
}

/// Team reference on a task: a bare id or a partial team object, normalized
/// to id + optional name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawTeamRef")]
pub struct TeamRef {
    pub id: TeamId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PartialEq for TeamRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TeamRef {}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTeamRef {
    Id(TeamId),
    Object {
        id: TeamId,
        #[serde(default)]
        name: Option<String>,
    },
}

impl From<RawTeamRef> for TeamRef {
    fn from(raw: RawTeamRef) -> Self {
        match raw {
            RawTeamRef::Id(id) => TeamRef { id, name: None },
            RawTeamRef::Object { id, name } => TeamRef { id, name },
        }
    }
}

/// A task as mirrored from the server. The store never validates status
/// transitions; the server is the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub team: Option<TeamRef>,
    #[serde(default)]
    pub assigned_users: Vec<UserRef>,
    #[serde(default)]
    pub created_by: Option<UserRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Id of the owning team, if any
    pub fn team_id(&self) -> Option<TeamId> {
        self.team.as_ref().map(|t| t.id)
    }

    /// Whether this task lives outside any team
    pub fn is_individual(&self) -> bool {
        self.team.is_none()
    }

    pub fn is_assigned_to(&self, user: &UserId) -> bool {
        self.assigned_users.iter().any(|u| u.id == *user)
    }

    pub fn is_created_by(&self, user: &UserId) -> bool {
        self.created_by.as_ref().is_some_and(|u| u.id == *user)
    }
}

/// Body for creating a task.
///
/// A non-empty `assigned_user` list routes the call to the bulk endpoint,
/// which creates one task per assignee.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateTask {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assigned_user: Vec<UserId>,
}

impl CreateTask {
    /// Whether this create targets the bulk-by-assignee endpoint
    pub fn is_bulk(&self) -> bool {
        !self.assigned_user.is_empty()
    }
}

/// Partial-update body for a task
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_user: Option<Vec<UserId>>,
}
