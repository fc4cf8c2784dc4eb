//! API paths consumed by the store

use crate::model::{TaskId, TeamId, UserId};

pub const ME: &str = "/api/auth/users/me/";
pub const USERS: &str = "/api/auth/users/";
pub const TASKS: &str = "/api/core/tasks/";
pub const TASKS_BULK: &str = "/api/core/tasks/bulk/";
pub const TEAMS: &str = "/api/core/teams/";
pub const NOTIFICATIONS: &str = "/api/core/notifications/";

pub fn task(id: TaskId) -> String {
    format!("/api/core/tasks/{id}/")
}

pub fn task_comments(id: TaskId) -> String {
    format!("/api/core/tasks/{id}/comments/")
}

pub fn team(id: TeamId) -> String {
    format!("/api/core/teams/{id}/")
}

pub fn notification(id: i64) -> String {
    format!("/api/core/notifications/{id}/")
}

pub fn users_search(query: &str) -> String {
    format!("{}?search={}", USERS, urlencoding::encode(query))
}

pub fn teams_search(query: &str) -> String {
    format!("{}?search={}", TEAMS, urlencoding::encode(query))
}

/// Teams where the user is member, admin, or creator
pub fn teams_for_user(user: &UserId) -> String {
    let id = urlencoding::encode(user.as_str());
    format!("{TEAMS}?members={id}&admins={id}&created_by={id}")
}
