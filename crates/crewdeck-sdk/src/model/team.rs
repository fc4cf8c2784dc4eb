//! Team model

use super::user::{UserId, UserRef};
use serde::{Deserialize, Serialize};

pub type TeamId = i64;

/// A team the current user owns, administers, or belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub owner: UserRef,
    #[serde(default)]
    pub admins: Vec<UserRef>,
    #[serde(default)]
    pub members: Vec<UserRef>,
}

impl Team {
    /// Everyone on the team: owner, admins, members, de-duplicated by user
    /// id. Well-formed data never duplicates the owner into the other lists,
    /// but the roster tolerates it.
    pub fn roster(&self) -> Vec<UserRef> {
        let mut seen: Vec<UserRef> = vec![self.owner.clone()];
        for user in self.admins.iter().chain(self.members.iter()) {
            if !seen.contains(user) {
                seen.push(user.clone());
            }
        }
        seen
    }

    /// Whether the user appears anywhere on the team
    pub fn includes(&self, user: &UserId) -> bool {
        self.owner.id == *user
            || self.admins.iter().any(|u| u.id == *user)
            || self.members.iter().any(|u| u.id == *user)
    }
}

/// Body for creating a team
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateTeam {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub admins: Vec<UserId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team_json() -> &'static str {
        r#"{
            "id": 42,
            "name": "Platform",
            "description": "Infra team",
            "owner": {"id": 1, "username": "ada"},
            "admins": [{"id": 2, "username": "grace"}],
            "members": [{"id": 2, "username": "grace"}, {"id": "3", "username": "alan"}, 1]
        }"#
    }

    #[test]
    fn test_roster_deduplicates_by_id() {
        let team: Team = serde_json::from_str(team_json()).unwrap();
        let roster = team.roster();

        // ada (owner, also listed as bare id 1 in members), grace (admin and
        // member), alan
        assert_eq!(roster.len(), 3);
        assert_eq!(roster[0].id, UserId::from(1));
    }

    #[test]
    fn test_includes_matches_mixed_id_shapes() {
        let team: Team = serde_json::from_str(team_json()).unwrap();
        assert!(team.includes(&UserId::from(1)));
        assert!(team.includes(&UserId::from("3")));
        assert!(!team.includes(&UserId::from(99)));
    }
}
