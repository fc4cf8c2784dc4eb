//! Spaces: client-only task groupings
//!
//! A space is a synthetic partition of the task list used purely for view
//! filtering; nothing here is persisted server-side. Once teams have loaded
//! there is always exactly one `all` and one `individual` space plus one
//! `team_<id>` space per team, regenerated whenever the team list changes.

use super::team::{Team, TeamId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ALL_SPACE_ID: &str = "all";
pub const INDIVIDUAL_SPACE_ID: &str = "individual";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceKind {
    All,
    Individual,
    Team,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: String,
    pub name: String,
    pub kind: SpaceKind,
    /// Back-reference for `team`-type spaces
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
}

impl Space {
    pub fn all() -> Self {
        Self {
            id: ALL_SPACE_ID.to_string(),
            name: "All".to_string(),
            kind: SpaceKind::All,
            team_id: None,
        }
    }

    pub fn individual() -> Self {
        Self {
            id: INDIVIDUAL_SPACE_ID.to_string(),
            name: "Individual".to_string(),
            kind: SpaceKind::Individual,
            team_id: None,
        }
    }

    pub fn for_team(team: &Team) -> Self {
        Self {
            id: Self::team_space_id(team.id),
            name: team.name.clone(),
            kind: SpaceKind::Team,
            team_id: Some(team.id),
        }
    }

    /// Custom grouping stub: constructible client-side, always an empty
    /// partition until the server grows a definition for it
    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            id: format!("custom_{}", Uuid::new_v4()),
            name: name.into(),
            kind: SpaceKind::Custom,
            team_id: None,
        }
    }

    pub fn team_space_id(team_id: TeamId) -> String {
        format!("team_{team_id}")
    }
}

/// Derive the space collection for a team list: `all` + `individual` + one
/// team space per team, in team-list order.
pub fn build_spaces(teams: &[Team]) -> Vec<Space> {
    let mut spaces = Vec::with_capacity(teams.len() + 2);
    spaces.push(Space::all());
    spaces.push(Space::individual());
    spaces.extend(teams.iter().map(Space::for_team));
    spaces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user::UserRef;

    fn team(id: TeamId, name: &str) -> Team {
        Team {
            id,
            name: name.to_string(),
            description: String::new(),
            owner: UserRef::by_id(1),
            admins: Vec::new(),
            members: Vec::new(),
        }
    }

    #[test]
    fn test_build_spaces_shape_and_order() {
        let teams = vec![team(42, "Platform"), team(7, "Design")];
        let spaces = build_spaces(&teams);

        assert_eq!(spaces.len(), 4);
        assert_eq!(spaces[0].id, ALL_SPACE_ID);
        assert_eq!(spaces[1].id, INDIVIDUAL_SPACE_ID);
        assert_eq!(spaces[2].id, "team_42");
        assert_eq!(spaces[2].team_id, Some(42));
        assert_eq!(spaces[3].id, "team_7");
        assert_eq!(spaces[3].name, "Design");
    }

    #[test]
    fn test_build_spaces_without_teams() {
        let spaces = build_spaces(&[]);
        assert_eq!(spaces.len(), 2);
        assert!(spaces.iter().any(|s| s.kind == SpaceKind::All));
        assert!(spaces.iter().any(|s| s.kind == SpaceKind::Individual));
    }

    #[test]
    fn test_custom_space_ids_are_unique() {
        let a = Space::custom("Backlog");
        let b = Space::custom("Backlog");
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("custom_"));
        assert_eq!(a.kind, SpaceKind::Custom);
    }
}
