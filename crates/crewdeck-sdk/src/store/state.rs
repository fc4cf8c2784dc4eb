//! In-memory session state and its pure transitions
//!
//! Everything here is synchronous and side-effect free so the partition and
//! selection rules can be exercised without a network. The store wraps this
//! behind its lock and layers the HTTP calls on top.

use crate::model::{
    build_spaces, Notification, Space, SpaceKind, Task, TaskId, Team, User,
};

/// Session-scoped collections plus the derived space partitioning
#[derive(Debug, Default)]
pub struct CoreState {
    pub teams: Vec<Team>,
    pub tasks: Vec<Task>,
    pub users: Vec<User>,
    pub notifications: Vec<Notification>,
    pub spaces: Vec<Space>,
    pub selected_team: Option<Team>,
    pub selected_space: Option<Space>,
    /// Human-readable message of the most recent failed operation
    pub last_error: Option<String>,
}

impl CoreState {
    /// Replace the team collection, regenerate spaces, and restore the
    /// team/space selections from their stored ids where still valid.
    ///
    /// Selection rules: a stored team id is kept if it survives in the new
    /// list, else the first team wins (none when the list is empty). A stored
    /// space id is kept if it exists among the regenerated spaces, else `all`.
    pub fn apply_teams(
        &mut self,
        teams: Vec<Team>,
        stored_team_id: Option<&str>,
        stored_space_id: Option<&str>,
    ) {
        self.teams = teams;
        self.spaces = build_spaces(&self.teams);

        let restored_team = stored_team_id
            .and_then(|raw| raw.parse::<i64>().ok())
            .and_then(|id| self.teams.iter().find(|t| t.id == id))
            .cloned();
        self.selected_team = restored_team.or_else(|| self.teams.first().cloned());

        let restored_space = stored_space_id
            .and_then(|id| self.spaces.iter().find(|s| s.id == id))
            .cloned();
        self.selected_space = Some(restored_space.unwrap_or_else(Space::all));
    }

    /// Update the selected team; when the team has a matching team-space,
    /// the space selection follows it.
    pub fn select_team(&mut self, team: Option<Team>) {
        if let Some(ref team) = team {
            let space_id = Space::team_space_id(team.id);
            if let Some(space) = self.spaces.iter().find(|s| s.id == space_id) {
                self.selected_space = Some(space.clone());
            }
        }
        self.selected_team = team;
    }

    /// Update the selected space; unknown ids fall back to `all`. Selecting a
    /// team-space drags the team selection along with it.
    pub fn select_space(&mut self, space: Space) {
        let space = if self.spaces.iter().any(|s| s.id == space.id) {
            space
        } else {
            Space::all()
        };

        if space.kind == SpaceKind::Team {
            if let Some(team) = space
                .team_id
                .and_then(|id| self.teams.iter().find(|t| t.id == id))
            {
                self.selected_team = Some(team.clone());
            }
        }
        self.selected_space = Some(space);
    }

    /// Tasks belonging to the given space, recomputed from the current task
    /// list on every call. Unknown space ids produce an empty set.
    pub fn tasks_in_space(&self, space_id: &str) -> Vec<Task> {
        let Some(space) = self.spaces.iter().find(|s| s.id == space_id) else {
            return Vec::new();
        };

        match space.kind {
            SpaceKind::All => self.tasks.clone(),
            SpaceKind::Individual => self
                .tasks
                .iter()
                .filter(|t| t.is_individual())
                .cloned()
                .collect(),
            SpaceKind::Team => self
                .tasks
                .iter()
                .filter(|t| t.team_id() == space.team_id)
                .cloned()
                .collect(),
            // Reserved for server-defined groupings
            SpaceKind::Custom => Vec::new(),
        }
    }

    /// Append server-confirmed created tasks
    pub fn apply_created_tasks(&mut self, created: Vec<Task>) {
        self.tasks.extend(created);
    }

    /// Replace the matching task by id. Returns false (and changes nothing)
    /// when the id is not present locally.
    pub fn apply_updated_task(&mut self, updated: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// Remove a task by id
    pub fn remove_task(&mut self, id: TaskId) {
        self.tasks.retain(|t| t.id != id);
    }

    /// Mark a notification read in place
    pub fn apply_notification(&mut self, updated: Notification) {
        if let Some(slot) = self.notifications.iter_mut().find(|n| n.id == updated.id) {
            *slot = updated;
        }
    }

    pub fn unread_notifications(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }
}
