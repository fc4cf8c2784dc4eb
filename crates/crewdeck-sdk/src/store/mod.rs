//! Core data store
//!
//! Single source of truth, scoped to the authenticated session, for teams,
//! tasks, users, and notifications, plus the derived space partitioning.
//! Fetches replace collections wholesale; mutations reconcile local state
//! against the server's response. Fetch failures keep the stale collections
//! and record a message instead of clearing state.

mod state;

pub use state::CoreState;

use crate::endpoints;
use crate::error::{Result, SdkError};
use crate::model::{
    Comment, CreateComment, CreateTask, CreateTeam, MarkRead, Notification, ProfileUpdate, Space,
    Task, TaskId, Team, TeamId, UpdateTask, User,
};
use crewdeck_api_client::{keys, ApiError, ListPayload, SessionClient};
use tokio::sync::RwLock;

/// Session-scoped data store over the Crewdeck API
///
/// # Example
///
/// ```rust,no_run
/// use crewdeck_api_client::{ClientConfig, SessionClient};
/// use crewdeck_sdk::CoreStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SessionClient::with_memory_store(ClientConfig::new("https://api.crewdeck.example"));
/// client.login("ada", "hunter2").await?;
///
/// let store = CoreStore::new(client);
/// store.refresh_all().await;
///
/// for task in store.tasks_by_space("all").await {
///     println!("{} [{:?}]", task.name, task.status);
/// }
/// # Ok(())
/// # }
/// ```
pub struct CoreStore {
    client: SessionClient,
    state: RwLock<CoreState>,
}

impl CoreStore {
    pub fn new(client: SessionClient) -> Self {
        Self {
            client,
            state: RwLock::new(CoreState::default()),
        }
    }

    /// The underlying session client
    pub fn client(&self) -> &SessionClient {
        &self.client
    }

    // ==================== Snapshots ====================

    pub async fn teams(&self) -> Vec<Team> {
        self.state.read().await.teams.clone()
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.state.read().await.tasks.clone()
    }

    pub async fn users(&self) -> Vec<User> {
        self.state.read().await.users.clone()
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.state.read().await.notifications.clone()
    }

    pub async fn unread_notifications(&self) -> usize {
        self.state.read().await.unread_notifications()
    }

    pub async fn spaces(&self) -> Vec<Space> {
        self.state.read().await.spaces.clone()
    }

    pub async fn selected_team(&self) -> Option<Team> {
        self.state.read().await.selected_team.clone()
    }

    pub async fn selected_space(&self) -> Option<Space> {
        self.state.read().await.selected_space.clone()
    }

    /// Message of the most recent failed operation, if any
    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    pub async fn clear_error(&self) {
        self.state.write().await.last_error = None;
    }

    // ==================== Fetches ====================

    /// Fetch everything the session needs in one sweep
    pub async fn refresh_all(&self) {
        self.refresh_teams().await;
        self.refresh_tasks().await;
        self.refresh_users().await;
        self.refresh_notifications().await;
    }

    /// Fetch teams where the current user is member, admin, or creator;
    /// regenerate spaces and restore selections from durable storage.
    pub async fn refresh_teams(&self) {
        let user = match self.current_user().await {
            Some(user) => user,
            None => {
                self.record_error("load teams", SdkError::NoSession.to_string())
                    .await;
                return;
            }
        };

        match self
            .client
            .get_list::<Team>(&endpoints::teams_for_user(&user.id))
            .await
        {
            Ok(payload) => {
                let (stored_team, stored_space) = self.stored_selection();
                let mut state = self.state.write().await;
                state.apply_teams(
                    payload.into_items(),
                    stored_team.as_deref(),
                    stored_space.as_deref(),
                );
                state.last_error = None;
                self.persist_selection(&state);
            }
            Err(err) => self.record_error("load teams", err.to_string()).await,
        }
    }

    /// Fetch the full task collection visible to the user
    pub async fn refresh_tasks(&self) {
        match self.client.get_list::<Task>(endpoints::TASKS).await {
            Ok(payload) => {
                let mut state = self.state.write().await;
                state.tasks = payload.into_items();
                state.last_error = None;
            }
            Err(err) => self.record_error("load tasks", err.to_string()).await,
        }
    }

    /// Fetch all users visible to the current user
    pub async fn refresh_users(&self) {
        match self.client.get_list::<User>(endpoints::USERS).await {
            Ok(payload) => {
                let mut state = self.state.write().await;
                state.users = payload.into_items();
                state.last_error = None;
            }
            Err(err) => self.record_error("load users", err.to_string()).await,
        }
    }

    /// Fetch the notification list
    pub async fn refresh_notifications(&self) {
        match self
            .client
            .get_list::<Notification>(endpoints::NOTIFICATIONS)
            .await
        {
            Ok(payload) => {
                let mut state = self.state.write().await;
                state.notifications = payload.into_items();
                state.last_error = None;
            }
            Err(err) => {
                self.record_error("load notifications", err.to_string())
                    .await
            }
        }
    }

    // ==================== Derivations ====================

    /// Tasks in the given space, recomputed from current state on every call
    pub async fn tasks_by_space(&self, space_id: &str) -> Vec<Task> {
        self.state.read().await.tasks_in_space(space_id)
    }

    // ==================== Task mutations ====================

    /// Create a task. A non-empty `assigned_user` list goes through the
    /// bulk-by-assignee endpoint, which may return several created tasks.
    ///
    /// Returns the first created task, or `None` on failure (error recorded,
    /// local state unchanged).
    pub async fn add_task(&self, input: CreateTask) -> Option<Task> {
        let created: std::result::Result<Vec<Task>, ApiError> = if input.is_bulk() {
            self.client
                .post::<ListPayload<Task>, _>(endpoints::TASKS_BULK, &input)
                .await
                .map(ListPayload::into_items)
        } else {
            self.client
                .post::<Task, _>(endpoints::TASKS, &input)
                .await
                .map(|task| vec![task])
        };

        match created {
            Ok(tasks) => {
                let first = tasks.first().cloned();
                let mut state = self.state.write().await;
                state.apply_created_tasks(tasks);
                state.last_error = None;
                first
            }
            Err(err) => {
                self.record_error("create task", err.to_string()).await;
                None
            }
        }
    }

    /// Partial-update a task. On success the local copy is replaced by id;
    /// on failure local state is unchanged and `None` is returned.
    pub async fn update_task(&self, id: TaskId, update: UpdateTask) -> Option<Task> {
        match self
            .client
            .patch::<Task, _>(&endpoints::task(id), &update)
            .await
        {
            Ok(task) => {
                let mut state = self.state.write().await;
                state.apply_updated_task(task.clone());
                state.last_error = None;
                Some(task)
            }
            Err(err) => {
                self.record_error("update task", err.to_string()).await;
                None
            }
        }
    }

    /// Delete a task. Returns whether the delete was confirmed; local state
    /// only changes on success.
    pub async fn delete_task(&self, id: TaskId) -> bool {
        match self.client.delete(&endpoints::task(id)).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                state.remove_task(id);
                state.last_error = None;
                true
            }
            Err(err) => {
                self.record_error("delete task", err.to_string()).await;
                false
            }
        }
    }

    // ==================== Selection ====================

    /// Select a team (or none). When the team has a team-space, the space
    /// selection follows. Both selections are persisted.
    pub async fn set_selected_team(&self, team: Option<Team>) {
        let mut state = self.state.write().await;
        state.select_team(team);
        self.persist_selection(&state);
    }

    /// Select a space; team-typed spaces drag the team selection along.
    /// Unknown space ids fall back to `all`.
    pub async fn set_selected_space(&self, space: Space) {
        let mut state = self.state.write().await;
        state.select_space(space);
        self.persist_selection(&state);
    }

    /// Append a custom space (client-only extension point; its partition is
    /// always empty and it does not survive a team refresh)
    pub async fn add_custom_space(&self, name: impl Into<String>) -> Space {
        let space = Space::custom(name);
        self.state.write().await.spaces.push(space.clone());
        space
    }

    // ==================== Current user ====================

    /// Current user from the durable cache, if present
    pub fn cached_me(&self) -> Option<User> {
        let raw = self.client.storage().get(keys::CACHED_USER)?;
        serde_json::from_str(&raw).ok()
    }

    /// Fetch the current user profile and refresh the durable cache
    pub async fn me(&self) -> Result<User> {
        let user: User = self.client.get(endpoints::ME).await?;
        self.cache_user(&user);
        Ok(user)
    }

    /// Partial-update the current user profile
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User> {
        let user: User = self.client.patch(endpoints::ME, &update).await?;
        self.cache_user(&user);
        Ok(user)
    }

    /// Replace the current user profile wholesale
    pub async fn replace_profile(&self, profile: &User) -> Result<User> {
        let user: User = self.client.put(endpoints::ME, profile).await?;
        self.cache_user(&user);
        Ok(user)
    }

    async fn current_user(&self) -> Option<User> {
        if let Some(user) = self.cached_me() {
            return Some(user);
        }
        self.me().await.ok()
    }

    fn cache_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.client.storage().set(keys::CACHED_USER, &json),
            Err(err) => tracing::warn!("Failed to cache user profile: {}", err),
        }
    }

    // ==================== Directory and teams ====================

    /// Search the user directory
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>> {
        let payload = self
            .client
            .get_list::<User>(&endpoints::users_search(query))
            .await?;
        Ok(payload.into_items())
    }

    /// Fetch a single team by id
    pub async fn get_team(&self, id: TeamId) -> Result<Team> {
        Ok(self.client.get(&endpoints::team(id)).await?)
    }

    /// Search teams by name
    pub async fn search_teams(&self, query: &str) -> Result<Vec<Team>> {
        let payload = self
            .client
            .get_list::<Team>(&endpoints::teams_search(query))
            .await?;
        Ok(payload.into_items())
    }

    /// Create a team and fold it into the local team list (spaces are
    /// regenerated, selections restored)
    pub async fn create_team(&self, input: CreateTeam) -> Result<Team> {
        let team: Team = self.client.post(endpoints::TEAMS, &input).await?;

        let (stored_team, stored_space) = self.stored_selection();
        let mut state = self.state.write().await;
        let mut teams = state.teams.clone();
        teams.push(team.clone());
        state.apply_teams(teams, stored_team.as_deref(), stored_space.as_deref());
        self.persist_selection(&state);

        Ok(team)
    }

    // ==================== Notifications and comments ====================

    /// Mark a notification read and update the local copy
    pub async fn mark_notification_read(&self, id: i64) -> Result<Notification> {
        let updated: Notification = self
            .client
            .patch(&endpoints::notification(id), &MarkRead { read: true })
            .await?;
        self.state.write().await.apply_notification(updated.clone());
        Ok(updated)
    }

    /// Chat messages of a task (not cached in the store)
    pub async fn task_comments(&self, task_id: TaskId) -> Result<Vec<Comment>> {
        let payload = self
            .client
            .get_list::<Comment>(&endpoints::task_comments(task_id))
            .await?;
        Ok(payload.into_items())
    }

    /// Post a chat message on a task
    pub async fn add_comment(&self, task_id: TaskId, text: impl Into<String>) -> Result<Comment> {
        let comment: Comment = self
            .client
            .post(
                &endpoints::task_comments(task_id),
                &CreateComment { text: text.into() },
            )
            .await?;
        Ok(comment)
    }

    // ==================== Internals ====================

    fn stored_selection(&self) -> (Option<String>, Option<String>) {
        let store = self.client.storage();
        (store.get(keys::SELECTED_TEAM), store.get(keys::SELECTED_SPACE))
    }

    fn persist_selection(&self, state: &CoreState) {
        let store = self.client.storage();
        match &state.selected_team {
            Some(team) => store.set(keys::SELECTED_TEAM, &team.id.to_string()),
            None => store.remove(keys::SELECTED_TEAM),
        }
        match &state.selected_space {
            Some(space) => store.set(keys::SELECTED_SPACE, &space.id),
            None => store.remove(keys::SELECTED_SPACE),
        }
    }

    async fn record_error(&self, what: &str, err: String) {
        tracing::warn!("Failed to {}: {}", what, err);
        self.state.write().await.last_error = Some(format!("Failed to {what}: {err}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SpaceKind;
    use crewdeck_api_client::{ClientConfig, MemoryStore};
    use std::sync::Arc;

    fn offline_store() -> CoreStore {
        let client = SessionClient::new(
            ClientConfig::new("http://localhost:9"),
            Arc::new(MemoryStore::new()),
        );
        CoreStore::new(client)
    }

    fn team(id: i64, name: &str) -> Team {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "owner": {"id": 1, "username": "ada"},
        }))
        .unwrap()
    }

    fn task(id: i64, name: &str, team: Option<i64>) -> Task {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "status": "assigned",
            "priority": "medium",
            "team": team,
            "created_at": "2025-06-01T09:00:00Z",
            "updated_at": "2025-06-01T09:00:00Z",
        }))
        .unwrap()
    }

    async fn seed_teams(store: &CoreStore, teams: Vec<Team>) {
        store.state.write().await.apply_teams(teams, None, None);
    }

    #[tokio::test]
    async fn test_set_selected_team_syncs_space_and_persists() {
        let store = offline_store();
        seed_teams(&store, vec![team(42, "Platform"), team(7, "Design")]).await;

        store.set_selected_team(Some(team(42, "Platform"))).await;

        let space = store.selected_space().await.expect("space selected");
        assert_eq!(space.id, "team_42");

        let storage = store.client().storage();
        assert_eq!(storage.get(keys::SELECTED_TEAM), Some("42".to_string()));
        assert_eq!(storage.get(keys::SELECTED_SPACE), Some("team_42".to_string()));
    }

    #[tokio::test]
    async fn test_set_selected_space_syncs_team_and_persists() {
        let store = offline_store();
        seed_teams(&store, vec![team(42, "Platform"), team(7, "Design")]).await;

        let design_space = store
            .spaces()
            .await
            .into_iter()
            .find(|s| s.id == "team_7")
            .expect("team space");
        store.set_selected_space(design_space).await;

        assert_eq!(store.selected_team().await.map(|t| t.id), Some(7));
        assert_eq!(
            store.client().storage().get(keys::SELECTED_TEAM),
            Some("7".to_string())
        );
    }

    #[tokio::test]
    async fn test_tasks_by_space_reads_current_state() {
        let store = offline_store();
        seed_teams(&store, vec![team(42, "Platform")]).await;
        store.state.write().await.tasks =
            vec![task(1, "solo", None), task(2, "platform", Some(42))];

        assert_eq!(store.tasks_by_space("all").await.len(), 2);
        assert_eq!(store.tasks_by_space("individual").await.len(), 1);
        assert_eq!(store.tasks_by_space("team_42").await.len(), 1);
        assert!(store.tasks_by_space("team_999").await.is_empty());
    }

    #[tokio::test]
    async fn test_cached_me_roundtrip() {
        let store = offline_store();
        assert!(store.cached_me().is_none());

        store.client().storage().set(
            keys::CACHED_USER,
            r#"{"id": 5, "username": "ada", "first_name": "Ada", "last_name": "Lovelace"}"#,
        );

        let user = store.cached_me().expect("cached user");
        assert_eq!(user.username, "ada");
    }

    #[tokio::test]
    async fn test_add_custom_space_is_listed_but_empty() {
        let store = offline_store();
        seed_teams(&store, vec![team(42, "Platform")]).await;
        store.state.write().await.tasks = vec![task(1, "solo", None)];

        let custom = store.add_custom_space("Backlog").await;
        assert_eq!(custom.kind, SpaceKind::Custom);
        assert!(store.spaces().await.iter().any(|s| s.id == custom.id));
        assert!(store.tasks_by_space(&custom.id).await.is_empty());
    }
}
