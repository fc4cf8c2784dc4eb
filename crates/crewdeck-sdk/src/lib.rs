//! Crewdeck SDK - task/team management client core
//!
//! The session-scoped data layer a Crewdeck frontend builds on:
//! - **Session client** (re-exported from `crewdeck-api-client`): bearer
//!   token lifecycle, single-flight refresh, GET deduplication.
//! - **Core data store**: in-memory teams/tasks/users/notifications plus the
//!   derived space partitioning (All / Individual / per-Team / Custom) and
//!   mutation commands with definite success/failure results.
//!
//! Views read snapshots from the store and invoke its commands; the store
//! translates them into API calls and reconciles local state against the
//! server's responses.
//!
//! # Example
//!
//! ```rust,no_run
//! use crewdeck_api_client::{ClientConfig, SessionClient};
//! use crewdeck_sdk::{CoreStore, CreateTask};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SessionClient::with_memory_store(ClientConfig::new("https://api.crewdeck.example"));
//! client.login("ada", "hunter2").await?;
//!
//! let store = CoreStore::new(client);
//! store.refresh_all().await;
//!
//! let created = store
//!     .add_task(CreateTask {
//!         name: "Ship release".into(),
//!         ..Default::default()
//!     })
//!     .await;
//!
//! if created.is_none() {
//!     eprintln!("{:?}", store.last_error().await);
//! }
//! # Ok(())
//! # }
//! ```

// API endpoint paths
pub mod endpoints;

// Error types
pub mod error;

// Wire-normalized data model
pub mod model;

// Core data store
pub mod store;

// Re-export model types
pub use model::{
    build_spaces, Comment, CreateComment, CreateTask, CreateTeam, MarkRead, NamedRef,
    Notification, ProfileUpdate, Space, SpaceKind, Task, TaskId, TaskPriority, TaskStatus, Team,
    TeamId, TeamRef, UpdateTask, User, UserId, UserRef, ALL_SPACE_ID, INDIVIDUAL_SPACE_ID,
};

// Re-export store types
pub use store::{CoreState, CoreStore};

// Re-export error types
pub use error::{Result, SdkError};

// Re-export from the underlying client crate
pub use crewdeck_api_client::{
    keys, ApiError, ClientConfig, FileStore, ListPayload, MemoryStore, SessionClient,
    SessionState, SessionStore, TokenPair,
};
