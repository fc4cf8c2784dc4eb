//! Data model for the Crewdeck SDK
//!
//! Wire shapes are normalized at deserialization (string-or-number ids,
//! string-or-object references); everything downstream sees one canonical
//! form.

pub mod comment;
pub mod notification;
pub mod space;
pub mod task;
pub mod team;
pub mod user;

pub use comment::{Comment, CreateComment};
pub use notification::{MarkRead, Notification};
pub use space::{build_spaces, Space, SpaceKind, ALL_SPACE_ID, INDIVIDUAL_SPACE_ID};
pub use task::{CreateTask, Task, TaskId, TaskPriority, TaskStatus, TeamRef, UpdateTask};
pub use team::{CreateTeam, Team, TeamId};
pub use user::{NamedRef, ProfileUpdate, User, UserId, UserRef};
