//! Session-aware HTTP client for the Crewdeck task API
//!
//! Owns the concerns every authenticated call shares:
//! - access/refresh token lifecycle (decode-only expiry inspection,
//!   single-flight refresh exchange, session teardown on rejection)
//! - deduplication of identical concurrent GETs
//! - durable session storage (tokens, cached user, UI selections)
//! - the paginated-or-plain list envelope
//!
//! # Example
//!
//! ```rust,no_run
//! use crewdeck_api_client::{ClientConfig, ListPayload, MemoryStore, SessionClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SessionClient::new(
//!     ClientConfig::new("https://api.crewdeck.example"),
//!     Arc::new(MemoryStore::new()),
//! );
//!
//! client.login("ada", "hunter2").await?;
//!
//! let tasks: ListPayload<serde_json::Value> = client.get_list("/api/core/tasks/").await?;
//! println!("{} tasks visible", tasks.total());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dedup;
pub mod error;
pub mod pagination;
pub mod refresh;
pub mod session;
pub mod storage;
pub mod token;

// Re-export main types
pub use config::ClientConfig;
pub use dedup::DedupCache;
pub use error::{ApiError, Result};
pub use pagination::ListPayload;
pub use refresh::RefreshGate;
pub use session::{RawResponse, SessionClient, SessionState};
pub use storage::{keys, FileStore, MemoryStore, SessionStore};
pub use token::{decode_unverified, is_expired, AccessClaims, TokenPair};
