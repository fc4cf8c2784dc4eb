//! Single-flight token refresh
//!
//! At most one refresh-token exchange is in flight at any time. Every caller
//! that discovers an expired token (or a 401) while an exchange is running
//! awaits the same shared outcome. After the exchange settles, the outcome is
//! reused for a short cooldown so a burst of near-simultaneous 401s does not
//! fire a second exchange.

use crate::error::ApiError;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

type SharedOutcome = Shared<BoxFuture<'static, Result<String, Arc<ApiError>>>>;

struct Flight {
    outcome: SharedOutcome,
    settled_at: Option<Instant>,
}

/// Mutual-exclusion guard around the refresh exchange.
///
/// Owned by the session client instance; nothing here is process-global, so
/// independent clients (and tests) never share refresh state.
pub struct RefreshGate {
    cooldown: Duration,
    flight: Mutex<Option<Flight>>,
}

impl RefreshGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            flight: Mutex::new(None),
        }
    }

    /// Join the in-flight exchange if one exists (or one settled within the
    /// cooldown), otherwise start a new one from `run`.
    ///
    /// Resolves to the new access token.
    pub async fn run<F, Fut>(&self, run: F) -> Result<String, Arc<ApiError>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, ApiError>> + Send + 'static,
    {
        let outcome = {
            let mut flight = self.flight.lock().unwrap();

            let reusable = match flight.as_mut() {
                Some(entry) => {
                    if entry.outcome.peek().is_none() {
                        // Still in flight: join it
                        true
                    } else {
                        let settled = *entry.settled_at.get_or_insert_with(Instant::now);
                        settled.elapsed() < self.cooldown
                    }
                }
                None => false,
            };

            if reusable {
                flight.as_ref().unwrap().outcome.clone()
            } else {
                let fut = run();
                let outcome = async move { fut.await.map_err(Arc::new) }.boxed().shared();
                *flight = Some(Flight {
                    outcome: outcome.clone(),
                    settled_at: None,
                });
                outcome
            }
        };

        outcome.await
    }

    /// Forget any settled or in-flight outcome (used on logout)
    pub fn reset(&self) {
        *self.flight.lock().unwrap() = None;
    }
}
