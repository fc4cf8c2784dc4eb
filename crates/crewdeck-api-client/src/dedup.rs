//! Concurrent-request deduplication
//!
//! Collapses identical in-flight GETs into one underlying call and serves the
//! shared result for a short window after completion. Keyed by a
//! method+url+body signature. Mutating verbs never go through this cache.

use crate::error::ApiError;
use futures::future::{BoxFuture, FutureExt, Shared};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

type SharedOutcome<T> = Shared<BoxFuture<'static, Result<T, Arc<ApiError>>>>;

struct Entry<T: Clone> {
    inserted_at: Instant,
    outcome: SharedOutcome<T>,
}

/// Keyed single-flight cache with a short result-expiry window.
///
/// `get_or_run` with a key that is in flight, or that completed less than
/// `window` ago, returns the shared outcome instead of running again. Entries
/// still in flight are never evicted, so a slow request keeps absorbing
/// identical calls until it settles.
pub struct DedupCache<T: Clone> {
    window: Duration,
    entries: Mutex<HashMap<String, Entry<T>>>,
}

impl<T: Clone + Send + Sync + 'static> DedupCache<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the shared outcome for `key`, running `run` only if no live
    /// entry exists.
    pub async fn get_or_run<F, Fut>(&self, key: &str, run: F) -> Result<T, Arc<ApiError>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let outcome = {
            let mut entries = self.entries.lock().unwrap();

            let window = self.window;
            entries.retain(|_, e| {
                e.outcome.peek().is_none() || e.inserted_at.elapsed() < window
            });

            match entries.get(key) {
                Some(entry) => entry.outcome.clone(),
                None => {
                    let fut = run();
                    let outcome = async move { fut.await.map_err(Arc::new) }.boxed().shared();
                    entries.insert(
                        key.to_string(),
                        Entry {
                            inserted_at: Instant::now(),
                            outcome: outcome.clone(),
                        },
                    );
                    outcome
                }
            }
        };

        outcome.await
    }

    /// Number of live entries (in flight or within the window)
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

/// Request signature used as the dedup key
pub(crate) fn signature(method: &reqwest::Method, url: &str, body: Option<&[u8]>) -> String {
    let mut hasher = Sha256::new();
    if let Some(body) = body {
        hasher.update(body);
    }
    format!("{} {} {}", method, url, hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn counting(counter: Arc<AtomicUsize>, value: &str) -> impl Future<Output = Result<String, ApiError>> {
        let value = value.to_string();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            sleep(Duration::from_millis(20)).await;
            Ok(value)
        }
    }

    #[tokio::test]
    async fn test_concurrent_identical_calls_run_once() {
        let cache = Arc::new(DedupCache::new(Duration::from_millis(2000)));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_run("GET /tasks", move || counting(calls, "tasks"))
                    .await
            }));
        }

        for handle in handles {
            let result = handle.await.unwrap().unwrap();
            assert_eq!(result, "tasks");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_run_independently() {
        let cache = DedupCache::new(Duration::from_millis(2000));
        let calls = Arc::new(AtomicUsize::new(0));

        let a = cache
            .get_or_run("GET /tasks", {
                let calls = calls.clone();
                move || counting(calls, "tasks")
            })
            .await
            .unwrap();
        let b = cache
            .get_or_run("GET /teams", {
                let calls = calls.clone();
                move || counting(calls, "teams")
            })
            .await
            .unwrap();

        assert_eq!(a, "tasks");
        assert_eq!(b, "teams");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_window_expiry_reissues() {
        let cache = DedupCache::new(Duration::from_millis(40));
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            cache
                .get_or_run("GET /tasks", {
                    let calls = calls.clone();
                    move || counting(calls, "tasks")
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        sleep(Duration::from_millis(80)).await;

        cache
            .get_or_run("GET /tasks", {
                let calls = calls.clone();
                move || counting(calls, "tasks")
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_shared() {
        let cache = Arc::new(DedupCache::new(Duration::from_millis(2000)));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_run("GET /broken", move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        sleep(Duration::from_millis(20)).await;
                        Err::<String, _>(ApiError::Server {
                            status: 500,
                            message: "boom".into(),
                        })
                    })
                    .await
            }));
        }

        for handle in handles {
            let err = handle.await.unwrap().unwrap_err();
            assert!(matches!(&*err, ApiError::Server { status: 500, .. }));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_signature_varies_by_parts() {
        let get = reqwest::Method::GET;
        let post = reqwest::Method::POST;

        let a = signature(&get, "http://x/api/core/tasks/", None);
        let b = signature(&get, "http://x/api/core/tasks/", None);
        assert_eq!(a, b);

        assert_ne!(a, signature(&post, "http://x/api/core/tasks/", None));
        assert_ne!(a, signature(&get, "http://x/api/core/teams/", None));
        assert_ne!(
            signature(&post, "http://x/api/core/tasks/", Some(b"{\"name\":\"a\"}")),
            signature(&post, "http://x/api/core/tasks/", Some(b"{\"name\":\"b\"}"))
        );
    }
}
