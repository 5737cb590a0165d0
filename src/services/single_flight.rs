use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};

type Table<K, T> = Mutex<HashMap<K, Shared<BoxFuture<'static, T>>>>;

/// Collapses concurrent calls for the same key onto one in-flight future.
///
/// The shared future is driven by its own task, so it runs to completion and
/// clears its entry even when every caller has gone away. Nothing is cached:
/// the next call after that starts a fresh one.
pub struct SingleFlight<K, T>
where
    T: Clone,
{
    in_flight: Arc<Table<K, T>>,
}

impl<K, T> Default for SingleFlight<K, T>
where
    T: Clone,
{
    fn default() -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, T> SingleFlight<K, T>
where
    K: Eq + Hash + Clone + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Await the in-flight call for `key`, or start one with `start`.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn run<F, Fut>(&self, key: K, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (shared, started) = {
            let mut map = lock(&self.in_flight);
            match map.get(&key) {
                // A resolved entry is stale; its driver just hasn't removed it yet.
                Some(existing) if existing.peek().is_none() => (existing.clone(), false),
                _ => {
                    let fresh = start().boxed().shared();
                    map.insert(key.clone(), fresh.clone());
                    (fresh, true)
                }
            }
        };

        if started {
            self.drive(key, shared.clone());
        }
        shared.await
    }

    /// Number of keys with a call currently in flight.
    pub fn in_flight(&self) -> usize {
        lock(&self.in_flight).len()
    }

    fn drive(&self, key: K, shared: Shared<BoxFuture<'static, T>>) {
        let table = Arc::clone(&self.in_flight);
        tokio::spawn(async move {
            shared.clone().await;
            let mut map = lock(&table);
            if map.get(&key).is_some_and(|current| current.ptr_eq(&shared)) {
                map.remove(&key);
            }
        });
    }
}

fn lock<K, T>(table: &Table<K, T>) -> MutexGuard<'_, HashMap<K, Shared<BoxFuture<'static, T>>>> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_calls_share_one_execution() {
        let flight: Arc<SingleFlight<&'static str, usize>> = Arc::new(SingleFlight::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let flight = flight.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                flight
                    .run("student", move || async move {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        calls.fetch_add(1, Ordering::SeqCst) + 1
                    })
                    .await
            }));
        }

        for h in handles {
            assert_eq!(h.await.unwrap(), 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(flight.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_different_keys_run_independently() {
        let flight: Arc<SingleFlight<&'static str, &'static str>> = Arc::new(SingleFlight::new());
        let a = flight.run("student", || async { "a" });
        let b = flight.run("admin", || async { "b" });
        let (a, b) = tokio::join!(a, b);
        assert_eq!((a, b), ("a", "b"));
    }

    #[tokio::test]
    async fn test_sequential_calls_are_not_cached() {
        let flight: SingleFlight<u8, usize> = SingleFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for expected in 1..=3 {
            let calls = calls.clone();
            let got = flight
                .run(1, move || async move { calls.fetch_add(1, Ordering::SeqCst) + 1 })
                .await;
            assert_eq!(got, expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_call_still_completes_and_clears_entry() {
        let flight: SingleFlight<u8, usize> = SingleFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let mut pending = Box::pin(flight.run(7, move || async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            counter.fetch_add(1, Ordering::SeqCst)
        }));
        assert!(futures_util::poll!(&mut pending).is_pending());
        drop(pending);
        assert_eq!(flight.in_flight(), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(flight.in_flight(), 0);
    }
}
