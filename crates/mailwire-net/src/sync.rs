//! Session serialization for callers that share one connection.

use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};

use crate::{NetError, Result};

/// A FIFO-fair asynchronous mutex guarding a protocol session.
///
/// Sessions are not safe for concurrent use; a caller that multiplexes one
/// session across tasks wraps it in a `SessionMutex` and holds the guard
/// for the duration of each command exchange. Waiters are served in FIFO
/// order and a cancelled waiter leaves the queue, both guaranteed by the
/// underlying `tokio::sync::Mutex`.
#[derive(Debug, Default)]
pub struct SessionMutex<T> {
    inner: Mutex<T>,
}

/// Scoped guard; the lock is released on drop.
pub type SessionGuard<'a, T> = MutexGuard<'a, T>;

impl<T> SessionMutex<T> {
    /// Creates a mutex owning the session value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    /// Acquires the lock, waiting behind earlier callers.
    pub async fn lock(&self) -> SessionGuard<'_, T> {
        self.inner.lock().await
    }

    /// Acquires the lock, giving up after `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::LockCancelled`] when the wait is cut short; the
    /// waiter is removed from the queue.
    pub async fn lock_for(&self, limit: Duration) -> Result<SessionGuard<'_, T>> {
        tokio::time::timeout(limit, self.inner.lock())
            .await
            .map_err(|_| NetError::LockCancelled)
    }

    /// Consumes the mutex and returns the session.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn guard_releases_on_drop() {
        let mutex = SessionMutex::new(0u32);
        {
            let mut guard = mutex.lock().await;
            *guard += 1;
        }
        assert_eq!(*mutex.lock().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn held_lock_cancels_waiter() {
        let mutex = SessionMutex::new(());
        let guard = mutex.lock().await;
        let result = mutex.lock_for(Duration::from_secs(1)).await;
        assert!(matches!(result, Err(NetError::LockCancelled)));
        drop(guard);
        assert!(mutex.lock_for(Duration::from_secs(1)).await.is_ok());
    }

    #[tokio::test]
    async fn serializes_concurrent_tasks() {
        use std::sync::Arc;

        let mutex = Arc::new(SessionMutex::new(Vec::new()));
        let mut handles = Vec::new();
        for i in 0..4u32 {
            let mutex = Arc::clone(&mutex);
            handles.push(tokio::spawn(async move {
                let mut guard = mutex.lock().await;
                guard.push(i);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(mutex.lock().await.len(), 4);
    }
}
