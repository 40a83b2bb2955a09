use std::fmt::{self, Debug};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Source of the current time, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Entry<T> {
    value: T,
    stored_at: Instant,
}

/// An in-memory, thread-safe single-value cache that expires after a fixed TTL.
pub struct TimedCache<T> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: Arc<RwLock<Option<Entry<T>>>>,
}

impl<T> Debug for TimedCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let populated = self.entry.try_read().is_ok_and(|e| e.is_some());
        f.debug_struct("TimedCache")
            .field("ttl", &self.ttl)
            .field("populated", &populated)
            .finish()
    }
}

impl<T: Clone + Send + Sync> TimedCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entry: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the cached value while it is younger than the TTL.
    pub async fn get(&self) -> Option<T> {
        let entry = self.entry.read().await;
        entry.as_ref().and_then(|e| {
            let age = self.clock.now().saturating_duration_since(e.stored_at);
            (age < self.ttl).then(|| e.value.clone())
        })
    }

    pub async fn insert(&self, value: T) {
        let mut entry = self.entry.write().await;
        *entry = Some(Entry {
            value,
            stored_at: self.clock.now(),
        });
    }

    pub async fn invalidate(&self) {
        let mut entry = self.entry.write().await;
        *entry = None;
    }
}
