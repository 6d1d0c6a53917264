use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::time::{self, Duration, Instant};
use tracing::debug;
use uuid::Uuid;

use crate::blocking::Coordinator;
use crate::clients::Clients;
use crate::config::Config;
use crate::keyspace::Keyspace;
use crate::pubsub::Broker;
use crate::script::{ScriptEngine, Scripts};

/// The Store owns every logical database plus the shared services commands reach through it:
/// the blocking coordinator, the pub/sub broker, the client registry and the script cache. It is
/// cheap to clone and safe to share between connection tasks.
#[derive(Clone)]
pub struct Store {
    inner: Arc<InnerStore>,
}

pub struct InnerStore {
    databases: Vec<Mutex<Keyspace>>,
    /// Ordinary commands hold it shared while they run; EXEC and scripts hold it exclusively so
    /// nothing interleaves with them.
    gate: RwLock<()>,
    blocking: Coordinator,
    broker: Broker,
    clients: Clients,
    scripts: Scripts,
    config: Config,
    next_client_id: AtomicU64,
    run_id: String,
    started_at: Instant,
}

impl Store {
    pub fn new(config: Config) -> Store {
        Store::build(config, None)
    }

    pub fn with_engine(config: Config, engine: Arc<dyn ScriptEngine>) -> Store {
        Store::build(config, Some(engine))
    }

    fn build(config: Config, engine: Option<Arc<dyn ScriptEngine>>) -> Store {
        let databases = (0..config.databases.max(1))
            .map(|_| Mutex::new(Keyspace::new()))
            .collect();

        let inner = Arc::new(InnerStore {
            databases,
            gate: RwLock::new(()),
            blocking: Coordinator::new(),
            broker: Broker::new(),
            clients: Clients::new(),
            scripts: Scripts::new(engine),
            config,
            next_client_id: AtomicU64::new(1),
            run_id: Uuid::new_v4().simple().to_string(),
            started_at: Instant::now(),
        });

        Store { inner }
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new(Config::default())
    }
}

impl Deref for Store {
    type Target = InnerStore;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl InnerStore {
    /// Locks database `index`. Callers validate the index beforehand.
    pub fn db(&self, index: usize) -> MutexGuard<'_, Keyspace> {
        self.databases[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks two distinct databases, always in ascending index order.
    pub fn lock_pair(
        &self,
        a: usize,
        b: usize,
    ) -> (MutexGuard<'_, Keyspace>, MutexGuard<'_, Keyspace>) {
        debug_assert_ne!(a, b);
        if a < b {
            let first = self.db(a);
            let second = self.db(b);
            (first, second)
        } else {
            let second = self.db(b);
            let first = self.db(a);
            (first, second)
        }
    }

    pub fn databases(&self) -> usize {
        self.databases.len()
    }

    pub fn shared(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn exclusive(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn blocking(&self) -> &Coordinator {
        &self.blocking
    }

    pub fn broker(&self) -> &Broker {
        &self.broker
    }

    pub fn clients(&self) -> &Clients {
        &self.clients
    }

    pub fn scripts(&self) -> &Scripts {
        &self.scripts
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn next_client_id(&self) -> u64 {
        self.next_client_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Drops expired keys from every database. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        (0..self.databases.len())
            .map(|index| self.db(index).purge_expired())
            .sum()
    }
}

/// Periodically drops expired keys so that keys nobody reads again do not linger. Reads expire
/// keys on their own; this only bounds memory.
pub async fn sweep_expired_keys(store: Store, every: Duration) {
    let mut interval = time::interval(every);
    interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let removed = store.purge_expired();
        if removed > 0 {
            debug!(removed, "swept expired keys");
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::keyspace::now_millis;
    use crate::value::{Data, Value};

    fn expiring(at: u64) -> Value {
        Value::with_expiration(Data::String(Bytes::from("v")), Some(at))
    }

    #[test]
    fn databases_are_independent() {
        let store = Store::default();

        store.db(0).put("key".to_string(), Value::from(Bytes::from("a")));

        assert!(store.db(0).exists("key"));
        assert!(!store.db(1).exists("key"));
        assert_eq!(store.databases(), 16);
    }

    #[test]
    fn lock_pair_returns_guards_in_argument_order() {
        let store = Store::default();
        store.db(3).put("key".to_string(), Value::from(Bytes::from("a")));

        let (mut from, mut to) = store.lock_pair(3, 1);

        assert!(from.exists("key"));
        assert!(!to.exists("key"));
    }

    #[test]
    fn purge_expired_covers_every_database() {
        let store = Store::default();
        let past = now_millis() - 1;

        store.db(0).put("a".to_string(), expiring(past));
        store.db(5).put("b".to_string(), expiring(past));
        store.db(5).put("c".to_string(), expiring(now_millis() + 60_000));

        assert_eq!(store.purge_expired(), 2);
        assert_eq!(store.db(5).len(), 1);
    }

    #[tokio::test]
    async fn sweeper_removes_expired_keys() {
        time::pause();
        let store = Store::default();
        store.db(0).put("a".to_string(), expiring(now_millis() - 1));

        let handle = tokio::spawn(sweep_expired_keys(store.clone(), Duration::from_millis(100)));
        time::sleep(Duration::from_millis(150)).await;

        assert_eq!(store.db(0).purge_expired(), 0);
        handle.abort();
    }
}
