use bytes::Bytes;
use glob_match::glob_match;
use rand::seq::IteratorRandom;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error as ThisError;

use crate::value::{Container, Data, DataType, Value};

#[derive(Debug, ThisError, PartialEq)]
#[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
pub struct WrongType;

/// Milliseconds since the unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// A single logical database: keys mapped to typed values.
///
/// Expiration is lazy: every access to a key first drops it if its deadline has passed, so
/// callers never observe an expired value. Mutations that go through [`Keyspace::modify`] drop
/// the key when they leave its container empty.
#[derive(Debug, Default)]
pub struct Keyspace {
    entries: HashMap<String, Value>,
}

impl Keyspace {
    pub fn new() -> Keyspace {
        Keyspace::default()
    }

    /// Removes `key` if its TTL elapsed. Returns whether it was removed.
    fn expire_if_needed(&mut self, key: &str) -> bool {
        let now = now_millis();
        let expired = self
            .entries
            .get(key)
            .is_some_and(|value| value.is_expired(now));

        if expired {
            self.entries.remove(key);
        }

        expired
    }

    pub fn get(&mut self, key: &str) -> Option<&Value> {
        self.expire_if_needed(key);
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.expire_if_needed(key);
        self.entries.get_mut(key)
    }

    /// Unconditional write. Returns the value it replaced, if any.
    pub fn put(&mut self, key: String, value: Value) -> Option<Value> {
        self.expire_if_needed(&key);
        self.entries.insert(key, value)
    }

    /// Writes only when `key` is absent. Returns the existing value when nothing was written.
    pub fn put_if_absent(&mut self, key: String, value: Value) -> Option<&Value> {
        self.expire_if_needed(&key);
        match self.entries.entry(key) {
            Entry::Occupied(entry) => Some(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Replaces the data at `key` but keeps its TTL. Creates the key when it is missing.
    pub fn set_data(&mut self, key: &str, data: Data) {
        match self.get_mut(key) {
            Some(value) => value.data = data,
            None => {
                self.entries.insert(key.to_string(), Value::new(data));
            }
        }
    }

    /// Writes only when `key` is present. Returns the replaced value when something was written.
    pub fn put_if_present(&mut self, key: &str, value: Value) -> Option<Value> {
        self.get_mut(key)
            .map(|current| std::mem::replace(current, value))
    }

    /// Removes `key`, reporting whether it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.take(key).is_some()
    }

    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.expire_if_needed(key);
        self.entries.remove(key)
    }

    pub fn exists(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn type_of(&mut self, key: &str) -> Option<DataType> {
        self.get(key).map(Value::data_type)
    }

    pub fn is_type(&mut self, key: &str, data_type: DataType) -> bool {
        self.type_of(key) == Some(data_type)
    }

    /// Typed read access. A missing key is `Ok(None)`; a key of another type is an error.
    pub fn read<T: Container>(&mut self, key: &str) -> Result<Option<&T>, WrongType> {
        match self.get(key) {
            Some(value) => T::from_data(&value.data).map(Some).ok_or(WrongType),
            None => Ok(None),
        }
    }

    /// Runs `f` against the container stored at `key`.
    ///
    /// When the key is missing, `f` runs against a fresh container if `create` is set and the
    /// result is stored only if it ended up non-empty; otherwise `Ok(None)` is returned. A
    /// container left empty by `f` is removed together with its key.
    pub fn modify<T, R>(
        &mut self,
        key: &str,
        create: bool,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<Option<R>, WrongType>
    where
        T: Container,
    {
        self.expire_if_needed(key);

        match self.entries.get_mut(key) {
            Some(value) => {
                let container = T::from_data_mut(&mut value.data).ok_or(WrongType)?;
                let res = f(container);
                if value.data.is_empty_container() {
                    self.entries.remove(key);
                }
                Ok(Some(res))
            }
            None if create => {
                let mut container = T::default();
                let res = f(&mut container);
                let data = container.into_data();
                if !data.is_empty_container() {
                    self.entries.insert(key.to_string(), Value::new(data));
                }
                Ok(Some(res))
            }
            None => Ok(None),
        }
    }

    /// Fails when `key` holds a value that is not a `T`.
    pub fn check<T: Container>(&mut self, key: &str) -> Result<(), WrongType> {
        self.read::<T>(key).map(|_| ())
    }

    pub fn get_string(&mut self, key: &str) -> Result<Option<Bytes>, WrongType> {
        self.read::<Bytes>(key).map(|value| value.cloned())
    }

    /// Sets the absolute expiration of `key`, in unix milliseconds. Returns whether the key
    /// exists.
    pub fn expire(&mut self, key: &str, expires_at: u64) -> bool {
        match self.get_mut(key) {
            Some(value) => {
                value.expires_at = Some(expires_at);
                true
            }
            None => false,
        }
    }

    /// Clears the expiration of `key`. Returns whether a TTL was removed.
    pub fn persist(&mut self, key: &str) -> bool {
        self.get_mut(key)
            .and_then(|value| value.expires_at.take())
            .is_some()
    }

    /// Remaining time to live in milliseconds. `None` when the key is missing, `Some(None)`
    /// when it exists without a TTL.
    pub fn ttl(&mut self, key: &str) -> Option<Option<u64>> {
        let now = now_millis();
        self.get(key)
            .map(|value| value.expires_at.map(|at| at.saturating_sub(now)))
    }

    /// Keys matching a glob-style `pattern`, in no particular order.
    pub fn keys(&mut self, pattern: &str) -> Vec<String> {
        self.purge_expired();
        self.entries
            .keys()
            .filter(|key| pattern == "*" || glob_match(pattern, key))
            .cloned()
            .collect()
    }

    pub fn random_key(&mut self) -> Option<String> {
        self.purge_expired();
        self.entries.keys().choose(&mut rand::thread_rng()).cloned()
    }

    pub fn len(&mut self) -> usize {
        self.purge_expired();
        self.entries.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Number of live keys carrying a TTL.
    pub fn expires(&mut self) -> usize {
        self.purge_expired();
        self.entries
            .values()
            .filter(|value| value.expires_at.is_some())
            .count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops every expired key. Returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = now_millis();
        let before = self.entries.len();
        self.entries.retain(|_, value| !value.is_expired(now));
        before - self.entries.len()
    }
}
