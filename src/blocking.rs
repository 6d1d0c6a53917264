use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use tokio::time::Duration;

use crate::frame::Frame;
use crate::keyspace::{Keyspace, WrongType};
use crate::value::List;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Left,
    Right,
}

impl End {
    pub fn pop(self, list: &mut List) -> Option<Bytes> {
        match self {
            End::Left => list.pop_front(),
            End::Right => list.pop_back(),
        }
    }

    pub fn push(self, list: &mut List, element: Bytes) {
        match self {
            End::Left => list.push_front(element),
            End::Right => list.push_back(element),
        }
    }
}

/// What a waiter does with the element it is handed.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    /// BLPOP / BRPOP: reply with `[key, element]`.
    Pop(End),
    /// BRPOPLPUSH: pop from the right, push to the head of `destination`, reply with the element.
    PopPush { destination: String },
}

struct Waiter {
    db: usize,
    keys: Vec<String>,
    kind: Kind,
    tx: oneshot::Sender<Frame>,
}

#[derive(Default)]
struct State {
    next_id: u64,
    /// Waiter ids per `(db, key)`, oldest first.
    by_key: HashMap<(usize, String), VecDeque<u64>>,
    waiters: HashMap<u64, Waiter>,
}

impl State {
    /// Removes and returns the oldest live waiter on `(db, key)`, unlinking it from every other
    /// key it was waiting on.
    fn claim(&mut self, db: usize, key: &str) -> Option<Waiter> {
        let slot = (db, key.to_string());

        loop {
            let id = self.by_key.get_mut(&slot)?.pop_front();
            let Some(id) = id else {
                self.by_key.remove(&slot);
                return None;
            };

            let Some(waiter) = self.waiters.remove(&id) else {
                continue;
            };
            self.unlink(id, &waiter);

            if waiter.tx.is_closed() {
                continue;
            }

            return Some(waiter);
        }
    }

    fn unlink(&mut self, id: u64, waiter: &Waiter) {
        for key in &waiter.keys {
            let slot = (waiter.db, key.clone());
            if let Some(queue) = self.by_key.get_mut(&slot) {
                queue.retain(|other| *other != id);
                if queue.is_empty() {
                    self.by_key.remove(&slot);
                }
            }
        }
    }
}

/// A command suspended until an element shows up or its timeout elapses.
#[derive(Debug)]
pub struct Blocked {
    pub id: u64,
    pub rx: oneshot::Receiver<Frame>,
    /// `None` blocks forever.
    pub timeout: Option<Duration>,
}

/// Keeps clients blocked on list keys and hands them elements as they are pushed.
///
/// Waiters register while their database lock is still held, and every push serves waiters
/// under that same lock, so an element can never slip past a client that is about to block.
/// Waiters on a key are served in arrival order.
#[derive(Default)]
pub struct Coordinator {
    state: Mutex<State>,
}

impl Coordinator {
    pub fn new() -> Coordinator {
        Coordinator::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(
        &self,
        db: usize,
        keys: Vec<String>,
        kind: Kind,
        timeout: Option<Duration>,
    ) -> Blocked {
        let (tx, rx) = oneshot::channel();
        let mut state = self.state();

        state.next_id += 1;
        let id = state.next_id;

        for key in &keys {
            let queue = state.by_key.entry((db, key.clone())).or_default();
            if !queue.contains(&id) {
                queue.push_back(id);
            }
        }
        state.waiters.insert(id, Waiter { db, keys, kind, tx });

        Blocked { id, rx, timeout }
    }

    /// Deregisters a waiter. Returns `false` when it was already served, in which case its
    /// reply is (or is about to be) in its channel.
    pub fn cancel(&self, id: u64) -> bool {
        let mut state = self.state();
        match state.waiters.remove(&id) {
            Some(waiter) => {
                state.unlink(id, &waiter);
                true
            }
            None => false,
        }
    }

    /// Number of clients currently blocked.
    pub fn len(&self) -> usize {
        self.state().waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serves waiters blocked on `key` in database `db` for as long as the list has elements.
    /// Must be called with the database lock held, after every push to a list.
    pub fn serve(&self, db: usize, keyspace: &mut Keyspace, key: &str) {
        let mut pending = vec![key.to_string()];

        while let Some(key) = pending.pop() {
            loop {
                let has_elements = matches!(keyspace.read::<List>(&key), Ok(Some(list)) if !list.is_empty());
                if !has_elements {
                    break;
                }

                let Some(waiter) = self.state().claim(db, &key) else {
                    break;
                };

                let end = match waiter.kind {
                    Kind::Pop(end) => end,
                    Kind::PopPush { .. } => End::Right,
                };
                let Ok(Some(Some(element))) = keyspace.modify::<List, _>(&key, false, |list| end.pop(list))
                else {
                    break;
                };

                match waiter.kind {
                    Kind::Pop(_) => {
                        let reply = Frame::Array(vec![
                            Frame::Bulk(Bytes::from(key.clone())),
                            Frame::Bulk(element.clone()),
                        ]);
                        if waiter.tx.send(reply).is_err() {
                            restore(keyspace, &key, end, element);
                        }
                    }
                    Kind::PopPush { destination } => {
                        if keyspace.check::<List>(&destination).is_err() {
                            restore(keyspace, &key, end, element);
                            let _ = waiter.tx.send(Frame::Error(WrongType.to_string()));
                            continue;
                        }

                        if waiter.tx.send(Frame::Bulk(element.clone())).is_err() {
                            restore(keyspace, &key, end, element);
                            continue;
                        }

                        let _ = keyspace.modify::<List, _>(&destination, true, |list| {
                            list.push_front(element)
                        });
                        pending.push(destination);
                    }
                }
            }
        }
    }
}

/// Puts an element back where it was popped from.
fn restore(keyspace: &mut Keyspace, key: &str, end: End, element: Bytes) {
    let _ = keyspace.modify::<List, _>(key, true, |list| end.push(list, element));
}
