use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;

use crate::session::Session;

#[derive(Debug, Clone)]
struct ClientInfo {
    addr: String,
    name: String,
    lib_name: String,
    lib_version: String,
    db: usize,
    connected_at: Instant,
    last_command: String,
    subscriptions: usize,
}

/// Snapshot of every connected client, as shown by CLIENT LIST and INFO.
#[derive(Default)]
pub struct Clients {
    clients: Mutex<BTreeMap<u64, ClientInfo>>,
}

impl Clients {
    pub fn new() -> Clients {
        Clients::default()
    }

    fn clients(&self) -> MutexGuard<'_, BTreeMap<u64, ClientInfo>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, session: &Session) {
        let info = ClientInfo {
            addr: session.addr().map(|addr| addr.to_string()).unwrap_or_default(),
            name: String::new(),
            lib_name: String::new(),
            lib_version: String::new(),
            db: session.db(),
            connected_at: Instant::now(),
            last_command: "NULL".to_string(),
            subscriptions: 0,
        };
        self.clients().insert(session.id(), info);
    }

    /// Refreshes a client's entry after it ran `command`.
    pub fn update(&self, session: &Session, command: &str) {
        let mut clients = self.clients();
        let Some(info) = clients.get_mut(&session.id()) else {
            return;
        };

        let (lib_name, lib_version) = session.lib();
        info.name = session.name().unwrap_or_default().to_string();
        info.lib_name = lib_name.unwrap_or_default().to_string();
        info.lib_version = lib_version.unwrap_or_default().to_string();
        info.db = session.db();
        info.last_command = command.to_string();
        info.subscriptions = session.subscriptions();
    }

    pub fn remove(&self, id: u64) {
        self.clients().remove(&id);
    }

    pub fn len(&self) -> usize {
        self.clients().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One line per client in the `key=value` format of CLIENT LIST.
    pub fn list(&self) -> String {
        let mut out = String::new();
        for (id, info) in self.clients().iter() {
            let _ = writeln!(
                out,
                "id={} addr={} name={} age={} db={} sub={} cmd={} lib-name={} lib-ver={}",
                id,
                info.addr,
                info.name,
                info.connected_at.elapsed().as_secs(),
                info.db,
                info.subscriptions,
                info.last_command,
                info.lib_name,
                info.lib_version,
            );
        }
        out
    }
}
