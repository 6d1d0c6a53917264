use std::sync::MutexGuard;

use crate::commands::CommandError;
use crate::frame::Frame;
use crate::keyspace::Keyspace;
use crate::session::Session;
use crate::store::Store;

/// What a command sees while it runs: the shared store and the session that issued it.
pub struct Context<'a> {
    pub store: &'a Store,
    pub session: &'a mut Session,
    /// Blocking commands may suspend the caller. Cleared inside EXEC and scripts, where they
    /// behave like their non-blocking counterparts.
    pub blocking: bool,
}

impl<'a> Context<'a> {
    pub fn new(store: &'a Store, session: &'a mut Session) -> Context<'a> {
        Context {
            store,
            session,
            blocking: true,
        }
    }

    /// Locks the session's selected database.
    pub fn keyspace(&self) -> MutexGuard<'a, Keyspace> {
        let store: &'a Store = self.store;
        store.db(self.session.db())
    }

    /// Hands freshly pushed list elements at `key` to clients blocked on it.
    pub fn wake(&self, keyspace: &mut Keyspace, key: &str) {
        self.store
            .blocking()
            .serve(self.session.db(), keyspace, key);
    }
}

pub trait Executable {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError>;
}
