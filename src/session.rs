use bytes::Bytes;
use std::collections::HashSet;
use std::mem;
use std::net::SocketAddr;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::commands::{CommandError, Contract};
use crate::dispatch::Request;
use crate::frame::Frame;

/// A command accepted inside MULTI, run when EXEC arrives.
#[derive(Debug)]
pub struct Queued {
    pub contract: &'static Contract,
    pub request: Request,
}

#[derive(Debug, Default)]
struct Transaction {
    queue: Vec<Queued>,
    /// Set when a command failed validation while queueing; EXEC then aborts.
    errored: bool,
}

/// Per-connection state. Owned by the connection task; the rest of the server only knows the
/// session's id and its message sender.
#[derive(Debug)]
pub struct Session {
    id: u64,
    addr: Option<SocketAddr>,
    name: Option<String>,
    lib_name: Option<String>,
    lib_version: Option<String>,
    db: usize,
    channels: HashSet<Bytes>,
    patterns: HashSet<Bytes>,
    transaction: Option<Transaction>,
    closing: bool,
    messages: UnboundedSender<Frame>,
}

impl Session {
    /// Creates a session together with the receiving end of its out-of-band message channel,
    /// where published messages are delivered.
    pub fn new(id: u64, addr: Option<SocketAddr>) -> (Session, UnboundedReceiver<Frame>) {
        let (messages, rx) = mpsc::unbounded_channel();
        let session = Session {
            id,
            addr,
            name: None,
            lib_name: None,
            lib_version: None,
            db: 0,
            channels: HashSet::new(),
            patterns: HashSet::new(),
            transaction: None,
            closing: false,
            messages,
        };
        (session, rx)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn addr(&self) -> Option<SocketAddr> {
        self.addr
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn lib(&self) -> (Option<&str>, Option<&str>) {
        (self.lib_name.as_deref(), self.lib_version.as_deref())
    }

    pub fn set_lib_name(&mut self, name: String) {
        self.lib_name = Some(name);
    }

    pub fn set_lib_version(&mut self, version: String) {
        self.lib_version = Some(version);
    }

    pub fn db(&self) -> usize {
        self.db
    }

    pub fn select(&mut self, db: usize) {
        self.db = db;
    }

    pub fn messages(&self) -> UnboundedSender<Frame> {
        self.messages.clone()
    }

    pub fn channels(&self) -> &HashSet<Bytes> {
        &self.channels
    }

    pub fn patterns(&self) -> &HashSet<Bytes> {
        &self.patterns
    }

    pub fn channels_mut(&mut self) -> &mut HashSet<Bytes> {
        &mut self.channels
    }

    pub fn patterns_mut(&mut self) -> &mut HashSet<Bytes> {
        &mut self.patterns
    }

    /// Total number of channel and pattern subscriptions.
    pub fn subscriptions(&self) -> usize {
        self.channels.len() + self.patterns.len()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscriptions() > 0
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    pub fn close(&mut self) {
        self.closing = true;
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    pub fn begin(&mut self) -> Result<(), CommandError> {
        if self.transaction.is_some() {
            return Err(CommandError::NestedMulti);
        }
        self.transaction = Some(Transaction::default());
        Ok(())
    }

    pub fn queue(&mut self, contract: &'static Contract, request: Request) {
        if let Some(transaction) = self.transaction.as_mut() {
            transaction.queue.push(Queued { contract, request });
        }
    }

    /// Marks the open transaction, if any, as doomed.
    pub fn latch_error(&mut self) {
        if let Some(transaction) = self.transaction.as_mut() {
            transaction.errored = true;
        }
    }

    pub fn discard(&mut self) -> Result<(), CommandError> {
        self.transaction
            .take()
            .map(|_| ())
            .ok_or(CommandError::DiscardWithoutMulti)
    }

    /// Closes the transaction and hands back its queue. Either way the session leaves
    /// transaction mode.
    pub fn take_for_exec(&mut self) -> Result<Vec<Queued>, CommandError> {
        let transaction = self
            .transaction
            .take()
            .ok_or(CommandError::ExecWithoutMulti)?;

        if transaction.errored {
            return Err(CommandError::ExecAbort);
        }

        Ok(transaction.queue)
    }

    /// Drops transaction and subscription state, handing back the subscriptions so they can be
    /// removed from the broker.
    pub fn reset(&mut self) -> (HashSet<Bytes>, HashSet<Bytes>) {
        self.transaction = None;
        (
            mem::take(&mut self.channels),
            mem::take(&mut self.patterns),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::lookup;

    fn request(name: &str) -> Request {
        Request {
            name: name.to_string(),
            args: vec![],
        }
    }

    #[test]
    fn transaction_lifecycle() {
        let (mut session, _rx) = Session::new(1, None);

        assert_eq!(session.take_for_exec().err(), Some(CommandError::ExecWithoutMulti));
        assert_eq!(session.discard(), Err(CommandError::DiscardWithoutMulti));

        session.begin().unwrap();
        assert_eq!(session.begin(), Err(CommandError::NestedMulti));
        assert!(session.in_transaction());

        let ping = lookup("ping").unwrap();
        session.queue(ping, request("ping"));
        session.queue(ping, request("ping"));

        let queue = session.take_for_exec().unwrap();
        assert_eq!(queue.len(), 2);
        assert!(!session.in_transaction());
    }

    #[test]
    fn latched_transaction_aborts() {
        let (mut session, _rx) = Session::new(1, None);

        session.latch_error();
        session.begin().unwrap();
        session.latch_error();

        assert_eq!(session.take_for_exec().err(), Some(CommandError::ExecAbort));
        assert!(!session.in_transaction());
    }

    #[test]
    fn discard_leaves_transaction() {
        let (mut session, _rx) = Session::new(1, None);

        session.begin().unwrap();
        assert_eq!(session.discard(), Ok(()));
        assert!(!session.in_transaction());
    }
}
