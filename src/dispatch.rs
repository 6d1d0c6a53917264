use bytes::Bytes;
use std::str;

use crate::blocking::Blocked;
use crate::commands::executable::Context;
use crate::commands::parser::CommandParser;
use crate::commands::{lookup, CommandError, Contract};
use crate::frame::Frame;
use crate::session::{Queued, Session};
use crate::store::Store;

/// A command as received: lowercased name plus raw arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub name: String,
    pub args: Vec<Bytes>,
}

impl Request {
    fn from_parts(mut parts: Vec<Bytes>) -> Result<Request, CommandError> {
        if parts.is_empty() {
            return Err(CommandError::Protocol("empty command".to_string()));
        }

        let name = parts.remove(0);
        let name = str::from_utf8(&name)
            .map_err(|_| CommandError::Protocol("invalid command name".to_string()))?
            .to_lowercase();

        Ok(Request { name, args: parts })
    }
}

impl TryFrom<Frame> for Request {
    type Error = CommandError;

    fn try_from(frame: Frame) -> Result<Self, Self::Error> {
        // Clients send commands as arrays of bulk strings, or as inline lines.
        let parts = match frame {
            Frame::Array(frames) => frames
                .into_iter()
                .map(|frame| match frame {
                    Frame::Bulk(bytes) => Ok(bytes),
                    Frame::Simple(s) => Ok(Bytes::from(s)),
                    Frame::Integer(n) => Ok(Bytes::from(n.to_string())),
                    frame => Err(CommandError::Protocol(format!(
                        "expected bulk string, got {}",
                        frame
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Frame::Unknown(parts) => parts,
            frame => {
                return Err(CommandError::Protocol(format!(
                    "expected array, got {}",
                    frame
                )))
            }
        };

        Request::from_parts(parts)
    }
}

/// The outcome of dispatching one request.
#[derive(Debug)]
pub enum Reply {
    Frame(Frame),
    /// Several replies to one request, e.g. one confirmation per channel for SUBSCRIBE.
    Frames(Vec<Frame>),
    /// The reply arrives later through the blocking coordinator.
    Blocked(Blocked),
}

impl From<Frame> for Reply {
    fn from(frame: Frame) -> Self {
        Reply::Frame(frame)
    }
}

impl Reply {
    fn error(err: CommandError) -> Reply {
        Reply::Frame(Frame::Error(err.to_string()))
    }
}

/// Runs one request through the pipeline: resolve, validate, then queue or execute. Every
/// failure is turned into an error reply; nothing escapes to the connection.
pub fn dispatch(store: &Store, session: &mut Session, frame: Frame) -> Reply {
    let request = match Request::try_from(frame) {
        Ok(request) => request,
        Err(err) => return Reply::error(err),
    };

    let name = request.name.clone();
    let reply = match route(store, session, request) {
        Ok(reply) => reply,
        Err(err) => Reply::error(err),
    };

    store.clients().update(session, &name);
    reply
}

fn route(store: &Store, session: &mut Session, request: Request) -> Result<Reply, CommandError> {
    let contract = match validate(store, session.db(), &request) {
        Ok(contract) => contract,
        Err(err) => {
            session.latch_error();
            return Err(err);
        }
    };

    if session.is_subscribed() && !contract.pubsub {
        return Err(CommandError::SubscribedContext {
            command: request.name,
        });
    }

    if session.in_transaction() && !contract.control {
        session.queue(contract, request);
        return Ok(Reply::Frame(Frame::Simple("QUEUED".to_string())));
    }

    let _shared;
    let _exclusive;
    if contract.exclusive {
        _exclusive = store.exclusive();
    } else {
        _shared = store.shared();
    }

    let mut ctx = Context::new(store, session);
    execute(&mut ctx, contract, request)
}

/// Resolves the contract and checks arity and the type of the first key.
fn validate(store: &Store, db: usize, request: &Request) -> Result<&'static Contract, CommandError> {
    let contract = lookup(&request.name).ok_or_else(|| CommandError::UnknownCommand {
        command: request.name.clone(),
    })?;

    contract.check_arity(request.args.len())?;

    if let Some(expected) = contract.value_type {
        let key = request.args.first().and_then(|key| str::from_utf8(key).ok());
        if let Some(key) = key {
            let actual = store.db(db).type_of(key);
            if actual.is_some_and(|actual| actual != expected) {
                return Err(CommandError::WrongType);
            }
        }
    }

    Ok(contract)
}

/// Parses and runs a validated request.
pub(crate) fn execute(
    ctx: &mut Context,
    contract: &'static Contract,
    request: Request,
) -> Result<Reply, CommandError> {
    let mut parser = CommandParser::new(request.args);
    let command = (contract.parse)(&mut parser)?;
    command.run(ctx)
}

/// Runs the commands queued by MULTI, in order, collecting one reply each. The caller holds the
/// exclusive gate.
pub(crate) fn execute_queued(ctx: &mut Context, queue: Vec<Queued>) -> Vec<Frame> {
    let blocking = ctx.blocking;
    ctx.blocking = false;

    let replies = queue
        .into_iter()
        .map(|queued| flatten(execute(ctx, queued.contract, queued.request)))
        .collect();

    ctx.blocking = blocking;
    replies
}

/// Runs a command on behalf of a script. The caller holds the exclusive gate.
pub(crate) fn call(ctx: &mut Context, args: Vec<Bytes>) -> Frame {
    let res = Request::from_parts(args).and_then(|request| {
        let contract = validate(ctx.store, ctx.session.db(), &request)?;
        if contract.control || contract.exclusive || contract.pubsub {
            return Err(CommandError::Script(
                "This Redis command is not allowed from script".to_string(),
            ));
        }
        execute(ctx, contract, request)
    });

    flatten(res)
}

fn flatten(res: Result<Reply, CommandError>) -> Frame {
    match res {
        Ok(Reply::Frame(frame)) => frame,
        Ok(Reply::Frames(frames)) => Frame::Array(frames),
        Ok(Reply::Blocked(_)) => Frame::Null,
        Err(err) => Frame::Error(err.to_string()),
    }
}

/// Dispatches `args` as one command and returns the reply, for tests.
#[cfg(test)]
pub(crate) fn run(store: &Store, session: &mut Session, args: &[&str]) -> Frame {
    let frame = Frame::Array(
        args.iter()
            .map(|arg| Frame::Bulk(Bytes::copy_from_slice(arg.as_bytes())))
            .collect(),
    );

    match dispatch(store, session, frame) {
        Reply::Frame(frame) => frame,
        Reply::Frames(frames) => Frame::Array(frames),
        Reply::Blocked(_) => panic!("command blocked"),
    }
}
