use bytes::Bytes;
use tokio::time::Duration;

use crate::blocking::{End, Kind};
use crate::commands::executable::Context;
use crate::commands::parser::{parse_float, CommandParser};
use crate::commands::CommandError;
use crate::dispatch::Reply;
use crate::frame::Frame;
use crate::value::List;

/// BLPOP and BRPOP: the blocking versions of LPOP and RPOP.
///
/// The first non-empty list among `keys` is popped and `[key, element]` returned. When all of them
/// are empty the client blocks until another client pushes to one of the keys or `timeout`
/// elapses, in which case nil is returned. Inside MULTI or a script the command never blocks.
///
/// Ref: <https://redis.io/docs/latest/commands/blpop/>
#[derive(Debug, PartialEq)]
pub struct BPop {
    pub keys: Vec<String>,
    pub end: End,
    /// `None` blocks forever.
    pub timeout: Option<Duration>,
}

/// Parses a blocking timeout given in seconds. Zero means forever.
pub(crate) fn parse_timeout(bytes: &[u8]) -> Result<Option<Duration>, CommandError> {
    let seconds = parse_float(bytes)
        .ok_or_else(|| CommandError::range("timeout is not a float or out of range"))?;

    if seconds < 0.0 {
        return Err(CommandError::range("timeout is negative"));
    }
    if seconds == 0.0 {
        return Ok(None);
    }

    Duration::try_from_secs_f64(seconds)
        .map(Some)
        .map_err(|_| CommandError::range("timeout is out of range"))
}

impl BPop {
    pub fn parse(parser: &mut CommandParser, end: End) -> Result<BPop, CommandError> {
        let mut args = parser.rest_bytes();
        let timeout = match args.pop() {
            Some(timeout) => parse_timeout(&timeout)?,
            None => return Err(CommandError::Syntax),
        };

        let keys = args
            .into_iter()
            .map(|key| String::from_utf8(key.to_vec()).map_err(|_| CommandError::Syntax))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BPop { keys, end, timeout })
    }

    pub fn run(self, ctx: &mut Context) -> Result<Reply, CommandError> {
        let mut keyspace = ctx.keyspace();
        let end = self.end;

        for key in &self.keys {
            let popped = keyspace
                .modify::<List, _>(key, false, |list| end.pop(list))?
                .flatten();

            if let Some(element) = popped {
                let reply = Frame::Array(vec![
                    Frame::Bulk(Bytes::from(key.clone())),
                    Frame::Bulk(element),
                ]);
                return Ok(reply.into());
            }
        }

        if !ctx.blocking {
            return Ok(Frame::Null.into());
        }

        let blocked = ctx.store.blocking().register(
            ctx.session.db(),
            self.keys,
            Kind::Pop(end),
            self.timeout,
        );
        Ok(Reply::Blocked(blocked))
    }
}
