use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::keyspace::Keyspace;
use crate::value::List;

/// Atomically removes the last element of the list stored at `source` and pushes it to the head
/// of the list stored at `destination`. When both keys are the same the list is rotated.
///
/// Ref: <https://redis.io/docs/latest/commands/rpoplpush/>
#[derive(Debug, PartialEq)]
pub struct Rpoplpush {
    pub source: String,
    pub destination: String,
}

/// Moves one element from the tail of `source` to the head of `destination` and serves clients
/// blocked on `destination`. `None` when `source` is empty.
pub(crate) fn pop_push(
    ctx: &Context,
    keyspace: &mut Keyspace,
    source: &str,
    destination: &str,
) -> Result<Option<Bytes>, CommandError> {
    keyspace.check::<List>(destination)?;

    let Some(element) = keyspace
        .modify::<List, _>(source, false, |list| list.pop_back())?
        .flatten()
    else {
        return Ok(None);
    };

    keyspace.modify::<List, _>(destination, true, |list| list.push_front(element.clone()))?;
    ctx.wake(keyspace, destination);

    Ok(Some(element))
}

impl Executable for Rpoplpush {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let element = pop_push(ctx, &mut keyspace, &self.source, &self.destination)?;

        Ok(element.into())
    }
}

impl TryFrom<&mut CommandParser> for Rpoplpush {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let source = parser.next_string()?;
        let destination = parser.next_string()?;

        Ok(Self {
            source,
            destination,
        })
    }
}
