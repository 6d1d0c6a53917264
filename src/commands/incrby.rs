use bytes::Bytes;
use num_traits::CheckedAdd;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::{parse_integer, CommandParser};
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Data;

/// Increments the number stored at key by increment. If the key does not exist, it is set to 0
/// before performing the operation. An error is returned if the key contains a value of the wrong
/// type or contains a string that can not be represented as integer.
///
/// Ref: <https://redis.io/docs/latest/commands/incrby/>
#[derive(Debug, PartialEq)]
pub struct IncrBy {
    pub key: String,
    pub increment: i64,
}

impl Executable for IncrBy {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        increment(ctx, &self.key, self.increment)
    }
}

impl TryFrom<&mut CommandParser> for IncrBy {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let increment = parser.next_integer()?;

        Ok(Self { key, increment })
    }
}

/// `a + b`, or an overflow error.
pub(crate) fn checked_add<T: CheckedAdd>(a: T, b: T) -> Result<T, CommandError> {
    a.checked_add(&b).ok_or(CommandError::Overflow)
}

/// Adds `delta` to the integer stored at `key`, keeping its time to live. Shared by the INCR
/// family.
pub(crate) fn increment(ctx: &Context, key: &str, delta: i64) -> Result<Frame, CommandError> {
    let mut keyspace = ctx.keyspace();

    let current = match keyspace.get_string(key)? {
        Some(value) => parse_integer(&value).ok_or(CommandError::NotInteger)?,
        None => 0,
    };
    let next = checked_add(current, delta)?;

    keyspace.set_data(key, Data::String(Bytes::from(next.to_string())));

    Ok(Frame::Integer(next))
}
