use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::incrby::checked_add;
use crate::commands::parser::{parse_integer, CommandParser};
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Hash;

/// Increments the number stored at `field` in the hash stored at `key` by `increment`. Missing
/// keys and fields start at 0.
///
/// Ref: <https://redis.io/docs/latest/commands/hincrby/>
#[derive(Debug, PartialEq)]
pub struct HincrBy {
    pub key: String,
    pub field: Bytes,
    pub increment: i64,
}

impl Executable for HincrBy {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let res = ctx
            .keyspace()
            .modify::<Hash, _>(&self.key, true, |hash| -> Result<i64, CommandError> {
                let current = match hash.get(&self.field) {
                    Some(value) => parse_integer(value)
                        .ok_or_else(|| CommandError::range("hash value is not an integer"))?,
                    None => 0,
                };
                let next = checked_add(current, self.increment)?;
                hash.insert(self.field, Bytes::from(next.to_string()));
                Ok(next)
            })?;

        match res {
            Some(next) => next.map(Frame::Integer),
            None => Ok(Frame::Integer(0)),
        }
    }
}

impl TryFrom<&mut CommandParser> for HincrBy {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let field = parser.next_bytes()?;
        let increment = parser.next_integer()?;

        Ok(Self {
            key,
            field,
            increment,
        })
    }
}
