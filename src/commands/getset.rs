use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Value;

/// Atomically sets `key` to `value` and returns the old value stored at `key`. The time to live
/// is discarded.
///
/// Ref: <https://redis.io/docs/latest/commands/getset/>
#[derive(Debug, PartialEq)]
pub struct Getset {
    pub key: String,
    pub value: Bytes,
}

impl Executable for Getset {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let previous = keyspace.get_string(&self.key)?;
        keyspace.put(self.key, Value::from(self.value));

        Ok(previous.into())
    }
}

impl TryFrom<&mut CommandParser> for Getset {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let value = parser.next_bytes()?;

        Ok(Self { key, value })
    }
}
