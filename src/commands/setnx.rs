use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Value;

/// Set `key` to hold string `value` if `key` does not exist. When `key` already holds a value,
/// no operation is performed. SETNX is short for "SET if Not eXists".
///
/// Ref: <https://redis.io/docs/latest/commands/setnx/>
#[derive(Debug, PartialEq)]
pub struct Setnx {
    pub key: String,
    pub value: Bytes,
}

impl Executable for Setnx {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let existing = keyspace.put_if_absent(self.key, Value::from(self.value));

        Ok(Frame::Integer(existing.is_none() as i64))
    }
}

impl TryFrom<&mut CommandParser> for Setnx {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let value = parser.next_bytes()?;

        Ok(Self { key, value })
    }
}
