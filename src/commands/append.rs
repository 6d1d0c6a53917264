use bytes::{Bytes, BytesMut};

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Data;

/// If `key` already exists and is a string, this command appends the value at the end of the
/// string. If `key` does not exist it is created and set as an empty string, so APPEND will be
/// similar to SET in this special case.
///
/// Returns the length of the string after the append operation.
///
/// Ref: <https://redis.io/docs/latest/commands/append/>
#[derive(Debug, PartialEq)]
pub struct Append {
    pub key: String,
    pub value: Bytes,
}

impl Executable for Append {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();

        let current = keyspace.get_string(&self.key)?.unwrap_or_default();
        let mut appended = BytesMut::with_capacity(current.len() + self.value.len());
        appended.extend_from_slice(&current);
        appended.extend_from_slice(&self.value);

        let len = appended.len();
        keyspace.set_data(&self.key, Data::String(appended.freeze()));

        Ok(Frame::Integer(len as i64))
    }
}

impl TryFrom<&mut CommandParser> for Append {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let value = parser.next_bytes()?;

        Ok(Self { key, value })
    }
}
