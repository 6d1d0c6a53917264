use bytes::{Bytes, BytesMut};

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Data;

/// Overwrites part of the string stored at key, starting at the specified offset, for the entire
/// length of value. If the offset is larger than the current length of the string at key, the
/// string is padded with zero-bytes to make offset fit. Non-existing keys are considered as empty
/// strings, so this command will make sure it holds a string large enough to be able to set value
/// at offset.
///
/// Ref: <https://redis.io/docs/latest/commands/setrange/>
#[derive(Debug, PartialEq)]
pub struct Setrange {
    pub key: String,
    pub offset: i64,
    pub value: Bytes,
}

impl Executable for Setrange {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let offset =
            usize::try_from(self.offset).map_err(|_| CommandError::range("offset is out of range"))?;

        let max_len = ctx.store.config().max_bulk_len;
        let mut keyspace = ctx.keyspace();
        let current = keyspace.get_string(&self.key)?;

        if self.value.is_empty() {
            let len = current.map_or(0, |value| value.len());
            return Ok(Frame::Integer(len as i64));
        }

        let end = offset
            .checked_add(self.value.len())
            .filter(|end| *end <= max_len)
            .ok_or_else(|| {
                CommandError::range("string exceeds maximum allowed size (proto-max-bulk-len)")
            })?;

        let current = current.unwrap_or_default();
        let mut updated = BytesMut::from(&current[..]);
        if updated.len() < end {
            updated.resize(end, 0);
        }
        updated[offset..end].copy_from_slice(&self.value);

        let len = updated.len();
        keyspace.set_data(&self.key, Data::String(updated.freeze()));

        Ok(Frame::Integer(len as i64))
    }
}

impl TryFrom<&mut CommandParser> for Setrange {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let offset = parser.next_integer()?;
        let value = parser.next_bytes()?;

        Ok(Self { key, offset, value })
    }
}
