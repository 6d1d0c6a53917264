use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::DataType;

/// Renames `key` to `newkey` only if `newkey` does not exist yet. Returns 1 when renamed.
///
/// Ref: <https://redis.io/docs/latest/commands/renamenx/>
#[derive(Debug, PartialEq)]
pub struct Renamenx {
    pub key: String,
    pub newkey: String,
}

impl Executable for Renamenx {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();

        if !keyspace.exists(&self.key) {
            return Err(CommandError::NoSuchKey);
        }
        if self.key == self.newkey {
            return Err(CommandError::SameObject);
        }
        if keyspace.exists(&self.newkey) {
            return Ok(Frame::Integer(0));
        }

        let value = keyspace.take(&self.key).ok_or(CommandError::NoSuchKey)?;
        let is_list = value.data_type() == DataType::List;
        keyspace.put(self.newkey.clone(), value);

        if is_list {
            ctx.wake(&mut keyspace, &self.newkey);
        }

        Ok(Frame::Integer(1))
    }
}

impl TryFrom<&mut CommandParser> for Renamenx {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let newkey = parser.next_string()?;

        Ok(Self { key, newkey })
    }
}
