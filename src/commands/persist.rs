use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Remove the existing timeout on `key`. Returns 1 if a timeout was removed, 0 when the key does
/// not exist or has no associated timeout.
///
/// Ref: <https://redis.io/docs/latest/commands/persist/>
#[derive(Debug, PartialEq)]
pub struct Persist {
    pub key: String,
}

impl Executable for Persist {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let removed = ctx.keyspace().persist(&self.key);
        Ok(Frame::Integer(removed as i64))
    }
}

impl TryFrom<&mut CommandParser> for Persist {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
