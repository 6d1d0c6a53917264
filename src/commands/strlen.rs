use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Returns the length of the string value stored at `key`, or 0 when the key does not exist.
///
/// Ref: <https://redis.io/docs/latest/commands/strlen/>
#[derive(Debug, PartialEq)]
pub struct Strlen {
    pub key: String,
}

impl Executable for Strlen {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let len = ctx
            .keyspace()
            .get_string(&self.key)?
            .map_or(0, |value| value.len());

        Ok(Frame::Integer(len as i64))
    }
}

impl TryFrom<&mut CommandParser> for Strlen {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
