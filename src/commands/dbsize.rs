use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Return the number of keys in the currently-selected database.
///
/// Ref: <https://redis.io/docs/latest/commands/dbsize/>
#[derive(Debug, PartialEq)]
pub struct DBSize;

impl Executable for DBSize {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let len = ctx.keyspace().len();
        Ok(Frame::Integer(len as i64))
    }
}

impl TryFrom<&mut CommandParser> for DBSize {
    type Error = CommandError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
