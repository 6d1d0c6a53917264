use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Marks the start of a transaction block. Subsequent commands are queued for atomic execution
/// using EXEC.
///
/// Ref: <https://redis.io/docs/latest/commands/multi/>
#[derive(Debug, PartialEq)]
pub struct Multi;

impl Executable for Multi {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        ctx.session.begin()?;
        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for Multi {
    type Error = CommandError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
