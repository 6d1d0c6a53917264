use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Asks the server to close the connection once the reply has been written.
///
/// Ref: <https://redis.io/docs/latest/commands/quit>
#[derive(Debug, PartialEq)]
pub struct Quit;

impl Executable for Quit {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        ctx.session.close();
        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for Quit {
    type Error = CommandError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
