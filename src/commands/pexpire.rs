use crate::commands::executable::{Context, Executable};
use crate::commands::expire::expire_in;
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// This command works exactly like EXPIRE but the time to live of the key is specified in
/// milliseconds instead of seconds.
///
/// Ref: <https://redis.io/docs/latest/commands/pexpire/>
#[derive(Debug, PartialEq)]
pub struct Pexpire {
    pub key: String,
    pub milliseconds: i64,
}

impl Executable for Pexpire {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        expire_in(ctx, &self.key, self.milliseconds, "pexpire")
    }
}

impl TryFrom<&mut CommandParser> for Pexpire {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let milliseconds = parser.next_integer()?;

        Ok(Self { key, milliseconds })
    }
}
