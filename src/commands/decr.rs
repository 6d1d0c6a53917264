use crate::commands::executable::{Context, Executable};
use crate::commands::incrby::increment;
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Decrements the number stored at key by one.
///
/// Ref: <https://redis.io/docs/latest/commands/decr/>
#[derive(Debug, PartialEq)]
pub struct Decr {
    pub key: String,
}

impl Executable for Decr {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        increment(ctx, &self.key, -1)
    }
}

impl TryFrom<&mut CommandParser> for Decr {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;

        Ok(Self { key })
    }
}
