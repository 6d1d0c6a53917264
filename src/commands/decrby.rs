use crate::commands::executable::{Context, Executable};
use crate::commands::incrby::increment;
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// The DECRBY command reduces the value stored at the specified key by the specified decrement.
///
/// Ref: <https://redis.io/docs/latest/commands/decrby/>
#[derive(Debug, PartialEq)]
pub struct DecrBy {
    pub key: String,
    pub decrement: i64,
}

impl Executable for DecrBy {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let delta = self
            .decrement
            .checked_neg()
            .ok_or(CommandError::Overflow)?;
        increment(ctx, &self.key, delta)
    }
}

impl TryFrom<&mut CommandParser> for DecrBy {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let decrement = parser.next_integer()?;

        Ok(Self { key, decrement })
    }
}
