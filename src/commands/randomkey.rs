use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Return a random key from the currently selected database, or nil when it is empty.
///
/// Ref: <https://redis.io/docs/latest/commands/randomkey/>
#[derive(Debug, PartialEq)]
pub struct Randomkey;

impl Executable for Randomkey {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let key = ctx.keyspace().random_key();
        Ok(key.map(Bytes::from).into())
    }
}

impl TryFrom<&mut CommandParser> for Randomkey {
    type Error = CommandError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
