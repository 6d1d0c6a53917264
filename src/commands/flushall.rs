use crate::commands::executable::{Context, Executable};
use crate::commands::flushdb::flush_mode;
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Delete all the keys of all the existing databases.
///
/// Ref: <https://redis.io/docs/latest/commands/flushall/>
#[derive(Debug, PartialEq)]
pub struct FlushAll;

impl Executable for FlushAll {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        for index in 0..ctx.store.databases() {
            ctx.store.db(index).clear();
        }
        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for FlushAll {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        flush_mode(parser)?;
        Ok(Self)
    }
}
