use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Posts a message to the given channel. Returns the number of clients that received it.
///
/// Ref: <https://redis.io/docs/latest/commands/publish/>
#[derive(Debug, PartialEq)]
pub struct Publish {
    pub channel: Bytes,
    pub message: Bytes,
}

impl Executable for Publish {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let receivers = ctx.store.broker().publish(&self.channel, &self.message);
        Ok(Frame::Integer(receivers as i64))
    }
}

impl TryFrom<&mut CommandParser> for Publish {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let channel = parser.next_bytes()?;
        let message = parser.next_bytes()?;

        Ok(Self { channel, message })
    }
}
