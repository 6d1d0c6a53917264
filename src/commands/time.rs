use bytes::Bytes;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Returns the current server time as a two items list: a Unix timestamp and the amount of
/// microseconds already elapsed in the current second.
///
/// Ref: <https://redis.io/docs/latest/commands/time/>
#[derive(Debug, PartialEq)]
pub struct Time;

impl Executable for Time {
    fn exec(self, _ctx: &mut Context) -> Result<Frame, CommandError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();

        Ok(Frame::Array(vec![
            Frame::Bulk(Bytes::from(now.as_secs().to_string())),
            Frame::Bulk(Bytes::from(now.subsec_micros().to_string())),
        ]))
    }
}

impl TryFrom<&mut CommandParser> for Time {
    type Error = CommandError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
