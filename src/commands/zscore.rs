use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::{format_float, CommandParser};
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::SortedSet;

/// Returns the score of `member` in the sorted set at `key`.
///
/// Ref: <https://redis.io/docs/latest/commands/zscore/>
#[derive(Debug, PartialEq)]
pub struct Zscore {
    pub key: String,
    pub member: Bytes,
}

impl Executable for Zscore {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let score = keyspace
            .read::<SortedSet>(&self.key)?
            .and_then(|zset| zset.score(&self.member));

        Ok(score.map_or(Frame::Null, |score| Frame::bulk(format_float(score))))
    }
}

impl TryFrom<&mut CommandParser> for Zscore {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let member = parser.next_bytes()?;

        Ok(Self { key, member })
    }
}
