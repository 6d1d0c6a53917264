use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::zrange::parse_score_bound;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::{ScoreBound, SortedSet};

/// Returns the number of elements in the sorted set at `key` with a score between `min` and
/// `max`.
///
/// Ref: <https://redis.io/docs/latest/commands/zcount/>
#[derive(Debug, PartialEq)]
pub struct Zcount {
    pub key: String,
    pub min: ScoreBound,
    pub max: ScoreBound,
}

impl Executable for Zcount {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let count = keyspace
            .read::<SortedSet>(&self.key)?
            .map_or(0, |zset| zset.count(self.min, self.max));

        Ok(Frame::Integer(count as i64))
    }
}

impl TryFrom<&mut CommandParser> for Zcount {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let min = parse_score_bound(&parser.next_bytes()?)?;
        let max = parse_score_bound(&parser.next_bytes()?)?;

        Ok(Self { key, min, max })
    }
}
