use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::zrange::{by_score, parse_score_bound, reply, Limit};
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::{ScoreBound, SortedSet};

/// Returns all the elements in the sorted set at `key` with a score between `min` and `max`,
/// ordered from low to high scores.
///
/// Ref: <https://redis.io/docs/latest/commands/zrangebyscore/>
#[derive(Debug, PartialEq)]
pub struct Zrangebyscore {
    pub key: String,
    pub min: ScoreBound,
    pub max: ScoreBound,
    pub with_scores: bool,
    pub limit: Option<Limit>,
}

impl Executable for Zrangebyscore {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let items = match keyspace.read::<SortedSet>(&self.key)? {
            Some(zset) => by_score(zset, self.min, self.max, false, self.limit),
            None => vec![],
        };

        Ok(reply(items, self.with_scores))
    }
}

impl TryFrom<&mut CommandParser> for Zrangebyscore {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let min = parse_score_bound(&parser.next_bytes()?)?;
        let max = parse_score_bound(&parser.next_bytes()?)?;

        let mut with_scores = false;
        let mut limit = None;

        while parser.has_next() {
            match parser.next_keyword()?.as_str() {
                "WITHSCORES" => with_scores = true,
                "LIMIT" => limit = Some(Limit::parse(parser)?),
                _ => return Err(CommandError::Syntax),
            }
        }

        Ok(Self {
            key,
            min,
            max,
            with_scores,
            limit,
        })
    }
}
