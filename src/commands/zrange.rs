use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::{format_float, parse_float, parse_integer, CommandParser};
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::utils::range;
use crate::value::{ScoreBound, SortedSet};

/// Returns the specified range of elements in the sorted set stored at `key`.
///
/// By default `start` and `stop` are ranks, lowest score first. With `BYSCORE` they are score
/// bounds, `(` marking an exclusive one. `REV` reverses the ordering, in which case a score range
/// is given as `max min`. `LIMIT offset count` pages through a score range.
///
/// Ref: <https://redis.io/docs/latest/commands/zrange/>
#[derive(Debug, PartialEq)]
pub struct Zrange {
    pub key: String,
    pub range: Range,
    pub rev: bool,
    pub with_scores: bool,
    pub limit: Option<Limit>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Range {
    Rank(i64, i64),
    Score(ScoreBound, ScoreBound),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit {
    pub offset: i64,
    pub count: i64,
}

impl Limit {
    pub(crate) fn parse(parser: &mut CommandParser) -> Result<Limit, CommandError> {
        let offset = parser.next_integer()?;
        let count = parser.next_integer()?;
        Ok(Limit { offset, count })
    }

    fn apply<'a>(
        self,
        items: impl Iterator<Item = (&'a Bytes, f64)>,
    ) -> Vec<(&'a Bytes, f64)> {
        let Ok(offset) = usize::try_from(self.offset) else {
            return vec![];
        };
        let count = usize::try_from(self.count).unwrap_or(usize::MAX);

        items.skip(offset).take(count).collect()
    }
}

/// Parses a score bound such as `1.5`, `(1.5`, `-inf` or `+inf`.
pub(crate) fn parse_score_bound(bytes: &[u8]) -> Result<ScoreBound, CommandError> {
    let invalid = || CommandError::range("min or max is not a float");

    match bytes.strip_prefix(b"(") {
        Some(rest) => parse_float(rest).map(ScoreBound::Exclusive).ok_or_else(invalid),
        None => parse_float(bytes).map(ScoreBound::Inclusive).ok_or_else(invalid),
    }
}

/// Members within the score bounds, ordered by score (descending when `rev`) and paged by
/// `limit`.
pub(crate) fn by_score(
    zset: &SortedSet,
    min: ScoreBound,
    max: ScoreBound,
    rev: bool,
    limit: Option<Limit>,
) -> Vec<(&Bytes, f64)> {
    let mut items: Vec<_> = zset.range_by_score(min, max).collect();
    if rev {
        items.reverse();
    }

    match limit {
        Some(limit) => limit.apply(items.into_iter()),
        None => items,
    }
}

/// Flattens members, and their scores when asked, into a reply.
pub(crate) fn reply(items: Vec<(&Bytes, f64)>, with_scores: bool) -> Frame {
    let mut frames = Vec::with_capacity(items.len() * if with_scores { 2 } else { 1 });

    for (member, score) in items {
        frames.push(Frame::Bulk(member.clone()));
        if with_scores {
            frames.push(Frame::bulk(format_float(score)));
        }
    }

    Frame::Array(frames)
}

impl Executable for Zrange {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let Some(zset) = keyspace.read::<SortedSet>(&self.key)? else {
            return Ok(Frame::Array(vec![]));
        };

        let items = match self.range {
            Range::Rank(start, stop) => match range::resolve(start, stop, zset.len()) {
                Some((start, stop)) => {
                    let take = stop - start + 1;
                    match self.rev {
                        true => zset.iter().rev().skip(start).take(take).collect(),
                        false => zset.iter().skip(start).take(take).collect(),
                    }
                }
                None => vec![],
            },
            Range::Score(min, max) => by_score(zset, min, max, self.rev, self.limit),
        };

        Ok(reply(items, self.with_scores))
    }
}

impl TryFrom<&mut CommandParser> for Zrange {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let start = parser.next_bytes()?;
        let stop = parser.next_bytes()?;

        let mut by_score = false;
        let mut rev = false;
        let mut with_scores = false;
        let mut limit = None;

        while parser.has_next() {
            match parser.next_keyword()?.as_str() {
                "BYSCORE" => by_score = true,
                "REV" => rev = true,
                "WITHSCORES" => with_scores = true,
                "LIMIT" => limit = Some(Limit::parse(parser)?),
                _ => return Err(CommandError::Syntax),
            }
        }

        if limit.is_some() && !by_score {
            return Err(CommandError::range(
                "syntax error, LIMIT is only supported in combination with either BYSCORE or BYLEX",
            ));
        }

        let range = match by_score {
            true => {
                let (start, stop) = (parse_score_bound(&start)?, parse_score_bound(&stop)?);
                match rev {
                    true => Range::Score(stop, start),
                    false => Range::Score(start, stop),
                }
            }
            false => {
                let start = parse_integer(&start).ok_or(CommandError::NotInteger)?;
                let stop = parse_integer(&stop).ok_or(CommandError::NotInteger)?;
                Range::Rank(start, stop)
            }
        };

        Ok(Self {
            key,
            range,
            rev,
            with_scores,
            limit,
        })
    }
}
