use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::{format_float, CommandParser};
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::SortedSet;

/// Increments the score of `member` in the sorted set stored at `key` by `increment`. A missing
/// member is added with `increment` as its score.
///
/// Ref: <https://redis.io/docs/latest/commands/zincrby/>
#[derive(Debug, PartialEq)]
pub struct ZincrBy {
    pub key: String,
    pub increment: f64,
    pub member: Bytes,
}

/// Adds `delta` to the score of `member`, inserting it when missing. Returns the new score.
pub(crate) fn increment(zset: &mut SortedSet, member: Bytes, delta: f64) -> Result<f64, CommandError> {
    let score = zset.score(&member).unwrap_or_default() + delta;
    if score.is_nan() {
        return Err(CommandError::range("resulting score is not a number (NaN)"));
    }

    zset.insert(member, score);
    Ok(score)
}

impl Executable for ZincrBy {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let (member, delta) = (self.member, self.increment);

        let score = ctx
            .keyspace()
            .modify::<SortedSet, _>(&self.key, true, |zset| increment(zset, member, delta))?
            .unwrap_or(Ok(delta))?;

        Ok(Frame::bulk(format_float(score)))
    }
}

impl TryFrom<&mut CommandParser> for ZincrBy {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let increment = parser.next_float()?;
        let member = parser.next_bytes()?;

        Ok(Self {
            key,
            increment,
            member,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn increments() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        assert_eq!(run(&store, &mut session, &["ZINCRBY", "z", "2", "a"]), Frame::bulk("2"));
        assert_eq!(run(&store, &mut session, &["ZINCRBY", "z", "-0.5", "a"]), Frame::bulk("1.5"));
        assert_eq!(
            run(&store, &mut session, &["ZINCRBY", "z", "inf", "a"]),
            Frame::bulk("inf")
        );
        assert_eq!(
            run(&store, &mut session, &["ZINCRBY", "z", "-inf", "a"]),
            Frame::Error("ERR resulting score is not a number (NaN)".to_string())
        );
    }
}
