use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::SortedSet;

/// Returns the rank of `member` in the sorted set stored at `key`, with the scores ordered from
/// low to high. The rank is 0-based.
///
/// Ref: <https://redis.io/docs/latest/commands/zrank/>
#[derive(Debug, PartialEq)]
pub struct Zrank {
    pub key: String,
    pub member: Bytes,
}

impl Executable for Zrank {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let rank = keyspace
            .read::<SortedSet>(&self.key)?
            .and_then(|zset| zset.rank(&self.member));

        Ok(rank.map_or(Frame::Null, |rank| Frame::Integer(rank as i64)))
    }
}

impl TryFrom<&mut CommandParser> for Zrank {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let member = parser.next_bytes()?;

        Ok(Self { key, member })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn ranks() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["ZADD", "z", "1", "one", "2", "two", "3", "three"]);

        assert_eq!(run(&store, &mut session, &["ZRANK", "z", "three"]), Frame::Integer(2));
        assert_eq!(run(&store, &mut session, &["ZRANK", "z", "four"]), Frame::Null);
        assert_eq!(run(&store, &mut session, &["ZRANK", "nope", "one"]), Frame::Null);
    }
}
