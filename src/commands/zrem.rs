use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::SortedSet;

/// Removes the specified members from the sorted set stored at `key`. Non existing members are
/// ignored.
///
/// Ref: <https://redis.io/docs/latest/commands/zrem/>
#[derive(Debug, PartialEq)]
pub struct Zrem {
    pub key: String,
    pub members: Vec<Bytes>,
}

impl Executable for Zrem {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let removed = ctx
            .keyspace()
            .modify::<SortedSet, _>(&self.key, false, |zset| {
                self.members
                    .iter()
                    .filter(|member| zset.remove(member))
                    .count()
            })?
            .unwrap_or_default();

        Ok(Frame::Integer(removed as i64))
    }
}

impl TryFrom<&mut CommandParser> for Zrem {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let members = parser.rest_bytes();

        Ok(Self { key, members })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn removes_members() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["ZADD", "z", "1", "a", "2", "b"]);

        assert_eq!(run(&store, &mut session, &["ZREM", "z", "a", "x"]), Frame::Integer(1));
        assert_eq!(run(&store, &mut session, &["ZCARD", "z"]), Frame::Integer(1));
        assert_eq!(run(&store, &mut session, &["ZREM", "z", "b"]), Frame::Integer(1));
        assert_eq!(run(&store, &mut session, &["EXISTS", "z"]), Frame::Integer(0));
    }
}
