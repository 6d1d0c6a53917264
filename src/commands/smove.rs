use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Set;

/// Move `member` from the set at `source` to the set at `destination`.
///
/// Returns 1 when the member was moved, 0 when it was not a member of `source`.
///
/// Ref: <https://redis.io/docs/latest/commands/smove/>
#[derive(Debug, PartialEq)]
pub struct Smove {
    pub source: String,
    pub destination: String,
    pub member: Bytes,
}

impl Executable for Smove {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        keyspace.check::<Set>(&self.destination)?;

        if self.source == self.destination {
            let is_member = keyspace
                .read::<Set>(&self.source)?
                .is_some_and(|set| set.contains(&self.member));
            return Ok(Frame::Integer(is_member as i64));
        }

        let removed = keyspace
            .modify::<Set, _>(&self.source, false, |set| set.remove(&self.member))?
            .unwrap_or_default();

        if !removed {
            return Ok(Frame::Integer(0));
        }

        keyspace.modify::<Set, _>(&self.destination, true, |set| set.insert(self.member))?;

        Ok(Frame::Integer(1))
    }
}

impl TryFrom<&mut CommandParser> for Smove {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let source = parser.next_string()?;
        let destination = parser.next_string()?;
        let member = parser.next_bytes()?;

        Ok(Self {
            source,
            destination,
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
    fn moves_member() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["SADD", "src", "a", "b"]);
        run(&store, &mut session, &["SADD", "dst", "c"]);

        assert_eq!(run(&store, &mut session, &["SMOVE", "src", "dst", "a"]), Frame::Integer(1));
        assert_eq!(run(&store, &mut session, &["SISMEMBER", "dst", "a"]), Frame::Integer(1));
        assert_eq!(run(&store, &mut session, &["SISMEMBER", "src", "a"]), Frame::Integer(0));
        assert_eq!(run(&store, &mut session, &["SMOVE", "src", "dst", "x"]), Frame::Integer(0));

        assert_eq!(run(&store, &mut session, &["SMOVE", "src", "dst", "b"]), Frame::Integer(1));
        assert_eq!(run(&store, &mut session, &["EXISTS", "src"]), Frame::Integer(0));
    }

    #[test]
    fn wrong_type_destination() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["SADD", "src", "a"]);
        run(&store, &mut session, &["SET", "dst", "v"]);

        assert_eq!(
            run(&store, &mut session, &["SMOVE", "src", "dst", "a"]),
            Frame::Error("WRONGTYPE Operation against a key holding the wrong kind of value".to_string())
        );
        assert_eq!(run(&store, &mut session, &["SCARD", "src"]), Frame::Integer(1));
    }
}
