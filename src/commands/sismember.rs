use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Set;

/// Returns if `member` is a member of the set stored at `key`.
///
/// Ref: <https://redis.io/docs/latest/commands/sismember/>
#[derive(Debug, PartialEq)]
pub struct Sismember {
    pub key: String,
    pub member: Bytes,
}

impl Executable for Sismember {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let is_member = keyspace
            .read::<Set>(&self.key)?
            .is_some_and(|set| set.contains(&self.member));

        Ok(Frame::Integer(is_member as i64))
    }
}

impl TryFrom<&mut CommandParser> for Sismember {
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
    fn membership() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["SADD", "s", "a"]);

        assert_eq!(run(&store, &mut session, &["SISMEMBER", "s", "a"]), Frame::Integer(1));
        assert_eq!(run(&store, &mut session, &["SISMEMBER", "s", "b"]), Frame::Integer(0));
        assert_eq!(run(&store, &mut session, &["SISMEMBER", "nope", "a"]), Frame::Integer(0));
    }
}
