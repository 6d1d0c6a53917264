use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Set;

/// Add the specified members to the set stored at `key`. Members already in the set are
/// ignored. Returns the number of members that were added.
///
/// Ref: <https://redis.io/docs/latest/commands/sadd/>
#[derive(Debug, PartialEq)]
pub struct Sadd {
    pub key: String,
    pub members: Vec<Bytes>,
}

impl Executable for Sadd {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let added = ctx
            .keyspace()
            .modify::<Set, _>(&self.key, true, |set| {
                self.members
                    .into_iter()
                    .filter(|member| set.insert(member.clone()))
                    .count()
            })?
            .unwrap_or_default();

        Ok(Frame::Integer(added as i64))
    }
}

impl TryFrom<&mut CommandParser> for Sadd {
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
    fn adds_unique_members() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        assert_eq!(
            run(&store, &mut session, &["SADD", "s", "a", "b", "a"]),
            Frame::Integer(2)
        );
        assert_eq!(run(&store, &mut session, &["SADD", "s", "b", "c"]), Frame::Integer(1));
        assert_eq!(run(&store, &mut session, &["SCARD", "s"]), Frame::Integer(3));
        assert_eq!(run(&store, &mut session, &["TYPE", "s"]), Frame::Simple("set".to_string()));
    }
}
