use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Set;

/// Remove the specified members from the set stored at `key`. The key is deleted once the set
/// is empty.
///
/// Ref: <https://redis.io/docs/latest/commands/srem/>
#[derive(Debug, PartialEq)]
pub struct Srem {
    pub key: String,
    pub members: Vec<Bytes>,
}

impl Executable for Srem {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let removed = ctx
            .keyspace()
            .modify::<Set, _>(&self.key, false, |set| {
                self.members
                    .iter()
                    .filter(|member| set.remove(*member))
                    .count()
            })?
            .unwrap_or_default();

        Ok(Frame::Integer(removed as i64))
    }
}

impl TryFrom<&mut CommandParser> for Srem {
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
    fn removes_and_deletes_empty_set() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["SADD", "s", "a", "b"]);

        assert_eq!(run(&store, &mut session, &["SREM", "s", "a", "x"]), Frame::Integer(1));
        assert_eq!(run(&store, &mut session, &["SREM", "s", "b"]), Frame::Integer(1));
        assert_eq!(run(&store, &mut session, &["EXISTS", "s"]), Frame::Integer(0));
        assert_eq!(run(&store, &mut session, &["SREM", "s", "b"]), Frame::Integer(0));
    }
}
