use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Removes the specified keys. A key is ignored if it does not exist.
///
/// Ref: <https://redis.io/docs/latest/commands/del/>
#[derive(Debug, PartialEq)]
pub struct Del {
    pub keys: Vec<String>,
}

impl Executable for Del {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let count = self
            .keys
            .iter()
            .filter(|key| keyspace.remove(key))
            .count();
        Ok(Frame::Integer(count as i64))
    }
}

impl TryFrom<&mut CommandParser> for Del {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let keys = parser.rest_strings()?;
        Ok(Self { keys })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::commands::Command;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn parse_multiple_keys() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("DEL")),
            Frame::Bulk(Bytes::from("foo")),
            Frame::Bulk(Bytes::from("bar")),
        ]);

        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(
            cmd,
            Command::Del(Del {
                keys: vec!["foo".to_string(), "bar".to_string()]
            })
        );
    }

    #[test]
    fn removes_any_type() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        run(&store, &mut session, &["SET", "a", "1"]);
        run(&store, &mut session, &["RPUSH", "b", "x"]);
        run(&store, &mut session, &["HSET", "c", "f", "v"]);

        assert_eq!(
            run(&store, &mut session, &["DEL", "a", "b", "c", "d"]),
            Frame::Integer(3)
        );
        assert_eq!(run(&store, &mut session, &["DBSIZE"]), Frame::Integer(0));
    }
}
