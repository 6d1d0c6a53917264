use bytes::Bytes;
use itertools::Itertools;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Value;

/// Sets the given keys to their respective values. Replaces existing values with new values.
///
/// Ref: <https://redis.io/docs/latest/commands/mset/>
#[derive(Debug, PartialEq)]
pub struct Mset {
    pub pairs: Vec<(String, Bytes)>,
}

impl Executable for Mset {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();

        for (key, value) in self.pairs {
            keyspace.put(key, Value::from(value));
        }

        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for Mset {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let pairs = key_value_pairs(parser, "mset")?;
        Ok(Self { pairs })
    }
}

/// Reads the remaining arguments as `key value [key value ...]`.
pub(crate) fn key_value_pairs(
    parser: &mut CommandParser,
    command: &str,
) -> Result<Vec<(String, Bytes)>, CommandError> {
    if parser.remaining() == 0 || parser.remaining() % 2 != 0 {
        return Err(CommandError::WrongArity {
            command: command.to_string(),
        });
    }

    parser
        .rest_bytes()
        .into_iter()
        .tuples()
        .map(|(key, value)| {
            let key = String::from_utf8(key.to_vec()).map_err(|_| CommandError::Syntax)?;
            Ok((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn multiple_pairs() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("MSET")),
            Frame::Bulk(Bytes::from("key1")),
            Frame::Bulk(Bytes::from("1")),
            Frame::Bulk(Bytes::from("key2")),
            Frame::Bulk(Bytes::from("2")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(
            cmd,
            Command::Mset(Mset {
                pairs: vec![
                    ("key1".to_string(), Bytes::from("1")),
                    ("key2".to_string(), Bytes::from("2")),
                ]
            })
        );

        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        assert_eq!(
            run(&store, &mut session, &["MSET", "key1", "1", "key2", "2"]),
            Frame::ok()
        );
        assert_eq!(
            run(&store, &mut session, &["MGET", "key1", "key2"]),
            Frame::Array(vec![Frame::bulk("1"), Frame::bulk("2")])
        );
    }

    #[test]
    fn odd_arguments() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        assert_eq!(
            run(&store, &mut session, &["MSET", "key1", "1", "key2"]),
            Frame::Error("ERR wrong number of arguments for 'mset' command".to_string())
        );
        assert_eq!(run(&store, &mut session, &["EXISTS", "key1"]), Frame::Integer(0));
    }
}
