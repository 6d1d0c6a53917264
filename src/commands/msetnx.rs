use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::mset::key_value_pairs;
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Value;

/// Sets the given keys to their respective values. MSETNX will not perform any operation at all
/// even if just a single key already exists.
///
/// Ref: <https://redis.io/docs/latest/commands/msetnx/>
#[derive(Debug, PartialEq)]
pub struct Msetnx {
    pub pairs: Vec<(String, Bytes)>,
}

impl Executable for Msetnx {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();

        if self.pairs.iter().any(|(key, _)| keyspace.exists(key)) {
            return Ok(Frame::Integer(0));
        }

        for (key, value) in self.pairs {
            keyspace.put(key, Value::from(value));
        }

        Ok(Frame::Integer(1))
    }
}

impl TryFrom<&mut CommandParser> for Msetnx {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let pairs = key_value_pairs(parser, "msetnx")?;
        Ok(Self { pairs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn all_or_nothing() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        assert_eq!(
            run(&store, &mut session, &["MSETNX", "a", "1", "b", "2"]),
            Frame::Integer(1)
        );
        assert_eq!(
            run(&store, &mut session, &["MSETNX", "b", "3", "c", "4"]),
            Frame::Integer(0)
        );
        assert_eq!(
            run(&store, &mut session, &["MGET", "a", "b", "c"]),
            Frame::Array(vec![Frame::bulk("1"), Frame::bulk("2"), Frame::Null])
        );
    }
}
