use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Returns all keys matching a glob-style `pattern` (`*`, `?`, `[abc]`).
///
/// Ref: <https://redis.io/docs/latest/commands/keys/>
#[derive(Debug, PartialEq)]
pub struct Keys {
    pub pattern: String,
}

impl Executable for Keys {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let keys = ctx
            .keyspace()
            .keys(&self.pattern)
            .into_iter()
            .map(|key| Frame::Bulk(Bytes::from(key)))
            .collect();

        Ok(Frame::Array(keys))
    }
}

impl TryFrom<&mut CommandParser> for Keys {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let pattern = parser.next_string()?;
        Ok(Self { pattern })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn matches_pattern() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        run(&store, &mut session, &["MSET", "hello", "1", "hallo", "2", "world", "3"]);

        let Frame::Array(mut keys) = run(&store, &mut session, &["KEYS", "h?llo"]) else {
            panic!("expected array");
        };
        keys.sort_by_key(|frame| frame.to_string());

        assert_eq!(keys, vec![Frame::bulk("hallo"), Frame::bulk("hello")]);
    }
}
