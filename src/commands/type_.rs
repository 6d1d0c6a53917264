use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Returns the string representation of the type of the value stored at `key`: `string`, `list`,
/// `set`, `zset` or `hash`. If the key does not exist, `none` is returned.
///
/// Ref: <https://redis.io/docs/latest/commands/type/>
#[derive(Debug, PartialEq)]
pub struct Type {
    pub key: String,
}

impl Executable for Type {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let type_ = ctx
            .keyspace()
            .type_of(&self.key)
            .map(|data_type| data_type.to_string())
            .unwrap_or_else(|| "none".to_string());

        Ok(Frame::Simple(type_))
    }
}

impl TryFrom<&mut CommandParser> for Type {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn every_type() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        run(&store, &mut session, &["SET", "s", "v"]);
        run(&store, &mut session, &["LPUSH", "l", "v"]);
        run(&store, &mut session, &["SADD", "S", "v"]);
        run(&store, &mut session, &["ZADD", "z", "1", "v"]);
        run(&store, &mut session, &["HSET", "h", "f", "v"]);

        for (key, expected) in [
            ("s", "string"),
            ("l", "list"),
            ("S", "set"),
            ("z", "zset"),
            ("h", "hash"),
            ("missing", "none"),
        ] {
            assert_eq!(
                run(&store, &mut session, &["TYPE", key]),
                Frame::Simple(expected.to_string())
            );
        }
    }
}
