use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Hash;

/// Returns the value associated with `field` in the hash stored at `key`.
///
/// Ref: <https://redis.io/docs/latest/commands/hget/>
#[derive(Debug, PartialEq)]
pub struct Hget {
    pub key: String,
    pub field: Bytes,
}

impl Executable for Hget {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let value = keyspace
            .read::<Hash>(&self.key)?
            .and_then(|hash| hash.get(&self.field))
            .cloned();

        Ok(value.into())
    }
}

impl TryFrom<&mut CommandParser> for Hget {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let field = parser.next_bytes()?;

        Ok(Self { key, field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn field_lookup() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["HSET", "h", "f", "v"]);

        assert_eq!(run(&store, &mut session, &["HGET", "h", "f"]), Frame::bulk("v"));
        assert_eq!(run(&store, &mut session, &["HGET", "h", "g"]), Frame::Null);
        assert_eq!(run(&store, &mut session, &["HGET", "nope", "f"]), Frame::Null);
    }
}
