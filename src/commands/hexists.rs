use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Hash;

/// Returns if `field` is an existing field in the hash stored at `key`.
///
/// Ref: <https://redis.io/docs/latest/commands/hexists/>
#[derive(Debug, PartialEq)]
pub struct Hexists {
    pub key: String,
    pub field: Bytes,
}

impl Executable for Hexists {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let exists = keyspace
            .read::<Hash>(&self.key)?
            .is_some_and(|hash| hash.contains_key(&self.field));

        Ok(Frame::Integer(exists as i64))
    }
}

impl TryFrom<&mut CommandParser> for Hexists {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let field = parser.next_bytes()?;

        Ok(Self { key, field })
    }
}
