use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Hash;

/// Returns the values associated with the specified fields in the hash stored at `key`, nil for
/// every field that does not exist.
///
/// Ref: <https://redis.io/docs/latest/commands/hmget/>
#[derive(Debug, PartialEq)]
pub struct Hmget {
    pub key: String,
    pub fields: Vec<Bytes>,
}

impl Executable for Hmget {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let hash = keyspace.read::<Hash>(&self.key)?;

        let values = self
            .fields
            .iter()
            .map(|field| Frame::from(hash.and_then(|hash| hash.get(field)).cloned()))
            .collect();

        Ok(Frame::Array(values))
    }
}

impl TryFrom<&mut CommandParser> for Hmget {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let fields = parser.rest_bytes();

        Ok(Self { key, fields })
    }
}
