use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Hash;

/// Removes the specified fields from the hash stored at `key`. The key is deleted together with
/// its last field.
///
/// Ref: <https://redis.io/docs/latest/commands/hdel/>
#[derive(Debug, PartialEq)]
pub struct Hdel {
    pub key: String,
    pub fields: Vec<Bytes>,
}

impl Executable for Hdel {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let removed = ctx
            .keyspace()
            .modify::<Hash, _>(&self.key, false, |hash| {
                self.fields
                    .iter()
                    .filter(|field| hash.remove(*field).is_some())
                    .count()
            })?
            .unwrap_or_default();

        Ok(Frame::Integer(removed as i64))
    }
}

impl TryFrom<&mut CommandParser> for Hdel {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let fields = parser.rest_bytes();

        Ok(Self { key, fields })
    }
}
