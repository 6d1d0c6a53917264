use bytes::Bytes;
use std::collections::hash_map::Entry;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Hash;

/// Sets `field` in the hash stored at `key` to `value`, only if `field` does not yet exist.
///
/// Ref: <https://redis.io/docs/latest/commands/hsetnx/>
#[derive(Debug, PartialEq)]
pub struct Hsetnx {
    pub key: String,
    pub field: Bytes,
    pub value: Bytes,
}

impl Executable for Hsetnx {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let added = ctx
            .keyspace()
            .modify::<Hash, _>(&self.key, true, |hash| match hash.entry(self.field) {
                Entry::Occupied(_) => false,
                Entry::Vacant(entry) => {
                    entry.insert(self.value);
                    true
                }
            })?
            .unwrap_or_default();

        Ok(Frame::Integer(added as i64))
    }
}

impl TryFrom<&mut CommandParser> for Hsetnx {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let field = parser.next_bytes()?;
        let value = parser.next_bytes()?;

        Ok(Self { key, field, value })
    }
}
