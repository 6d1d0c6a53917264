use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Hash;

/// Returns all field names in the hash stored at `key`.
///
/// Ref: <https://redis.io/docs/latest/commands/hkeys/>
#[derive(Debug, PartialEq)]
pub struct Hkeys {
    pub key: String,
}

impl Executable for Hkeys {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let fields: Vec<Frame> = keyspace
            .read::<Hash>(&self.key)?
            .map(|hash| hash.keys().cloned().map(Frame::Bulk).collect())
            .unwrap_or_default();

        Ok(Frame::Array(fields))
    }
}

impl TryFrom<&mut CommandParser> for Hkeys {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
