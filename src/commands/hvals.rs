use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Hash;

/// Returns all values in the hash stored at `key`.
///
/// Ref: <https://redis.io/docs/latest/commands/hvals/>
#[derive(Debug, PartialEq)]
pub struct Hvals {
    pub key: String,
}

impl Executable for Hvals {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let values: Vec<Frame> = keyspace
            .read::<Hash>(&self.key)?
            .map(|hash| hash.values().cloned().map(Frame::Bulk).collect())
            .unwrap_or_default();

        Ok(Frame::Array(values))
    }
}

impl TryFrom<&mut CommandParser> for Hvals {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
