use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Set;

/// Returns all the members of the set value stored at `key`.
///
/// Ref: <https://redis.io/docs/latest/commands/smembers/>
#[derive(Debug, PartialEq)]
pub struct Smembers {
    pub key: String,
}

impl Executable for Smembers {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let members: Vec<Frame> = keyspace
            .read::<Set>(&self.key)?
            .map(|set| set.iter().cloned().map(Frame::Bulk).collect())
            .unwrap_or_default();

        Ok(Frame::Array(members))
    }
}

impl TryFrom<&mut CommandParser> for Smembers {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
