use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Hash;

/// Returns the number of fields contained in the hash stored at `key`.
///
/// Ref: <https://redis.io/docs/latest/commands/hlen/>
#[derive(Debug, PartialEq)]
pub struct Hlen {
    pub key: String,
}

impl Executable for Hlen {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let len = keyspace.read::<Hash>(&self.key)?.map_or(0, |hash| hash.len());

        Ok(Frame::Integer(len as i64))
    }
}

impl TryFrom<&mut CommandParser> for Hlen {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
