use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Set;

/// Returns the set cardinality (number of elements) of the set stored at `key`.
///
/// Ref: <https://redis.io/docs/latest/commands/scard/>
#[derive(Debug, PartialEq)]
pub struct Scard {
    pub key: String,
}

impl Executable for Scard {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let len = keyspace.read::<Set>(&self.key)?.map_or(0, |set| set.len());

        Ok(Frame::Integer(len as i64))
    }
}

impl TryFrom<&mut CommandParser> for Scard {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
