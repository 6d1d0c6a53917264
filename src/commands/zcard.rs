use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::SortedSet;

/// Returns the sorted set cardinality (number of elements) of the sorted set stored at `key`.
///
/// Ref: <https://redis.io/docs/latest/commands/zcard/>
#[derive(Debug, PartialEq)]
pub struct Zcard {
    pub key: String,
}

impl Executable for Zcard {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let len = keyspace.read::<SortedSet>(&self.key)?.map_or(0, SortedSet::len);

        Ok(Frame::Integer(len as i64))
    }
}

impl TryFrom<&mut CommandParser> for Zcard {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
