use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::utils::range;
use crate::value::List;

/// Returns the specified elements of the list stored at `key`. The offsets `start` and `stop` are
/// zero-based, inclusive, and may be negative to count from the end of the list.
///
/// Ref: <https://redis.io/docs/latest/commands/lrange/>
#[derive(Debug, PartialEq)]
pub struct Lrange {
    pub key: String,
    pub start: i64,
    pub stop: i64,
}

impl Executable for Lrange {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let Some(list) = keyspace.read::<List>(&self.key)? else {
            return Ok(Frame::Array(vec![]));
        };

        let elements = match range::resolve(self.start, self.stop, list.len()) {
            Some((start, stop)) => list
                .range(start..=stop)
                .cloned()
                .map(Frame::Bulk)
                .collect(),
            None => vec![],
        };

        Ok(Frame::Array(elements))
    }
}

impl TryFrom<&mut CommandParser> for Lrange {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let start = parser.next_integer()?;
        let stop = parser.next_integer()?;

        Ok(Self { key, start, stop })
    }
}
