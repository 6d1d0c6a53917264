use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::utils::range::resolve_index;
use crate::value::List;

/// Returns the element at `index` in the list stored at `key`. Negative indexes count from the
/// tail. Out of range indexes return nil.
///
/// Ref: <https://redis.io/docs/latest/commands/lindex/>
#[derive(Debug, PartialEq)]
pub struct Lindex {
    pub key: String,
    pub index: i64,
}

impl Executable for Lindex {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let element = keyspace.read::<List>(&self.key)?.and_then(|list| {
            resolve_index(self.index, list.len()).and_then(|index| list.get(index).cloned())
        });

        Ok(element.into())
    }
}

impl TryFrom<&mut CommandParser> for Lindex {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let index = parser.next_integer()?;

        Ok(Self { key, index })
    }
}
