use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::utils::range::resolve_index;
use crate::value::List;

/// Sets the list element at `index` to `element`.
///
/// Ref: <https://redis.io/docs/latest/commands/lset/>
#[derive(Debug, PartialEq)]
pub struct Lset {
    pub key: String,
    pub index: i64,
    pub element: Bytes,
}

impl Executable for Lset {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let index = self.index;
        let element = self.element;

        ctx.keyspace()
            .modify::<List, _>(&self.key, false, |list| {
                let slot = resolve_index(index, list.len()).and_then(|index| list.get_mut(index));
                match slot {
                    Some(slot) => {
                        *slot = element;
                        Ok(Frame::ok())
                    }
                    None => Err(CommandError::range("index out of range")),
                }
            })?
            .unwrap_or(Err(CommandError::NoSuchKey))
    }
}

impl TryFrom<&mut CommandParser> for Lset {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let index = parser.next_integer()?;
        let element = parser.next_bytes()?;

        Ok(Self {
            key,
            index,
            element,
        })
    }
}
