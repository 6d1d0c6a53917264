use bytes::Bytes;
use rand::seq::IteratorRandom;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Set;

/// Removes and returns one or more random members from the set value stored at `key`.
///
/// Ref: <https://redis.io/docs/latest/commands/spop/>
#[derive(Debug, PartialEq)]
pub struct Spop {
    pub key: String,
    pub count: Option<usize>,
}

impl Executable for Spop {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let count = self.count.unwrap_or(1);

        let popped = ctx.keyspace().modify::<Set, _>(&self.key, false, |set| {
            let count = count.min(set.len());
            let chosen: Vec<Bytes> = set
                .iter()
                .cloned()
                .choose_multiple(&mut rand::thread_rng(), count);
            for member in &chosen {
                set.remove(member);
            }
            chosen
        })?;

        let frame = match (self.count, popped) {
            (None, popped) => Frame::from(popped.and_then(|mut members| members.pop())),
            (Some(_), popped) => Frame::Array(
                popped
                    .unwrap_or_default()
                    .into_iter()
                    .map(Frame::Bulk)
                    .collect(),
            ),
        };

        Ok(frame)
    }
}

impl TryFrom<&mut CommandParser> for Spop {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let count = match parser.has_next() {
            true => Some(
                usize::try_from(parser.next_integer()?)
                    .map_err(|_| CommandError::range("value is out of range, must be positive"))?,
            ),
            false => None,
        };

        Ok(Self { key, count })
    }
}
