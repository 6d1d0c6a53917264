use crate::blocking::End;
use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::List;

/// LPOP and RPOP: remove and return elements from one end of the list stored at `key`.
///
/// Without `count` the reply is a single element, or nil. With `count` it is an array of up to
/// `count` elements, or nil when the key does not exist.
///
/// Ref: <https://redis.io/docs/latest/commands/lpop/>
#[derive(Debug, PartialEq)]
pub struct Pop {
    pub key: String,
    pub end: End,
    pub count: Option<usize>,
}

impl Pop {
    pub fn parse(parser: &mut CommandParser, end: End) -> Result<Pop, CommandError> {
        let key = parser.next_string()?;
        let count = match parser.has_next() {
            true => {
                let count = parser.next_integer()?;
                let count = usize::try_from(count)
                    .map_err(|_| CommandError::range("value is out of range, must be positive"))?;
                Some(count)
            }
            false => None,
        };

        Ok(Pop { key, end, count })
    }
}

impl Executable for Pop {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let end = self.end;
        let count = self.count.unwrap_or(1);

        let popped = ctx
            .keyspace()
            .modify::<List, _>(&self.key, false, |list| {
                let count = count.min(list.len());
                (0..count).filter_map(|_| end.pop(list)).collect::<Vec<_>>()
            })?;

        let frame = match (self.count, popped) {
            (_, None) => Frame::Null,
            (None, Some(mut elements)) => elements.pop().into(),
            (Some(_), Some(elements)) => {
                Frame::Array(elements.into_iter().map(Frame::Bulk).collect())
            }
        };

        Ok(frame)
    }
}
