use bytes::Bytes;

use crate::blocking::End;
use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::List;

/// LPUSH, RPUSH, LPUSHX and RPUSHX: insert all the specified values at one end of the list stored
/// at `key`. Elements are inserted one after the other, so `LPUSH mylist a b c` leaves `c` at the
/// head. The X variants only act when the list already exists.
///
/// Returns the length of the list after the push. Clients blocked on the key are served right
/// after.
///
/// Ref: <https://redis.io/docs/latest/commands/lpush/>
#[derive(Debug, PartialEq)]
pub struct Push {
    pub key: String,
    pub elements: Vec<Bytes>,
    pub end: End,
    pub only_existing: bool,
}

impl Push {
    pub fn parse(
        parser: &mut CommandParser,
        end: End,
        only_existing: bool,
    ) -> Result<Push, CommandError> {
        let key = parser.next_string()?;
        let elements = parser.rest_bytes();

        Ok(Push {
            key,
            elements,
            end,
            only_existing,
        })
    }
}

impl Executable for Push {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let end = self.end;

        let len = keyspace
            .modify::<List, _>(&self.key, !self.only_existing, |list| {
                for element in self.elements {
                    end.push(list, element);
                }
                list.len()
            })?
            .unwrap_or_default();

        if len > 0 {
            ctx.wake(&mut keyspace, &self.key);
        }

        Ok(Frame::Integer(len as i64))
    }
}
