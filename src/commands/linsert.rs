use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::List;

/// Inserts `element` in the list stored at `key` either before or after the reference value
/// `pivot`.
///
/// Returns the list length after the insert, -1 when the pivot was not found and 0 when the key
/// does not exist.
///
/// Ref: <https://redis.io/docs/latest/commands/linsert/>
#[derive(Debug, PartialEq)]
pub struct Linsert {
    pub key: String,
    pub position: Position,
    pub pivot: Bytes,
    pub element: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    Before,
    After,
}

impl Executable for Linsert {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let (position, pivot, element) = (self.position, self.pivot, self.element);

        let res = keyspace.modify::<List, _>(&self.key, false, |list| {
            let index = list.iter().position(|item| *item == pivot)?;
            let index = match position {
                Position::Before => index,
                Position::After => index + 1,
            };
            list.insert(index, element);
            Some(list.len())
        })?;

        let len = match res {
            None => 0,
            Some(None) => -1,
            Some(Some(len)) => {
                ctx.wake(&mut keyspace, &self.key);
                len as i64
            }
        };

        Ok(Frame::Integer(len))
    }
}

impl TryFrom<&mut CommandParser> for Linsert {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let position = match parser.next_keyword()?.as_str() {
            "BEFORE" => Position::Before,
            "AFTER" => Position::After,
            _ => return Err(CommandError::Syntax),
        };
        let pivot = parser.next_bytes()?;
        let element = parser.next_bytes()?;

        Ok(Self {
            key,
            position,
            pivot,
            element,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn before_and_after() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["RPUSH", "l", "Hello", "World"]);

        assert_eq!(
            run(&store, &mut session, &["LINSERT", "l", "BEFORE", "World", "There"]),
            Frame::Integer(3)
        );
        assert_eq!(
            run(&store, &mut session, &["LINSERT", "l", "after", "World", "!"]),
            Frame::Integer(4)
        );
        assert_eq!(
            run(&store, &mut session, &["LRANGE", "l", "0", "-1"]),
            Frame::Array(vec![
                Frame::bulk("Hello"),
                Frame::bulk("There"),
                Frame::bulk("World"),
                Frame::bulk("!"),
            ])
        );
        assert_eq!(run(&store, &mut session, &["LLEN", "l"]), Frame::Integer(4));
    }

    #[test]
    fn missing_pivot_or_key() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["RPUSH", "l", "a"]);

        assert_eq!(
            run(&store, &mut session, &["LINSERT", "l", "BEFORE", "x", "y"]),
            Frame::Integer(-1)
        );
        assert_eq!(
            run(&store, &mut session, &["LINSERT", "nope", "BEFORE", "x", "y"]),
            Frame::Integer(0)
        );
        assert_eq!(
            run(&store, &mut session, &["LINSERT", "l", "MIDDLE", "a", "y"]),
            Frame::Error("ERR syntax error".to_string())
        );
    }
}
