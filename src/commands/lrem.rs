use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::List;

/// Removes the first `count` occurrences of elements equal to `element` from the list stored at
/// `key`. A positive count walks from head to tail, a negative one from tail to head, and 0
/// removes every occurrence.
///
/// Ref: <https://redis.io/docs/latest/commands/lrem/>
#[derive(Debug, PartialEq)]
pub struct Lrem {
    pub key: String,
    pub count: i64,
    pub element: Bytes,
}

impl Executable for Lrem {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let limit = match self.count.unsigned_abs() {
            0 => usize::MAX,
            n => usize::try_from(n).unwrap_or(usize::MAX),
        };
        let from_tail = self.count < 0;
        let element = self.element;

        let removed = ctx
            .keyspace()
            .modify::<List, _>(&self.key, false, |list| {
                let mut positions: Vec<usize> = list
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| **item == element)
                    .map(|(index, _)| index)
                    .collect();
                if from_tail {
                    positions.reverse();
                }
                positions.truncate(limit);
                positions.sort_unstable_by(|a, b| b.cmp(a));

                for index in &positions {
                    list.remove(*index);
                }
                positions.len()
            })?
            .unwrap_or_default();

        Ok(Frame::Integer(removed as i64))
    }
}

impl TryFrom<&mut CommandParser> for Lrem {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let count = parser.next_integer()?;
        let element = parser.next_bytes()?;

        Ok(Self {
            key,
            count,
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

    fn list(store: &Store, session: &mut Session) -> Frame {
        run(store, session, &["LRANGE", "l", "0", "-1"])
    }

    #[test]
    fn head_tail_and_all() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["RPUSH", "l", "a", "b", "a", "c", "a"]);

        assert_eq!(run(&store, &mut session, &["LREM", "l", "-1", "a"]), Frame::Integer(1));
        assert_eq!(
            list(&store, &mut session),
            Frame::Array(vec![Frame::bulk("a"), Frame::bulk("b"), Frame::bulk("a"), Frame::bulk("c")])
        );

        assert_eq!(run(&store, &mut session, &["LREM", "l", "1", "a"]), Frame::Integer(1));
        assert_eq!(
            list(&store, &mut session),
            Frame::Array(vec![Frame::bulk("b"), Frame::bulk("a"), Frame::bulk("c")])
        );

        run(&store, &mut session, &["RPUSH", "l", "a"]);
        assert_eq!(run(&store, &mut session, &["LREM", "l", "0", "a"]), Frame::Integer(2));
        assert_eq!(
            list(&store, &mut session),
            Frame::Array(vec![Frame::bulk("b"), Frame::bulk("c")])
        );
    }
}
