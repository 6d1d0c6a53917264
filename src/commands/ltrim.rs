use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::utils::range;
use crate::value::List;

/// Trim an existing list so that it will contain only the specified range of elements. An empty
/// range removes the key.
///
/// Ref: <https://redis.io/docs/latest/commands/ltrim/>
#[derive(Debug, PartialEq)]
pub struct Ltrim {
    pub key: String,
    pub start: i64,
    pub stop: i64,
}

impl Executable for Ltrim {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let (start, stop) = (self.start, self.stop);

        ctx.keyspace()
            .modify::<List, _>(&self.key, false, |list| {
                match range::resolve(start, stop, list.len()) {
                    Some((start, stop)) => {
                        list.truncate(stop + 1);
                        list.drain(..start);
                    }
                    None => list.clear(),
                }
            })?;

        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for Ltrim {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let start = parser.next_integer()?;
        let stop = parser.next_integer()?;

        Ok(Self { key, start, stop })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn trims() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["RPUSH", "l", "one", "two", "three"]);

        assert_eq!(run(&store, &mut session, &["LTRIM", "l", "1", "-1"]), Frame::ok());
        assert_eq!(
            run(&store, &mut session, &["LRANGE", "l", "0", "-1"]),
            Frame::Array(vec![Frame::bulk("two"), Frame::bulk("three")])
        );

        assert_eq!(run(&store, &mut session, &["LTRIM", "l", "5", "10"]), Frame::ok());
        assert_eq!(run(&store, &mut session, &["EXISTS", "l"]), Frame::Integer(0));
    }
}
