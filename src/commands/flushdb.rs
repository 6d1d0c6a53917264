use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Delete all the keys of the currently selected database. `ASYNC` and `SYNC` are accepted;
/// the flush always happens before the reply.
///
/// Ref: <https://redis.io/docs/latest/commands/flushdb/>
#[derive(Debug, PartialEq)]
pub struct FlushDB;

/// Parses the optional ASYNC / SYNC flag shared by FLUSHDB and FLUSHALL.
pub(crate) fn flush_mode(parser: &mut CommandParser) -> Result<(), CommandError> {
    if parser.has_next() {
        match parser.next_keyword()?.as_str() {
            "ASYNC" | "SYNC" => {}
            _ => return Err(CommandError::Syntax),
        }
    }
    Ok(())
}

impl Executable for FlushDB {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        ctx.keyspace().clear();
        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for FlushDB {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        flush_mode(parser)?;
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn flushes_selected_database_only() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["SET", "a", "1"]);
        run(&store, &mut session, &["SELECT", "1"]);
        run(&store, &mut session, &["SET", "b", "1"]);

        assert_eq!(run(&store, &mut session, &["FLUSHDB", "ASYNC"]), Frame::ok());
        assert_eq!(run(&store, &mut session, &["DBSIZE"]), Frame::Integer(0));

        run(&store, &mut session, &["SELECT", "0"]);
        assert_eq!(run(&store, &mut session, &["DBSIZE"]), Frame::Integer(1));

        assert_eq!(
            run(&store, &mut session, &["FLUSHDB", "LATER"]),
            Frame::Error("ERR syntax error".to_string())
        );
    }
}
