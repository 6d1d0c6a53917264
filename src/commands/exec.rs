use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::dispatch;
use crate::frame::Frame;

/// Executes all previously queued commands in a transaction and restores the connection state
/// to normal. Runs with every other session excluded, so the batch is never interleaved.
///
/// Ref: <https://redis.io/docs/latest/commands/exec/>
#[derive(Debug, PartialEq)]
pub struct Exec;

impl Executable for Exec {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let queue = ctx.session.take_for_exec()?;
        Ok(Frame::Array(dispatch::execute_queued(ctx, queue)))
    }
}

impl TryFrom<&mut CommandParser> for Exec {
    type Error = CommandError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
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
    fn list_push_inside_transaction() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        run(&store, &mut session, &["MULTI"]);
        run(&store, &mut session, &["LPUSH", "l", "a", "b", "c"]);

        assert_eq!(
            run(&store, &mut session, &["EXEC"]),
            Frame::Array(vec![Frame::Integer(3)])
        );
    }

    #[test]
    fn empty_transaction() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        run(&store, &mut session, &["MULTI"]);
        assert_eq!(run(&store, &mut session, &["EXEC"]), Frame::Array(vec![]));
    }
}
