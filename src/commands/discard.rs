use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Flushes all previously queued commands in a transaction.
///
/// Ref: <https://redis.io/docs/latest/commands/discard/>
#[derive(Debug, PartialEq)]
pub struct Discard;

impl Executable for Discard {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        ctx.session.discard()?;
        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for Discard {
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
    fn drops_queue() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        run(&store, &mut session, &["MULTI"]);
        run(&store, &mut session, &["SET", "a", "1"]);

        assert_eq!(run(&store, &mut session, &["DISCARD"]), Frame::ok());
        assert_eq!(run(&store, &mut session, &["EXISTS", "a"]), Frame::Integer(0));
        assert_eq!(
            run(&store, &mut session, &["DISCARD"]),
            Frame::Error("ERR DISCARD without MULTI".to_string())
        );
    }
}
