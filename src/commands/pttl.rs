use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Like TTL this command returns the remaining time to live of a key that has an expire set, with
/// the sole difference that TTL returns the amount of remaining time in seconds while PTTL returns
/// it in milliseconds.
///
/// Ref: <https://redis.io/docs/latest/commands/pttl/>
#[derive(Debug, PartialEq)]
pub struct Pttl {
    pub key: String,
}

impl Executable for Pttl {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let ttl = match ctx.keyspace().ttl(&self.key) {
            None => -2,
            Some(None) => -1,
            Some(Some(millis)) => millis as i64,
        };
        Ok(Frame::Integer(ttl))
    }
}

impl TryFrom<&mut CommandParser> for Pttl {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn remaining_millis() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        run(&store, &mut session, &["SET", "key", "v", "PX", "5000"]);

        let Frame::Integer(ttl) = run(&store, &mut session, &["PTTL", "key"]) else {
            panic!("expected integer");
        };
        assert!(ttl > 4000 && ttl <= 5000);
    }
}
