use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Returns PONG if no argument is provided, otherwise return a copy of the argument as a bulk.
/// While subscribed, replies with a `["pong", payload]` array instead.
///
/// Ref: <https://redis.io/docs/latest/commands/ping>
#[derive(Debug, PartialEq)]
pub struct Ping {
    pub payload: Option<Bytes>,
}

impl Executable for Ping {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        if ctx.session.is_subscribed() {
            return Ok(Frame::Array(vec![
                Frame::bulk("pong"),
                Frame::Bulk(self.payload.unwrap_or_default()),
            ]));
        }

        let res = self
            .payload
            .map_or(Frame::Simple("PONG".to_string()), Frame::Bulk);

        Ok(res)
    }
}

impl TryFrom<&mut CommandParser> for Ping {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let payload = match parser.has_next() {
            true => Some(parser.next_bytes()?),
            false => None,
        };

        Ok(Self { payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn parse() {
        let frame = Frame::Array(vec![Frame::bulk("PING"), Frame::bulk("hello")]);

        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(
            cmd,
            Command::Ping(Ping {
                payload: Some(Bytes::from("hello"))
            })
        );
    }

    #[test]
    fn pong() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        assert_eq!(
            run(&store, &mut session, &["PING"]),
            Frame::Simple("PONG".to_string())
        );
        assert_eq!(
            run(&store, &mut session, &["PING", "hello"]),
            Frame::bulk("hello")
        );
    }
}
