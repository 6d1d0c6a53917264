use crate::blocking::Kind;
use crate::commands::bpop::parse_timeout;
use crate::commands::executable::Context;
use crate::commands::parser::CommandParser;
use crate::commands::rpoplpush::pop_push;
use crate::commands::CommandError;
use crate::dispatch::Reply;
use crate::frame::Frame;
use tokio::time::Duration;

/// The blocking variant of RPOPLPUSH. When `source` is empty the client blocks until an element
/// is pushed to it or `timeout` elapses.
///
/// Ref: <https://redis.io/docs/latest/commands/brpoplpush/>
#[derive(Debug, PartialEq)]
pub struct Brpoplpush {
    pub source: String,
    pub destination: String,
    pub timeout: Option<Duration>,
}

impl Brpoplpush {
    pub fn run(self, ctx: &mut Context) -> Result<Reply, CommandError> {
        let mut keyspace = ctx.keyspace();

        if let Some(element) = pop_push(ctx, &mut keyspace, &self.source, &self.destination)? {
            return Ok(Frame::Bulk(element).into());
        }

        if !ctx.blocking {
            return Ok(Frame::Null.into());
        }

        let blocked = ctx.store.blocking().register(
            ctx.session.db(),
            vec![self.source],
            Kind::PopPush {
                destination: self.destination,
            },
            self.timeout,
        );
        Ok(Reply::Blocked(blocked))
    }
}

impl TryFrom<&mut CommandParser> for Brpoplpush {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let source = parser.next_string()?;
        let destination = parser.next_string()?;
        let timeout = parse_timeout(&parser.next_bytes()?)?;

        Ok(Self {
            source,
            destination,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{dispatch, run};
    use crate::session::Session;
    use crate::store::Store;

    fn request(args: &[&str]) -> Frame {
        Frame::Array(args.iter().map(|arg| Frame::bulk(arg.to_string())).collect())
    }

    #[test]
    fn moves_immediately_when_source_has_elements() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["RPUSH", "src", "a", "b"]);

        assert_eq!(
            run(&store, &mut session, &["BRPOPLPUSH", "src", "dst", "0"]),
            Frame::bulk("b")
        );
        assert_eq!(run(&store, &mut session, &["LLEN", "dst"]), Frame::Integer(1));
    }

    #[test]
    fn blocks_until_source_is_pushed() {
        let store = Store::default();
        let (mut waiting, _rx) = Session::new(1, None);
        let (mut pushing, _rx) = Session::new(2, None);

        let Reply::Blocked(mut blocked) =
            dispatch(&store, &mut waiting, request(&["BRPOPLPUSH", "src", "dst", "5"]))
        else {
            panic!("expected the command to block");
        };
        assert_eq!(blocked.timeout, Some(Duration::from_secs(5)));

        run(&store, &mut pushing, &["LPUSH", "src", "x"]);

        assert_eq!(blocked.rx.try_recv().unwrap(), Frame::bulk("x"));
        assert_eq!(
            run(&store, &mut pushing, &["LRANGE", "dst", "0", "-1"]),
            Frame::Array(vec![Frame::bulk("x")])
        );
    }
}
