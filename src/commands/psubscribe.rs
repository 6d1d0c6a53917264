use bytes::Bytes;

use crate::commands::executable::Context;
use crate::commands::parser::CommandParser;
use crate::commands::subscribe::confirmation;
use crate::commands::CommandError;
use crate::dispatch::Reply;

/// Subscribes the client to the given glob-style patterns, e.g. `news.*`.
///
/// Ref: <https://redis.io/docs/latest/commands/psubscribe/>
#[derive(Debug, PartialEq)]
pub struct Psubscribe {
    pub patterns: Vec<Bytes>,
}

impl Psubscribe {
    pub fn run(self, ctx: &mut Context) -> Result<Reply, CommandError> {
        let broker = ctx.store.broker();
        let mut replies = Vec::with_capacity(self.patterns.len());

        for pattern in self.patterns {
            broker.psubscribe(pattern.clone(), ctx.session.id(), ctx.session.messages());
            ctx.session.patterns_mut().insert(pattern.clone());
            replies.push(confirmation(
                "psubscribe",
                Some(pattern),
                ctx.session.subscriptions(),
            ));
        }

        Ok(Reply::Frames(replies))
    }
}

impl TryFrom<&mut CommandParser> for Psubscribe {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let patterns = parser.rest_bytes();
        Ok(Self { patterns })
    }
}
