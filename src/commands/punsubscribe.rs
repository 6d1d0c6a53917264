use bytes::Bytes;

use crate::commands::executable::Context;
use crate::commands::parser::CommandParser;
use crate::commands::subscribe::confirmation;
use crate::commands::CommandError;
use crate::dispatch::Reply;
use crate::frame::Frame;

/// Unsubscribes the client from the given patterns, or from all of them when none is given.
///
/// Ref: <https://redis.io/docs/latest/commands/punsubscribe/>
#[derive(Debug, PartialEq)]
pub struct Punsubscribe {
    pub patterns: Vec<Bytes>,
}

impl Punsubscribe {
    pub fn run(self, ctx: &mut Context) -> Result<Reply, CommandError> {
        let patterns = match self.patterns.is_empty() {
            true => {
                let mut patterns: Vec<Bytes> = ctx.session.patterns().iter().cloned().collect();
                patterns.sort();
                patterns
            }
            false => self.patterns,
        };

        if patterns.is_empty() {
            let count = ctx.session.subscriptions();
            return Ok(Reply::Frame(confirmation("punsubscribe", None, count)));
        }

        let broker = ctx.store.broker();
        let replies: Vec<Frame> = patterns
            .into_iter()
            .map(|pattern| {
                broker.punsubscribe(&pattern, ctx.session.id());
                ctx.session.patterns_mut().remove(&pattern);
                confirmation("punsubscribe", Some(pattern), ctx.session.subscriptions())
            })
            .collect();

        Ok(Reply::Frames(replies))
    }
}

impl TryFrom<&mut CommandParser> for Punsubscribe {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let patterns = parser.rest_bytes();
        Ok(Self { patterns })
    }
}
