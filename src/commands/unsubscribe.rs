use bytes::Bytes;

use crate::commands::executable::Context;
use crate::commands::parser::CommandParser;
use crate::commands::subscribe::confirmation;
use crate::commands::CommandError;
use crate::dispatch::Reply;
use crate::frame::Frame;

/// Unsubscribes the client from the given channels, or from all of them when none is given.
///
/// Ref: <https://redis.io/docs/latest/commands/unsubscribe/>
#[derive(Debug, PartialEq)]
pub struct Unsubscribe {
    pub channels: Vec<Bytes>,
}

impl Unsubscribe {
    pub fn run(self, ctx: &mut Context) -> Result<Reply, CommandError> {
        let channels = match self.channels.is_empty() {
            true => {
                let mut channels: Vec<Bytes> = ctx.session.channels().iter().cloned().collect();
                channels.sort();
                channels
            }
            false => self.channels,
        };

        if channels.is_empty() {
            let count = ctx.session.subscriptions();
            return Ok(Reply::Frame(confirmation("unsubscribe", None, count)));
        }

        let broker = ctx.store.broker();
        let replies: Vec<Frame> = channels
            .into_iter()
            .map(|channel| {
                broker.unsubscribe(&channel, ctx.session.id());
                ctx.session.channels_mut().remove(&channel);
                confirmation("unsubscribe", Some(channel), ctx.session.subscriptions())
            })
            .collect();

        Ok(Reply::Frames(replies))
    }
}

impl TryFrom<&mut CommandParser> for Unsubscribe {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let channels = parser.rest_bytes();
        Ok(Self { channels })
    }
}
