use bytes::Bytes;

use crate::commands::executable::Context;
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::dispatch::Reply;
use crate::frame::Frame;

/// Subscribes the client to the specified channels. Once subscribed the client only accepts
/// the (P)SUBSCRIBE, (P)UNSUBSCRIBE, PING and QUIT commands.
///
/// Replies with one `["subscribe", channel, count]` confirmation per channel, `count` being the
/// number of channels and patterns the client is now subscribed to.
///
/// Ref: <https://redis.io/docs/latest/commands/subscribe/>
#[derive(Debug, PartialEq)]
pub struct Subscribe {
    pub channels: Vec<Bytes>,
}

/// One (un)subscription confirmation.
pub(crate) fn confirmation(kind: &'static str, name: Option<Bytes>, count: usize) -> Frame {
    Frame::Array(vec![
        Frame::bulk(kind),
        name.map_or(Frame::Null, Frame::Bulk),
        Frame::Integer(count as i64),
    ])
}

impl Subscribe {
    pub fn run(self, ctx: &mut Context) -> Result<Reply, CommandError> {
        let broker = ctx.store.broker();
        let mut replies = Vec::with_capacity(self.channels.len());

        for channel in self.channels {
            broker.subscribe(channel.clone(), ctx.session.id(), ctx.session.messages());
            ctx.session.channels_mut().insert(channel.clone());
            replies.push(confirmation(
                "subscribe",
                Some(channel),
                ctx.session.subscriptions(),
            ));
        }

        Ok(Reply::Frames(replies))
    }
}

impl TryFrom<&mut CommandParser> for Subscribe {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let channels = parser.rest_bytes();
        Ok(Self { channels })
    }
}
