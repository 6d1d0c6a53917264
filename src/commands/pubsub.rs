use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Introspection of the pub/sub subsystem.
///
/// Ref: <https://redis.io/docs/latest/commands/pubsub/>
#[derive(Debug, PartialEq)]
pub enum Pubsub {
    /// Active channels, those with at least one subscriber, optionally matching a pattern.
    Channels(Option<String>),
    /// Subscriber counts for the given channels.
    NumSub(Vec<Bytes>),
    /// Number of patterns subscribed to by all clients.
    NumPat,
}

impl Executable for Pubsub {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let broker = ctx.store.broker();

        let frame = match self {
            Pubsub::Channels(pattern) => {
                let mut channels = broker.channel_names(pattern.as_deref());
                channels.sort();
                Frame::Array(channels.into_iter().map(Frame::Bulk).collect())
            }
            Pubsub::NumSub(channels) => Frame::Array(
                channels
                    .into_iter()
                    .flat_map(|channel| {
                        let count = broker.numsub(&channel) as i64;
                        [Frame::Bulk(channel), Frame::Integer(count)]
                    })
                    .collect(),
            ),
            Pubsub::NumPat => Frame::Integer(broker.numpat() as i64),
        };

        Ok(frame)
    }
}

impl TryFrom<&mut CommandParser> for Pubsub {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let subcommand = parser.next_keyword()?;

        let pubsub = match (subcommand.as_str(), parser.remaining()) {
            ("CHANNELS", 0) => Pubsub::Channels(None),
            ("CHANNELS", 1) => Pubsub::Channels(Some(parser.next_string()?)),
            ("NUMSUB", _) => Pubsub::NumSub(parser.rest_bytes()),
            ("NUMPAT", 0) => Pubsub::NumPat,
            ("CHANNELS" | "NUMPAT", _) => {
                return Err(CommandError::WrongArity {
                    command: format!("pubsub|{}", subcommand.to_lowercase()),
                })
            }
            _ => {
                return Err(CommandError::range(format!(
                    "unknown subcommand '{}'. Try PUBSUB HELP.",
                    subcommand.to_lowercase()
                )))
            }
        };

        Ok(pubsub)
    }
}
