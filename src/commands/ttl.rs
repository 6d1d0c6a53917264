use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// TTL returns the remaining time to live of a key that has a timeout. This introspection
/// capability allows a Redis client to check how many seconds a given key will continue to be part
/// of the dataset.
///
/// Returns -2 when the key does not exist and -1 when it exists without an expiration.
///
/// Ref: <https://redis.io/docs/latest/commands/ttl>
#[derive(Debug, PartialEq)]
pub struct Ttl {
    pub key: String,
}

impl Executable for Ttl {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let ttl = match ctx.keyspace().ttl(&self.key) {
            None => -2,
            Some(None) => -1,
            // Rounded to the closest second.
            Some(Some(millis)) => ((millis + 500) / 1000) as i64,
        };
        Ok(Frame::Integer(ttl))
    }
}

impl TryFrom<&mut CommandParser> for Ttl {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
