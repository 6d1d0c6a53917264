use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::keyspace::now_millis;

/// Set a timeout on `key`, in seconds. After the timeout has expired, the key will
/// automatically be deleted. A non-positive timeout deletes the key right away.
///
/// Returns 1 if the timeout was set, 0 if the key does not exist.
///
/// Ref: <https://redis.io/docs/latest/commands/expire/>
#[derive(Debug, PartialEq)]
pub struct Expire {
    pub key: String,
    pub seconds: i64,
}

impl Executable for Expire {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let millis = self
            .seconds
            .checked_mul(1000)
            .ok_or_else(|| invalid_expire_time("expire"))?;
        expire_in(ctx, &self.key, millis, "expire")
    }
}

impl TryFrom<&mut CommandParser> for Expire {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let seconds = parser.next_integer()?;

        Ok(Self { key, seconds })
    }
}

pub(crate) fn invalid_expire_time(command: &str) -> CommandError {
    CommandError::range(format!("invalid expire time in '{}' command", command))
}

/// Absolute deadline `millis` from now, or `None` when it does not fit a timestamp.
pub(crate) fn deadline(millis: i64) -> Option<u64> {
    let millis = u64::try_from(millis).ok()?;
    now_millis().checked_add(millis)
}

/// Shared by EXPIRE and PEXPIRE once the timeout is known in milliseconds.
pub(crate) fn expire_in(
    ctx: &mut Context,
    key: &str,
    millis: i64,
    command: &str,
) -> Result<Frame, CommandError> {
    let mut keyspace = ctx.keyspace();

    if millis <= 0 {
        let removed = keyspace.remove(key);
        return Ok(Frame::Integer(removed as i64));
    }

    let expires_at = deadline(millis).ok_or_else(|| invalid_expire_time(command))?;
    let updated = keyspace.expire(key, expires_at);

    Ok(Frame::Integer(updated as i64))
}
