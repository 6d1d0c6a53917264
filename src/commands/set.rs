use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::expire::{deadline, invalid_expire_time};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::{Data, Value};

/// Set `key` to hold the string `value`. If key already holds a value, it is overwritten,
/// regardless of its type. Any previous time to live associated with the key is discarded on
/// successful SET operation, unless KEEPTTL is given.
///
/// Ref: <https://redis.io/docs/latest/commands/set/>
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: String,
    pub value: Bytes,
    pub condition: Option<Condition>,
    pub ttl: Option<Ttl>,
    /// Reply with the previous value instead of OK.
    pub get: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// Only set the key if it does not already exist.
    Nx,
    /// Only set the key if it already exists.
    Xx,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ttl {
    Ex(i64),
    Px(i64),
    ExAt(i64),
    PxAt(i64),
    KeepTtl,
}

impl Ttl {
    /// Absolute deadline in unix milliseconds. `None` for KEEPTTL.
    pub fn deadline(self, command: &str) -> Result<Option<u64>, CommandError> {
        let invalid = || invalid_expire_time(command);
        let at = match self {
            Ttl::KeepTtl => return Ok(None),
            Ttl::Ex(seconds) if seconds > 0 => seconds.checked_mul(1000).and_then(deadline),
            Ttl::Px(millis) if millis > 0 => deadline(millis),
            Ttl::ExAt(seconds) if seconds > 0 => seconds
                .checked_mul(1000)
                .and_then(|millis| u64::try_from(millis).ok()),
            Ttl::PxAt(millis) if millis > 0 => u64::try_from(millis).ok(),
            _ => None,
        };
        at.map(Some).ok_or_else(invalid)
    }

    /// Parses the argument following an EX / PX / EXAT / PXAT keyword.
    pub fn parse(keyword: &str, parser: &mut CommandParser) -> Result<Ttl, CommandError> {
        let value = parser.next_integer()?;
        match keyword {
            "EX" => Ok(Ttl::Ex(value)),
            "PX" => Ok(Ttl::Px(value)),
            "EXAT" => Ok(Ttl::ExAt(value)),
            "PXAT" => Ok(Ttl::PxAt(value)),
            _ => Err(CommandError::Syntax),
        }
    }
}

impl Executable for Set {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let expires_at = match self.ttl {
            Some(ttl) => ttl.deadline("set")?,
            None => None,
        };

        let mut keyspace = ctx.keyspace();

        let previous = if self.get {
            keyspace.get_string(&self.key)?
        } else {
            None
        };

        let exists = keyspace.exists(&self.key);
        let allowed = match self.condition {
            Some(Condition::Nx) => !exists,
            Some(Condition::Xx) => exists,
            None => true,
        };

        if allowed {
            let expires_at = match self.ttl {
                Some(Ttl::KeepTtl) => keyspace.get(&self.key).and_then(|value| value.expires_at),
                _ => expires_at,
            };
            let value = Value::with_expiration(Data::String(self.value), expires_at);
            keyspace.put(self.key, value);
        }

        match (self.get, allowed) {
            (true, _) => Ok(previous.into()),
            (false, true) => Ok(Frame::ok()),
            (false, false) => Ok(Frame::Null),
        }
    }
}

impl TryFrom<&mut CommandParser> for Set {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let value = parser.next_bytes()?;

        let mut condition = None;
        let mut ttl = None;
        let mut get = false;

        while parser.has_next() {
            let option = parser.next_keyword()?;
            match option.as_str() {
                "NX" if condition.is_none() => condition = Some(Condition::Nx),
                "XX" if condition.is_none() => condition = Some(Condition::Xx),
                "GET" => get = true,
                "KEEPTTL" if ttl.is_none() => ttl = Some(Ttl::KeepTtl),
                "EX" | "PX" | "EXAT" | "PXAT" if ttl.is_none() => {
                    ttl = Some(Ttl::parse(&option, parser)?);
                }
                _ => return Err(CommandError::Syntax),
            }
        }

        Ok(Self {
            key,
            value,
            condition,
            ttl,
            get,
        })
    }
}
