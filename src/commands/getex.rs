use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::set::Ttl;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Get the value of key and optionally set its expiration.
///
/// Ref: <https://redis.io/docs/latest/commands/getex/>
#[derive(Debug, PartialEq)]
pub struct Getex {
    pub key: String,
    pub expiration: Option<Expiration>,
}

#[derive(Debug, PartialEq)]
pub enum Expiration {
    Set(Ttl),
    /// Remove the expiration.
    Persist,
}

impl Executable for Getex {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let expires_at = match &self.expiration {
            Some(Expiration::Set(ttl)) => ttl.deadline("getex")?,
            _ => None,
        };

        let mut keyspace = ctx.keyspace();
        let value = keyspace.get_string(&self.key)?;

        if value.is_some() {
            match (self.expiration, expires_at) {
                (Some(Expiration::Set(_)), Some(at)) => {
                    keyspace.expire(&self.key, at);
                }
                (Some(Expiration::Persist), _) => {
                    keyspace.persist(&self.key);
                }
                _ => {}
            }
        }

        Ok(value.into())
    }
}

impl TryFrom<&mut CommandParser> for Getex {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;

        let mut expiration = None;

        while parser.has_next() {
            let option = parser.next_keyword()?;
            match option.as_str() {
                "EX" | "PX" | "EXAT" | "PXAT" if expiration.is_none() => {
                    expiration = Some(Expiration::Set(Ttl::parse(&option, parser)?));
                }
                "PERSIST" if expiration.is_none() => expiration = Some(Expiration::Persist),
                _ => return Err(CommandError::Syntax),
            }
        }

        Ok(Self { key, expiration })
    }
}
