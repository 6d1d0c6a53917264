use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Get the value of `key` and delete the key. This command is similar to GET, except for the fact
/// that it also deletes the key on success (if and only if the key's value type is a string).
///
/// Ref: <https://redis.io/docs/latest/commands/getdel/>
#[derive(Debug, PartialEq)]
pub struct Getdel {
    pub key: String,
}

impl Executable for Getdel {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let value = keyspace.get_string(&self.key)?;
        if value.is_some() {
            keyspace.remove(&self.key);
        }

        Ok(value.into())
    }
}

impl TryFrom<&mut CommandParser> for Getdel {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
