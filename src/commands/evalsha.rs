use bytes::Bytes;

use crate::commands::eval::keys_and_args;
use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::script;

/// Evaluates a script cached on the server side by its SHA1 digest.
///
/// Ref: <https://redis.io/docs/latest/commands/evalsha/>
#[derive(Debug, PartialEq)]
pub struct Evalsha {
    pub sha: String,
    pub keys: Vec<Bytes>,
    pub args: Vec<Bytes>,
}

impl Executable for Evalsha {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let source = ctx
            .store
            .scripts()
            .get(&self.sha)
            .ok_or(CommandError::NoScript)?;

        script::eval(ctx, &source, &self.keys, &self.args)
    }
}

impl TryFrom<&mut CommandParser> for Evalsha {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let sha = parser.next_string()?;
        let (keys, args) = keys_and_args(parser)?;

        Ok(Self { sha, keys, args })
    }
}
