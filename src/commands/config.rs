use bytes::Bytes;
use glob_match::glob_match;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Read the server configuration. Parameters are fixed at startup.
///
/// Ref: <https://redis.io/docs/latest/commands/config-get/>
#[derive(Debug, PartialEq)]
pub enum Config {
    /// Name/value pairs of every parameter matching any of the glob patterns.
    Get(Vec<String>),
}

impl Executable for Config {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let Config::Get(patterns) = self;

        let pairs = ctx
            .store
            .config()
            .parameters()
            .into_iter()
            .filter(|(name, _)| {
                patterns
                    .iter()
                    .any(|pattern| glob_match(&pattern.to_lowercase(), name))
            })
            .flat_map(|(name, value)| [Frame::Bulk(Bytes::from(name)), Frame::Bulk(Bytes::from(value))])
            .collect();

        Ok(Frame::Array(pairs))
    }
}

impl TryFrom<&mut CommandParser> for Config {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let subcommand = parser.next_keyword()?;

        match (subcommand.as_str(), parser.remaining()) {
            ("GET", 0) => Err(CommandError::WrongArity {
                command: "config|get".to_string(),
            }),
            ("GET", _) => Ok(Config::Get(parser.rest_strings()?)),
            _ => Err(CommandError::range(format!(
                "unknown subcommand '{}'. Try CONFIG HELP.",
                subcommand.to_lowercase()
            ))),
        }
    }
}
