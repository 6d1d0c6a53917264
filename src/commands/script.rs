use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Script cache management.
///
/// Ref: <https://redis.io/docs/latest/commands/script-load/>
#[derive(Debug, PartialEq)]
pub enum Script {
    /// Caches a script without running it and returns its digest.
    Load(String),
    /// Reports, for each digest, whether the script is cached.
    Exists(Vec<String>),
    Flush,
}

impl Executable for Script {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let scripts = ctx.store.scripts();

        let frame = match self {
            Script::Load(source) => Frame::Bulk(Bytes::from(scripts.load(&source))),
            Script::Exists(digests) => Frame::Array(
                digests
                    .iter()
                    .map(|sha| Frame::Integer(scripts.exists(sha) as i64))
                    .collect(),
            ),
            Script::Flush => {
                scripts.flush();
                Frame::ok()
            }
        };

        Ok(frame)
    }
}

impl TryFrom<&mut CommandParser> for Script {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let subcommand = parser.next_keyword()?;

        let script = match (subcommand.as_str(), parser.remaining()) {
            ("LOAD", 1) => Script::Load(parser.next_string()?),
            ("EXISTS", n) if n > 0 => Script::Exists(parser.rest_strings()?),
            ("FLUSH", 0) => Script::Flush,
            ("FLUSH", 1) => match parser.next_keyword()?.as_str() {
                "ASYNC" | "SYNC" => Script::Flush,
                _ => return Err(CommandError::Syntax),
            },
            ("LOAD" | "EXISTS" | "FLUSH", _) => {
                return Err(CommandError::WrongArity {
                    command: format!("script|{}", subcommand.to_lowercase()),
                })
            }
            _ => {
                return Err(CommandError::range(format!(
                    "unknown subcommand '{}'. Try SCRIPT HELP.",
                    subcommand.to_lowercase()
                )))
            }
        };

        Ok(script)
    }
}
