use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::{contracts, lookup, CommandError, Contract};
use crate::frame::Frame;

/// Introspection of the command table.
///
/// Ref: <https://redis.io/docs/latest/commands/command/>
#[derive(Debug, PartialEq)]
pub enum Command {
    /// Details about every command.
    List,
    Count,
    /// Details about the given commands, nil for unknown ones.
    Info(Vec<String>),
    /// Documentation is not tracked; replies with an empty map.
    Docs,
}

/// `[name, arity, flags, first key, last key, step]`, as in COMMAND INFO.
fn describe(contract: &Contract) -> Frame {
    let keyed = i64::from(contract.value_type.is_some());
    let flags = contract
        .flags()
        .into_iter()
        .map(|flag| Frame::Simple(flag.to_string()))
        .collect();

    Frame::Array(vec![
        Frame::Bulk(Bytes::from(contract.name)),
        Frame::Integer(contract.arity()),
        Frame::Array(flags),
        Frame::Integer(keyed),
        Frame::Integer(keyed),
        Frame::Integer(keyed),
    ])
}

impl Executable for Command {
    fn exec(self, _ctx: &mut Context) -> Result<Frame, CommandError> {
        let frame = match self {
            Command::List => {
                let mut all: Vec<&Contract> = contracts().collect();
                all.sort_by_key(|contract| contract.name);
                Frame::Array(all.into_iter().map(describe).collect())
            }
            Command::Count => Frame::Integer(contracts().count() as i64),
            Command::Info(names) => Frame::Array(
                names
                    .iter()
                    .map(|name| lookup(&name.to_lowercase()).map_or(Frame::Null, describe))
                    .collect(),
            ),
            Command::Docs => Frame::Array(vec![]),
        };

        Ok(frame)
    }
}

impl TryFrom<&mut CommandParser> for Command {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if !parser.has_next() {
            return Ok(Command::List);
        }

        let subcommand = parser.next_keyword()?;
        let command = match subcommand.as_str() {
            "COUNT" if !parser.has_next() => Command::Count,
            "INFO" => Command::Info(parser.rest_strings()?),
            "DOCS" => Command::Docs,
            "COUNT" => {
                return Err(CommandError::WrongArity {
                    command: "command|count".to_string(),
                })
            }
            _ => {
                return Err(CommandError::range(format!(
                    "unknown subcommand '{}'. Try COMMAND HELP.",
                    subcommand.to_lowercase()
                )))
            }
        };

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn count_and_info() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        assert_eq!(
            run(&store, &mut session, &["COMMAND", "COUNT"]),
            Frame::Integer(contracts().count() as i64)
        );
        assert_eq!(
            run(&store, &mut session, &["COMMAND", "INFO", "GET", "nope"]),
            Frame::Array(vec![
                Frame::Array(vec![
                    Frame::bulk("get"),
                    Frame::Integer(2),
                    Frame::Array(vec![Frame::Simple("typed".to_string())]),
                    Frame::Integer(1),
                    Frame::Integer(1),
                    Frame::Integer(1),
                ]),
                Frame::Null,
            ])
        );
    }

    #[test]
    fn lists_every_command() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        let Frame::Array(all) = run(&store, &mut session, &["COMMAND"]) else {
            panic!("expected array");
        };
        assert_eq!(all.len(), contracts().count());
    }
}
