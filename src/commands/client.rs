use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Connection management subcommands.
///
/// Ref: <https://redis.io/docs/latest/commands/client/>
#[derive(Debug, PartialEq)]
pub enum Client {
    GetName,
    SetName(String),
    Id,
    List,
    SetInfo { attribute: String, value: String },
}

impl Executable for Client {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        match self {
            Client::GetName => Ok(ctx
                .session
                .name()
                .map(|name| Frame::Bulk(Bytes::from(name.to_string())))
                .unwrap_or(Frame::Null)),
            Client::SetName(name) => {
                if name.contains(|c: char| c == ' ' || c.is_control()) {
                    return Err(CommandError::range(
                        "Client names cannot contain spaces, newlines or special characters.",
                    ));
                }
                ctx.session
                    .set_name((!name.is_empty()).then_some(name));
                Ok(Frame::ok())
            }
            Client::Id => Ok(Frame::Integer(ctx.session.id() as i64)),
            Client::List => {
                ctx.store.clients().update(ctx.session, "client|list");
                Ok(Frame::Bulk(Bytes::from(ctx.store.clients().list())))
            }
            Client::SetInfo { attribute, value } => {
                match attribute.as_str() {
                    "LIB-NAME" => ctx.session.set_lib_name(value),
                    "LIB-VER" => ctx.session.set_lib_version(value),
                    _ => {
                        return Err(CommandError::range(format!(
                            "Unrecognized option '{}'",
                            attribute
                        )))
                    }
                }
                Ok(Frame::ok())
            }
        }
    }
}

impl TryFrom<&mut CommandParser> for Client {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let subcommand = parser.next_keyword()?;

        let client = match (subcommand.as_str(), parser.remaining()) {
            ("GETNAME", 0) => Client::GetName,
            ("SETNAME", 1) => Client::SetName(parser.next_string()?),
            ("ID", 0) => Client::Id,
            ("LIST", _) => Client::List,
            ("SETINFO", 2) => Client::SetInfo {
                attribute: parser.next_keyword()?,
                value: parser.next_string()?,
            },
            ("GETNAME" | "SETNAME" | "ID" | "SETINFO", _) => {
                return Err(CommandError::WrongArity {
                    command: format!("client|{}", subcommand.to_lowercase()),
                })
            }
            _ => {
                return Err(CommandError::range(format!(
                    "unknown subcommand '{}'. Try CLIENT HELP.",
                    subcommand.to_lowercase()
                )))
            }
        };

        Ok(client)
    }
}
