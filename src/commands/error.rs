use thiserror::Error as ThisError;

use crate::commands::parser::CommandParserError;
use crate::keyspace::WrongType;

/// Errors a command reports back to the client. The `Display` output is the exact line sent
/// after the `-` prefix.
#[derive(Debug, ThisError, PartialEq)]
pub enum CommandError {
    #[error("ERR wrong number of arguments for '{command}' command")]
    WrongArity { command: String },
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,
    #[error("ERR syntax error")]
    Syntax,
    #[error("ERR value is not an integer or out of range")]
    NotInteger,
    #[error("ERR value is not a valid float")]
    NotFloat,
    #[error("ERR increment or decrement would overflow")]
    Overflow,
    #[error("ERR {0}")]
    Range(String),
    #[error("ERR no such key")]
    NoSuchKey,
    #[error("ERR source and destination objects are the same")]
    SameObject,
    #[error("ERR MULTI calls can not be nested")]
    NestedMulti,
    #[error("ERR EXEC without MULTI")]
    ExecWithoutMulti,
    #[error("ERR DISCARD without MULTI")]
    DiscardWithoutMulti,
    #[error("EXECABORT Transaction discarded because of previous errors.")]
    ExecAbort,
    #[error("NOSCRIPT No matching script. Please use EVAL.")]
    NoScript,
    #[error("ERR unknown command '{command}'")]
    UnknownCommand { command: String },
    #[error("ERR Can't execute '{command}': only (P)SUBSCRIBE / (P)UNSUBSCRIBE / PING / QUIT are allowed in this context")]
    SubscribedContext { command: String },
    #[error("ERR Protocol error: {0}")]
    Protocol(String),
    #[error("ERR {0}")]
    Script(String),
}

impl CommandError {
    pub fn range(message: impl Into<String>) -> CommandError {
        CommandError::Range(message.into())
    }
}

impl From<WrongType> for CommandError {
    fn from(_: WrongType) -> Self {
        CommandError::WrongType
    }
}

impl From<CommandParserError> for CommandError {
    fn from(err: CommandParserError) -> Self {
        match err {
            CommandParserError::InvalidInteger => CommandError::NotInteger,
            CommandParserError::InvalidFloat => CommandError::NotFloat,
            CommandParserError::InvalidUTF8String(_)
            | CommandParserError::InvalidCommandArgument { .. }
            | CommandParserError::EndOfStream => CommandError::Syntax,
        }
    }
}
