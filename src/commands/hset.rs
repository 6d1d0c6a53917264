use bytes::Bytes;
use itertools::Itertools;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Hash;

/// Sets the specified fields to their respective values in the hash stored at `key`. Creates the
/// hash when it does not exist.
///
/// HSET replies with the number of fields that were added. HMSET, its deprecated form, replies
/// with OK.
///
/// Ref: <https://redis.io/docs/latest/commands/hset/>
#[derive(Debug, PartialEq)]
pub struct Hset {
    pub key: String,
    pub pairs: Vec<(Bytes, Bytes)>,
    /// Parsed from HMSET.
    pub multi: bool,
}

impl Hset {
    /// HMSET key field value [field value ...]
    pub fn multi(parser: &mut CommandParser) -> Result<Hset, CommandError> {
        let key = parser.next_string()?;
        let pairs = field_value_pairs(parser, "hmset")?;

        Ok(Hset {
            key,
            pairs,
            multi: true,
        })
    }
}

impl Executable for Hset {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let added = ctx
            .keyspace()
            .modify::<Hash, _>(&self.key, true, |hash| {
                self.pairs
                    .into_iter()
                    .filter(|(field, value)| hash.insert(field.clone(), value.clone()).is_none())
                    .count()
            })?
            .unwrap_or_default();

        if self.multi {
            return Ok(Frame::ok());
        }
        Ok(Frame::Integer(added as i64))
    }
}

impl TryFrom<&mut CommandParser> for Hset {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let pairs = field_value_pairs(parser, "hset")?;

        Ok(Self {
            key,
            pairs,
            multi: false,
        })
    }
}

fn field_value_pairs(
    parser: &mut CommandParser,
    command: &str,
) -> Result<Vec<(Bytes, Bytes)>, CommandError> {
    if parser.remaining() == 0 || parser.remaining() % 2 != 0 {
        return Err(CommandError::WrongArity {
            command: command.to_string(),
        });
    }

    Ok(parser.rest_bytes().into_iter().tuples().collect())
}
