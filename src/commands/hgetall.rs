use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Hash;

/// Returns all fields and values of the hash stored at `key`, as a flat list of field followed by
/// value.
///
/// Ref: <https://redis.io/docs/latest/commands/hgetall/>
#[derive(Debug, PartialEq)]
pub struct Hgetall {
    pub key: String,
}

impl Executable for Hgetall {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let pairs: Vec<Frame> = keyspace
            .read::<Hash>(&self.key)?
            .map(|hash| {
                hash.iter()
                    .flat_map(|(field, value)| {
                        [Frame::Bulk(field.clone()), Frame::Bulk(value.clone())]
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Frame::Array(pairs))
    }
}

impl TryFrom<&mut CommandParser> for Hgetall {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
