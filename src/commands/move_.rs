use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::DataType;

/// Moves `key` from the selected database to database `db`. Nothing happens when the key is
/// missing or already exists in the destination.
///
/// Ref: <https://redis.io/docs/latest/commands/move/>
#[derive(Debug, PartialEq)]
pub struct Move {
    pub key: String,
    pub db: i64,
}

impl Executable for Move {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let source = ctx.session.db();
        let destination = usize::try_from(self.db)
            .ok()
            .filter(|db| *db < ctx.store.databases())
            .ok_or_else(|| CommandError::range("DB index is out of range"))?;

        if source == destination {
            return Err(CommandError::SameObject);
        }

        let (mut from, mut to) = ctx.store.lock_pair(source, destination);

        if !from.exists(&self.key) || to.exists(&self.key) {
            return Ok(Frame::Integer(0));
        }

        let Some(value) = from.take(&self.key) else {
            return Ok(Frame::Integer(0));
        };
        let is_list = value.data_type() == DataType::List;
        to.put(self.key.clone(), value);

        if is_list {
            ctx.store.blocking().serve(destination, &mut to, &self.key);
        }

        Ok(Frame::Integer(1))
    }
}

impl TryFrom<&mut CommandParser> for Move {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let db = parser.next_integer()?;

        Ok(Self { key, db })
    }
}
