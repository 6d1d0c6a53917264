use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::{format_float, parse_float, CommandParser};
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Data;

/// Increment the string representing a floating point number stored at key by the specified
/// increment. By using a negative increment value, the result is that the value stored at the key
/// is decremented (by the obvious properties of addition). If the key does not exist, it is set to
/// 0 before performing the operation.
///
/// Ref: <https://redis.io/docs/latest/commands/incrbyfloat/>
#[derive(Debug, PartialEq)]
pub struct IncrByFloat {
    pub key: String,
    pub increment: f64,
}

impl Executable for IncrByFloat {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();

        let current = match keyspace.get_string(&self.key)? {
            Some(value) => parse_float(&value).ok_or(CommandError::NotFloat)?,
            None => 0.0,
        };

        let next = current + self.increment;
        if !next.is_finite() {
            return Err(CommandError::range("increment would produce NaN or Infinity"));
        }

        let next = Bytes::from(format_float(next));
        keyspace.set_data(&self.key, Data::String(next.clone()));

        Ok(Frame::Bulk(next))
    }
}

impl TryFrom<&mut CommandParser> for IncrByFloat {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let increment = parser.next_float()?;

        Ok(Self { key, increment })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn existing_key() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("INCRBYFLOAT")),
            Frame::Bulk(Bytes::from("key1")),
            Frame::Bulk(Bytes::from("0.1")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(
            cmd,
            Command::IncrByFloat(IncrByFloat {
                key: "key1".to_string(),
                increment: 0.1,
            })
        );

        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["SET", "key1", "10.50"]);

        assert_eq!(
            run(&store, &mut session, &["INCRBYFLOAT", "key1", "0.1"]),
            Frame::bulk("10.6")
        );
        assert_eq!(run(&store, &mut session, &["GET", "key1"]), Frame::bulk("10.6"));
    }

    #[test]
    fn integral_result() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        assert_eq!(
            run(&store, &mut session, &["INCRBYFLOAT", "key1", "5.0e3"]),
            Frame::bulk("5000")
        );
    }

    #[test]
    fn invalid_values() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["SET", "key1", "abc"]);

        assert_eq!(
            run(&store, &mut session, &["INCRBYFLOAT", "key1", "1"]),
            Frame::Error("ERR value is not a valid float".to_string())
        );
        assert_eq!(
            run(&store, &mut session, &["INCRBYFLOAT", "key2", "inf"]),
            Frame::Error("ERR increment would produce NaN or Infinity".to_string())
        );
    }
}
