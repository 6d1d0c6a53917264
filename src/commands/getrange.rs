use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Returns the substring of the string value stored at key, determined by the offsets start and
/// end (both are inclusive). Negative offsets can be used in order to provide an offset starting
/// from the end of the string. So -1 means the last character, -2 the penultimate and so forth.
/// The function handles out of range requests by limiting the resulting range to the actual length
/// of the string.
///
/// Offsets are in bytes.
///
/// Ref: <https://redis.io/docs/latest/commands/getrange/>
#[derive(Debug, PartialEq)]
pub struct Getrange {
    pub key: String,
    pub start: i64,
    pub end: i64,
}

impl Executable for Getrange {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let value = ctx.keyspace().get_string(&self.key)?.unwrap_or_default();

        let range = substring_bounds(self.start, self.end, value.len());
        let substring = match range {
            Some((start, end)) => value.slice(start..=end),
            None => Bytes::new(),
        };

        Ok(Frame::Bulk(substring))
    }
}

/// Clamps both offsets into the string, the way GETRANGE does: an end before the start of the
/// string clamps to the first byte rather than producing an empty range.
fn substring_bounds(start: i64, end: i64, len: usize) -> Option<(usize, usize)> {
    let len = len as i64;
    if len == 0 {
        return None;
    }

    let start = if start < 0 { len + start } else { start }.max(0);
    let end = if end < 0 { len + end } else { end }.clamp(0, len - 1);

    (start <= end).then_some((start as usize, end as usize))
}

impl TryFrom<&mut CommandParser> for Getrange {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let start = parser.next_integer()?;
        let end = parser.next_integer()?;

        Ok(Self { key, start, end })
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
    fn parse() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("GETRANGE")),
            Frame::Bulk(Bytes::from("key1")),
            Frame::Bulk(Bytes::from("0")),
            Frame::Bulk(Bytes::from("-1")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(
            cmd,
            Command::Getrange(Getrange {
                key: String::from("key1"),
                start: 0,
                end: -1,
            })
        );
    }

    #[test]
    fn ranges() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["SET", "mykey", "This is a string"]);

        for (start, end, expected) in [
            ("0", "3", "This"),
            ("-3", "-1", "ing"),
            ("0", "-1", "This is a string"),
            ("10", "100", "string"),
            ("5", "3", ""),
            ("0", "-100", "T"),
        ] {
            assert_eq!(
                run(&store, &mut session, &["GETRANGE", "mykey", start, end]),
                Frame::bulk(expected)
            );
        }

        assert_eq!(
            run(&store, &mut session, &["GETRANGE", "nope", "0", "-1"]),
            Frame::bulk("")
        );
    }
}
