use bytes::Bytes;
use glob_match::glob_match;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::DataType;

const DEFAULT_COUNT: usize = 10;

/// The SCAN command is used in order to incrementally iterate over a collection of elements.
///
/// The cursor is a position in the sorted key list, so a full iteration returns every key that
/// existed for its whole duration. MATCH and TYPE filter each page after it is taken, which means
/// a page may come back empty while the cursor is not yet 0.
///
/// Ref: <https://redis.io/docs/latest/commands/scan>
#[derive(Debug, PartialEq)]
pub struct Scan {
    pub cursor: usize,
    pub pattern: Option<String>,
    pub count: usize,
    pub data_type: Option<DataType>,
}

impl Executable for Scan {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();

        let mut keys = keyspace.keys("*");
        keys.sort_unstable();

        let end = self.cursor.saturating_add(self.count).min(keys.len());
        let page = keys.get(self.cursor..end).unwrap_or_default();
        let next_cursor = if end >= keys.len() { 0 } else { end };

        let matches = page
            .iter()
            .filter(|key| match &self.pattern {
                Some(pattern) => glob_match(pattern, key),
                None => true,
            })
            .filter(|key| match self.data_type {
                Some(data_type) => keyspace.is_type(key, data_type),
                None => true,
            })
            .map(|key| Frame::Bulk(Bytes::from(key.clone())))
            .collect();

        Ok(Frame::Array(vec![
            Frame::Bulk(Bytes::from(next_cursor.to_string())),
            Frame::Array(matches),
        ]))
    }
}

impl TryFrom<&mut CommandParser> for Scan {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let cursor = parser
            .next_string()?
            .parse::<usize>()
            .map_err(|_| CommandError::range("invalid cursor"))?;

        let mut pattern = None;
        let mut count = DEFAULT_COUNT;
        let mut data_type = None;

        while parser.has_next() {
            match parser.next_keyword()?.as_str() {
                "MATCH" => pattern = Some(parser.next_string()?),
                "COUNT" => {
                    count = usize::try_from(parser.next_integer()?)
                        .ok()
                        .filter(|count| *count > 0)
                        .ok_or(CommandError::Syntax)?;
                }
                "TYPE" => {
                    let name = parser.next_string()?.to_lowercase();
                    let parsed = name
                        .parse::<DataType>()
                        .map_err(|_| CommandError::range(format!("unknown type name '{}'", name)))?;
                    data_type = Some(parsed);
                }
                _ => return Err(CommandError::Syntax),
            }
        }

        Ok(Self {
            cursor,
            pattern,
            count,
            data_type,
        })
    }
}
