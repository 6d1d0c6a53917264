use bytes::Bytes;
use std::{str, vec};
use thiserror::Error as ThisError;

/// Walks the arguments of a request (everything after the command name).
pub struct CommandParser {
    parts: vec::IntoIter<Bytes>,
}

impl CommandParser {
    pub fn new(args: Vec<Bytes>) -> CommandParser {
        CommandParser {
            parts: args.into_iter(),
        }
    }

    pub fn next_bytes(&mut self) -> Result<Bytes, CommandParserError> {
        self.parts.next().ok_or(CommandParserError::EndOfStream)
    }

    pub fn next_string(&mut self) -> Result<String, CommandParserError> {
        let bytes = self.next_bytes()?;
        str::from_utf8(&bytes[..])
            .map(|s| s.to_string())
            .map_err(CommandParserError::InvalidUTF8String)
    }

    pub fn next_integer(&mut self) -> Result<i64, CommandParserError> {
        let bytes = self.next_bytes()?;
        parse_integer(&bytes).ok_or(CommandParserError::InvalidInteger)
    }

    pub fn next_float(&mut self) -> Result<f64, CommandParserError> {
        let bytes = self.next_bytes()?;
        parse_float(&bytes).ok_or(CommandParserError::InvalidFloat)
    }

    /// The next argument, upper-cased, for matching option keywords such as `NX` or `WITHSCORES`.
    pub fn next_keyword(&mut self) -> Result<String, CommandParserError> {
        self.next_string().map(|s| s.to_uppercase())
    }

    pub fn has_next(&self) -> bool {
        self.parts.len() > 0
    }

    pub fn remaining(&self) -> usize {
        self.parts.len()
    }

    pub fn rest_bytes(&mut self) -> Vec<Bytes> {
        self.parts.by_ref().collect()
    }

    pub fn rest_strings(&mut self) -> Result<Vec<String>, CommandParserError> {
        let mut strings = Vec::with_capacity(self.parts.len());
        while self.has_next() {
            strings.push(self.next_string()?);
        }
        Ok(strings)
    }
}

pub fn parse_integer(bytes: &[u8]) -> Option<i64> {
    str::from_utf8(bytes).ok()?.parse::<i64>().ok()
}

/// Parses a float the way Redis does: `inf`, `+inf` and `-inf` are accepted, NaN is not.
pub fn parse_float(bytes: &[u8]) -> Option<f64> {
    let s = str::from_utf8(bytes).ok()?;
    let value = match s.to_lowercase().as_str() {
        "inf" | "+inf" | "infinity" | "+infinity" => f64::INFINITY,
        "-inf" | "-infinity" => f64::NEG_INFINITY,
        other => other.parse::<f64>().ok()?,
    };
    if value.is_nan() {
        return None;
    }
    Some(value)
}

/// Formats a float the way Redis replies with scores: integral values without a fractional
/// part, infinities as `inf`/`-inf`.
pub fn format_float(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e17 {
        return format!("{}", value as i64);
    }
    format!("{}", value)
}

#[derive(Debug, ThisError, PartialEq)]
pub enum CommandParserError {
    #[error("protocol error; invalid command argument {command} {argument}")]
    InvalidCommandArgument { command: String, argument: String },
    #[error("protocol error; invalid UTF-8 string")]
    InvalidUTF8String(#[from] str::Utf8Error),
    #[error("value is not an integer or out of range")]
    InvalidInteger,
    #[error("value is not a valid float")]
    InvalidFloat,
    #[error("protocol error; attempting to extract a value failed due to the frame being fully consumed")]
    EndOfStream,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(args: &[&'static str]) -> CommandParser {
        CommandParser::new(args.iter().map(|a| Bytes::from(*a)).collect())
    }

    #[test]
    fn walks_arguments() {
        let mut parser = parser(&["key", "10", "1.5", "nx"]);

        assert_eq!(parser.next_string(), Ok("key".to_string()));
        assert_eq!(parser.next_integer(), Ok(10));
        assert_eq!(parser.next_float(), Ok(1.5));
        assert_eq!(parser.next_keyword(), Ok("NX".to_string()));
        assert!(!parser.has_next());
        assert_eq!(parser.next_bytes(), Err(CommandParserError::EndOfStream));
    }

    #[test]
    fn rejects_invalid_numbers() {
        let mut parser = parser(&["ten", "nan"]);

        assert_eq!(parser.next_integer(), Err(CommandParserError::InvalidInteger));
        assert_eq!(parser.next_float(), Err(CommandParserError::InvalidFloat));
    }

    #[test]
    fn floats() {
        assert_eq!(parse_float(b"-inf"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_float(b"+inf"), Some(f64::INFINITY));
        assert_eq!(format_float(1.0), "1");
        assert_eq!(format_float(-2.5), "-2.5");
        assert_eq!(format_float(f64::INFINITY), "inf");
    }
}
