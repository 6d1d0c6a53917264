// https://redis.io/docs/reference/protocol-spec

use std::fmt;

use bytes::Buf;
use bytes::Bytes;
use std::io::Cursor;
use std::string::FromUtf8Error;
use thiserror::Error as ThisError;

static CRLF: &[u8; 2] = b"\r\n";

/// Largest bulk string accepted by default (512MB, same as Redis' `proto-max-bulk-len`).
pub const DEFAULT_MAX_BULK_LEN: usize = 512 * 1024 * 1024;

#[derive(Debug, ThisError, PartialEq)]
pub enum Error {
    #[error("not enough data is available to parse an entire frame")]
    Incomplete,
    /// Invalid message encoding.
    #[error("{0}")]
    Protocol(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    Null,
    Array(Vec<Frame>),
    /// A line that does not start with a known type prefix. Legacy clients (and telnet) send
    /// commands this way, so the line is kept split on whitespace.
    Unknown(Vec<Bytes>),
}

// Protocol specification: https://redis.io/docs/reference/protocol-spec/
impl Frame {
    pub fn parse(src: &mut Cursor<&[u8]>, max_bulk_len: usize) -> Result<Self, Error> {
        // The first byte in an RESP-serialized payload always identifies its type.
        // Subsequent bytes constitute the type's contents.
        let first_byte = peek_byte(src)?;

        let data_type = match DataType::try_from(first_byte) {
            Ok(data_type) => data_type,
            Err(_) => {
                let line = get_line(src)?;
                let parts = line
                    .split(|b| b.is_ascii_whitespace())
                    .filter(|part| !part.is_empty())
                    .map(Bytes::copy_from_slice)
                    .collect();
                return Ok(Frame::Unknown(parts));
            }
        };
        src.advance(1);

        match data_type {
            DataType::SimpleString => {
                let string = String::from_utf8(get_line(src)?.to_vec())?;
                Ok(Frame::Simple(string))
            }
            DataType::SimpleError => {
                let string = String::from_utf8(get_line(src)?.to_vec())?;
                Ok(Frame::Error(string))
            }
            DataType::Integer => {
                let integer = get_decimal(src)?;
                Ok(Frame::Integer(integer))
            }
            // $<length>\r\n<data>\r\n
            DataType::BulkString => {
                let length = get_decimal(src)?;

                if length == -1 {
                    return Ok(Frame::Null);
                }

                // Malformed but harmless lengths degrade to an empty string instead of tearing
                // down the connection.
                if length < 0 || length as u64 > max_bulk_len as u64 {
                    return Ok(Frame::Bulk(Bytes::new()));
                }

                let length = length as usize;
                let start = src.position() as usize;
                let end = start + length;

                if src.get_ref().len() < end + CRLF.len() {
                    return Err(Error::Incomplete);
                }

                if &src.get_ref()[end..end + CRLF.len()] != CRLF {
                    return Err("protocol error; bulk string is not terminated by CRLF".into());
                }

                let data = Bytes::copy_from_slice(&src.get_ref()[start..end]);
                src.set_position((end + CRLF.len()) as u64);

                Ok(Frame::Bulk(data))
            }
            // *<number-of-elements>\r\n<element-1>...<element-n>
            DataType::Array => {
                let length = get_decimal(src)?;

                if length < 0 {
                    return Ok(Frame::Null);
                }

                let mut frames = Vec::with_capacity((length as usize).min(1024));
                for _ in 0..length {
                    let frame = Self::parse(src, max_bulk_len)?;
                    frames.push(frame);
                }

                Ok(Frame::Array(frames))
            }
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes);
        bytes
    }

    fn write_to(&self, bytes: &mut Vec<u8>) {
        match self {
            Frame::Simple(s) => {
                bytes.push(u8::from(DataType::SimpleString));
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(CRLF);
            }
            Frame::Error(s) => {
                bytes.push(u8::from(DataType::SimpleError));
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(CRLF);
            }
            Frame::Integer(i) => {
                bytes.push(u8::from(DataType::Integer));
                bytes.extend_from_slice(i.to_string().as_bytes());
                bytes.extend_from_slice(CRLF);
            }
            Frame::Bulk(data) => {
                bytes.push(u8::from(DataType::BulkString));
                bytes.extend_from_slice(data.len().to_string().as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes.extend_from_slice(data);
                bytes.extend_from_slice(CRLF);
            }
            Frame::Null => {
                bytes.push(u8::from(DataType::BulkString));
                bytes.extend_from_slice(b"-1");
                bytes.extend_from_slice(CRLF);
            }
            Frame::Array(arr) => {
                bytes.push(u8::from(DataType::Array));
                bytes.extend_from_slice(arr.len().to_string().as_bytes());
                bytes.extend_from_slice(CRLF);
                for frame in arr {
                    frame.write_to(bytes);
                }
            }
            Frame::Unknown(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        bytes.push(b' ');
                    }
                    bytes.extend_from_slice(part);
                }
                bytes.extend_from_slice(CRLF);
            }
        }
    }

    pub fn ok() -> Frame {
        Frame::Simple("OK".to_string())
    }

    pub fn bulk(data: impl Into<Bytes>) -> Frame {
        Frame::Bulk(data.into())
    }
}

impl From<Frame> for Vec<u8> {
    fn from(frame: Frame) -> Self {
        frame.serialize()
    }
}

impl From<Option<Bytes>> for Frame {
    fn from(value: Option<Bytes>) -> Self {
        value.map_or(Frame::Null, Frame::Bulk)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "+{}", s),
            Frame::Error(s) => write!(f, "-{}", s),
            Frame::Integer(i) => write!(f, ":{}", i),
            Frame::Bulk(bytes) => write!(f, "${}", String::from_utf8_lossy(bytes)),
            Frame::Null => write!(f, "$-1"),
            Frame::Array(arr) => {
                write!(f, "*{}[", arr.len())?;
                for (i, frame) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", frame)?;
                }
                write!(f, "]")
            }
            Frame::Unknown(parts) => {
                let parts: Vec<_> = parts.iter().map(|p| String::from_utf8_lossy(p)).collect();
                write!(f, "{}", parts.join(" "))
            }
        }
    }
}

/// Returns the bytes up to the next CRLF and moves the cursor past it.
fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let buf: &'a [u8] = *src.get_ref();

    let line_end = buf[start..]
        .windows(2)
        .position(|window| window == CRLF)
        .map(|index| start + index)
        .ok_or(Error::Incomplete)?;

    src.set_position((line_end + CRLF.len()) as u64);

    Ok(&buf[start..line_end])
}

fn get_decimal(src: &mut Cursor<&[u8]>) -> Result<i64, Error> {
    let line = get_line(src)?;
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| {
            format!(
                "protocol error; invalid length or integer {:?}",
                String::from_utf8_lossy(line)
            )
            .into()
        })
}

fn peek_byte(src: &Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }
    Ok(src.chunk()[0])
}

#[derive(Debug)]
enum DataType {
    SimpleString, // '+'
    SimpleError,  // '-'
    Integer,      // ':'
    BulkString,   // '$'
    Array,        // '*'
}

impl TryFrom<u8> for DataType {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            b'+' => Ok(Self::SimpleString),
            b'-' => Ok(Self::SimpleError),
            b':' => Ok(Self::Integer),
            b'$' => Ok(Self::BulkString),
            b'*' => Ok(Self::Array),
            _ => Err(format!("invalid frame data type: {}", byte).into()),
        }
    }
}

impl From<DataType> for u8 {
    fn from(value: DataType) -> Self {
        match value {
            DataType::SimpleString => b'+',
            DataType::SimpleError => b'-',
            DataType::Integer => b':',
            DataType::BulkString => b'$',
            DataType::Array => b'*',
        }
    }
}

impl From<FromUtf8Error> for Error {
    fn from(_src: FromUtf8Error) -> Error {
        "protocol error; invalid frame format".into()
    }
}

impl From<&str> for Error {
    fn from(src: &str) -> Error {
        src.to_string().into()
    }
}

impl From<String> for Error {
    fn from(src: String) -> Error {
        Error::Protocol(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(data: &[u8]) -> Result<Frame, Error> {
        let mut cursor = Cursor::new(data);
        Frame::parse(&mut cursor, DEFAULT_MAX_BULK_LEN)
    }

    #[test]
    fn parse_simple_string_frame() {
        let frame = parse(b"+OK\r\n");

        assert!(matches!(frame, Ok(Frame::Simple(ref s)) if s == "OK"));
    }

    #[test]
    fn parse_simple_error_frame() {
        let frame = parse(b"-Error message\r\n");

        assert!(matches!(
            frame,
            Ok(Frame::Error(ref s)) if s == "Error message"
        ));
    }

    fn parse_integer_frame(data: &[u8], expected: i64) {
        let frame = parse(data);

        assert!(matches!(frame, Ok(Frame::Integer(i)) if i == expected));
    }

    #[test]
    fn parse_integer_frame_positive() {
        parse_integer_frame(b":1000\r\n", 1000);
    }

    #[test]
    fn parse_integer_frame_negative() {
        parse_integer_frame(b":-1000\r\n", -1000);
    }

    #[test]
    fn parse_integer_frame_zero() {
        parse_integer_frame(b":0\r\n", 0);
    }

    #[test]
    fn parse_integer_frame_positive_singned() {
        parse_integer_frame(b":+1000\r\n", 1000);
    }

    #[test]
    fn parse_integer_frame_garbage() {
        let frame = parse(b":12abc\r\n");

        assert!(matches!(frame, Err(Error::Protocol(_))));
    }

    #[test]
    fn parse_bulk_string_frame() {
        let frame = parse(b"$6\r\nfoobar\r\n");

        assert_eq!(frame, Ok(Frame::Bulk(Bytes::from("foobar"))));
    }

    #[test]
    fn parse_bulk_string_frame_binary_safe() {
        let frame = parse(b"$4\r\na\r\nb\r\n");

        assert_eq!(frame, Ok(Frame::Bulk(Bytes::from("a\r\nb"))));
    }

    #[test]
    fn parse_bulk_string_frame_empty() {
        let frame = parse(b"$0\r\n\r\n");

        assert_eq!(frame, Ok(Frame::Bulk(Bytes::new())));
    }

    #[test]
    fn parse_bulk_string_frame_null() {
        let frame = parse(b"$-1\r\n");

        assert_eq!(frame, Ok(Frame::Null));
    }

    #[test]
    fn parse_bulk_string_frame_negative_length() {
        let frame = parse(b"$-7\r\n");

        assert_eq!(frame, Ok(Frame::Bulk(Bytes::new())));
    }

    #[test]
    fn parse_bulk_string_frame_over_limit() {
        let mut cursor = Cursor::new(&b"$10\r\n0123456789\r\n"[..]);

        let frame = Frame::parse(&mut cursor, 4);

        assert_eq!(frame, Ok(Frame::Bulk(Bytes::new())));
    }

    #[test]
    fn parse_bulk_string_frame_incomplete() {
        assert_eq!(parse(b"$6\r\nfoo"), Err(Error::Incomplete));
        assert_eq!(parse(b"$6\r\nfoobar"), Err(Error::Incomplete));
        assert_eq!(parse(b"$6"), Err(Error::Incomplete));
    }

    #[test]
    fn parse_array_frame_empty() {
        let frame = parse(b"*0\r\n");

        assert!(matches!(frame, Ok(Frame::Array(ref a)) if a.is_empty()));
    }

    #[test]
    fn parse_array_frame() {
        let frame = parse(b"*2\r\n$5\r\nhello\r\n$5\r\nworld\r\n");

        assert_eq!(
            frame,
            Ok(Frame::Array(vec![
                Frame::Bulk(Bytes::from("hello")),
                Frame::Bulk(Bytes::from("world")),
            ]))
        );
    }

    #[test]
    fn parse_array_frame_nested() {
        let frame = parse(b"*2\r\n*3\r\n:1\r\n:2\r\n:3\r\n*2\r\n+Hello\r\n-World\r\n");

        assert_eq!(
            frame,
            Ok(Frame::Array(vec![
                Frame::Array(vec![
                    Frame::Integer(1),
                    Frame::Integer(2),
                    Frame::Integer(3)
                ]),
                Frame::Array(vec![
                    Frame::Simple("Hello".to_string()),
                    Frame::Error("World".to_string())
                ]),
            ]))
        );
    }

    #[test]
    fn parse_array_frame_null() {
        let frame = parse(b"*-1\r\n");

        assert_eq!(frame, Ok(Frame::Null));
    }

    #[test]
    fn parse_array_frame_null_in_the_middle() {
        let frame = parse(b"*3\r\n$5\r\nhello\r\n$-1\r\n$5\r\nworld\r\n");

        assert_eq!(
            frame,
            Ok(Frame::Array(vec![
                Frame::Bulk(Bytes::from("hello")),
                Frame::Null,
                Frame::Bulk(Bytes::from("world")),
            ]))
        );
    }

    #[test]
    fn parse_array_frame_incomplete() {
        let frame = parse(b"*2\r\n$5\r\nhello\r\n");

        assert_eq!(frame, Err(Error::Incomplete));
    }

    #[test]
    fn parse_inline_command() {
        let frame = parse(b"SET  foo   bar\r\n");

        assert_eq!(
            frame,
            Ok(Frame::Unknown(vec![
                Bytes::from("SET"),
                Bytes::from("foo"),
                Bytes::from("bar"),
            ]))
        );
    }

    #[test]
    fn serialize_null_and_empty_bulk() {
        assert_eq!(Frame::Null.serialize(), b"$-1\r\n");
        assert_eq!(Frame::Bulk(Bytes::new()).serialize(), b"$0\r\n\r\n");
    }

    #[test]
    fn serialize_nested_array() {
        let frame = Frame::Array(vec![
            Frame::Integer(7),
            Frame::Array(vec![Frame::Simple("OK".to_string()), Frame::Null]),
        ]);

        assert_eq!(frame.serialize(), b"*2\r\n:7\r\n*2\r\n+OK\r\n$-1\r\n");
    }

    #[test]
    fn serialized_frames_parse_back() {
        let frames = vec![
            Frame::Simple("PONG".to_string()),
            Frame::Error("ERR boom".to_string()),
            Frame::Integer(-42),
            Frame::Bulk(Bytes::from("binary\r\nvalue")),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("a")),
                Frame::Array(vec![Frame::Integer(1), Frame::Bulk(Bytes::new())]),
            ]),
            Frame::Unknown(vec![Bytes::from("PING"), Bytes::from("hello")]),
        ];

        for frame in frames {
            let bytes = frame.serialize();
            assert_eq!(parse(&bytes), Ok(frame));
        }
    }
}
