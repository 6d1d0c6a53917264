use bytes::{Buf, BufMut, BytesMut};
use std::io::Cursor;
use tokio_util::codec::{Decoder, Encoder};

use crate::frame::{self, Frame, DEFAULT_MAX_BULK_LEN};
use crate::Error;

pub struct FrameCodec {
    max_bulk_len: usize,
}

impl FrameCodec {
    pub fn new(max_bulk_len: usize) -> FrameCodec {
        FrameCodec { max_bulk_len }
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BULK_LEN)
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let mut cursor = Cursor::new(&src[..]);
        let frame = match Frame::parse(&mut cursor, self.max_bulk_len) {
            Ok(frame) => frame,
            Err(frame::Error::Incomplete) => return Ok(None), // Not enough data to parse a frame.
            Err(err) => return Err(err.into()),
        };

        let position = cursor.position() as usize;

        // Remove the parsed frame from the buffer.
        src.advance(position);

        Ok(Some(frame))
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = Error;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.put_slice(&frame.serialize());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[test]
    fn decode_waits_for_complete_frame() {
        let mut codec = FrameCodec::default();
        let mut buf = BytesMut::from(&b"*2\r\n$4\r\nECHO\r\n$2\r\nh"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert_eq!(buf.len(), 19);

        buf.extend_from_slice(b"i\r\n+OK\r\n");

        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Frame::Array(vec![
                Frame::Bulk(Bytes::from("ECHO")),
                Frame::Bulk(Bytes::from("hi")),
            ]))
        );
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Frame::Simple("OK".to_string()))
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_rejects_malformed_length() {
        let mut codec = FrameCodec::default();
        let mut buf = BytesMut::from(&b"*x\r\n"[..]);

        assert!(codec.decode(&mut buf).is_err());
    }

    #[test]
    fn encode_appends_serialized_frame() {
        let mut codec = FrameCodec::default();
        let mut buf = BytesMut::new();

        codec.encode(Frame::Integer(3), &mut buf).unwrap();
        codec.encode(Frame::Null, &mut buf).unwrap();

        assert_eq!(&buf[..], b":3\r\n$-1\r\n");
    }
}
