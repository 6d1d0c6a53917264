use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use crate::codec::FrameCodec;
use crate::frame::Frame;
use crate::Error;

/// A framed TCP stream. Data read from the socket is buffered by the codec until a whole frame
/// can be parsed, so `read_frame` is safe to use inside `tokio::select!`.
pub struct Connection {
    framed: Framed<TcpStream, FrameCodec>,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Connection {
        Connection::with_codec(stream, FrameCodec::default())
    }

    pub fn with_codec(stream: TcpStream, codec: FrameCodec) -> Connection {
        Connection {
            framed: Framed::new(stream, codec),
        }
    }

    /// Returns the next frame, or `None` once the peer closed the connection.
    pub async fn read_frame(&mut self) -> Result<Option<Frame>, Error> {
        self.framed.next().await.transpose()
    }

    pub async fn write_frame(&mut self, frame: Frame) -> Result<(), Error> {
        self.framed.send(frame).await
    }

    /// Writes several frames and flushes once.
    pub async fn write_frames(&mut self, frames: Vec<Frame>) -> Result<(), Error> {
        for frame in frames {
            self.framed.feed(frame).await?;
        }
        self.framed.flush().await
    }
}
