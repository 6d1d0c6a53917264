use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{self, Instant};
use tracing::{debug, error, info, instrument, warn};

use crate::blocking::Blocked;
use crate::codec::FrameCodec;
use crate::config::Config;
use crate::connection::Connection;
use crate::dispatch::{dispatch, Reply};
use crate::frame::Frame;
use crate::session::Session;
use crate::store::{sweep_expired_keys, Store};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Bound but not accepting yet.
    Starting,
    Ready,
    /// The listener, every connection task and the sweeper are gone.
    Closed,
}

/// A bound listener and the store its connections share.
pub struct Server {
    listener: TcpListener,
    store: Store,
    lifecycle: watch::Sender<Lifecycle>,
}

impl Server {
    pub async fn bind(config: Config) -> Result<Server, Error> {
        let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
        let store = Store::new(config);
        let (lifecycle, _) = watch::channel(Lifecycle::Starting);

        Ok(Server {
            listener,
            store,
            lifecycle,
        })
    }

    /// Follows the server through its lifecycle.
    pub fn lifecycle(&self) -> watch::Receiver<Lifecycle> {
        self.lifecycle.subscribe()
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    pub fn store(&self) -> Store {
        self.store.clone()
    }

    /// Accepts connections until `shutdown` completes, then closes every open connection.
    pub async fn serve(self, shutdown: impl Future) -> Result<(), Error> {
        let Server {
            listener,
            store,
            lifecycle,
        } = self;
        info!("Redis server listening on {}", listener.local_addr()?);

        let sweeper = store
            .config()
            .expiry_sweep_interval()
            .map(|every| tokio::spawn(sweep_expired_keys(store.clone(), every)));

        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);
        lifecycle.send_replace(Lifecycle::Ready);

        loop {
            tokio::select! {
                res = listener.accept() => {
                    let (socket, client_address) = match res {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            error!("Failed to accept connection: {}", e);
                            continue;
                        }
                    };
                    info!("Accepted connection from {:?}", client_address);

                    let store = store.clone();
                    connections.spawn(async move {
                        if let Err(e) = handle_connection(socket, client_address, store).await {
                            error!(e);
                        }
                    });
                }
                Some(res) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = res {
                        error!("Connection task failed: {}", e);
                    }
                }
                _ = &mut shutdown => {
                    info!("Shutting down");
                    break;
                }
            }
        }

        if let Some(sweeper) = sweeper {
            sweeper.abort();
        }
        drop(listener);
        connections.shutdown().await;
        lifecycle.send_replace(Lifecycle::Closed);

        Ok(())
    }
}

/// Binds to the configured address and serves until Ctrl-C.
pub async fn run(config: Config) -> Result<(), Error> {
    let server = Server::bind(config).await?;
    server.serve(tokio::signal::ctrl_c()).await
}

#[instrument(
    name = "connection",
    skip(stream, store),
    fields(client_id, client_address = %client_address)
)]
async fn handle_connection(
    stream: TcpStream,
    client_address: SocketAddr,
    store: Store,
) -> Result<(), Error> {
    let id = store.next_client_id();
    tracing::Span::current().record("client_id", id);

    let (mut session, mut messages) = Session::new(id, Some(client_address));
    store.clients().register(&session);

    let codec = FrameCodec::new(store.config().max_bulk_len);
    let mut conn = Connection::with_codec(stream, codec);

    let res = serve_session(&store, &mut session, &mut messages, &mut conn).await;

    let (channels, patterns) = session.reset();
    store.broker().unsubscribe_all(id, &channels, &patterns);
    store.clients().remove(id);

    info!("Connection closed");
    res
}

/// Reads requests and writes their replies in order, interleaving messages published to the
/// session's channels. Returns once the peer hangs up or sends QUIT.
async fn serve_session(
    store: &Store,
    session: &mut Session,
    messages: &mut UnboundedReceiver<Frame>,
    conn: &mut Connection,
) -> Result<(), Error> {
    // Requests that arrived while a blocking command was pending.
    let mut backlog = VecDeque::new();

    loop {
        let frame = match backlog.pop_front() {
            Some(frame) => frame,
            None => tokio::select! {
                res = conn.read_frame() => match res {
                    Ok(Some(frame)) => frame,
                    Ok(None) => return Ok(()),
                    Err(e) => {
                        warn!("Protocol error: {}", e);
                        let reply = Frame::Error(format!("ERR Protocol error: {}", e));
                        let _ = conn.write_frame(reply).await;
                        return Ok(());
                    }
                },
                Some(message) = messages.recv() => {
                    conn.write_frame(message).await?;
                    continue;
                }
            },
        };

        debug!("Received frame from client: {:?}", frame);

        match dispatch(store, session, frame) {
            Reply::Frame(reply) => {
                debug!("Sending response to client: {:?}", reply);
                conn.write_frame(reply).await?;
            }
            Reply::Frames(replies) => conn.write_frames(replies).await?,
            Reply::Blocked(blocked) => match wait(store, conn, &mut backlog, blocked).await? {
                Some(reply) => conn.write_frame(reply).await?,
                None => return Ok(()),
            },
        }

        if session.is_closing() {
            return Ok(());
        }
    }
}

/// Waits for a blocked command to be served or to time out. Returns `None` when the peer hung
/// up in the meantime.
async fn wait(
    store: &Store,
    conn: &mut Connection,
    backlog: &mut VecDeque<Frame>,
    blocked: Blocked,
) -> Result<Option<Frame>, Error> {
    let Blocked { id, mut rx, timeout } = blocked;
    let deadline = timeout.map(|timeout| Instant::now() + timeout);
    debug!(waiter = id, ?timeout, "Client blocked");

    loop {
        tokio::select! {
            res = &mut rx => return Ok(Some(res.unwrap_or(Frame::Null))),
            _ = expiry(deadline) => {
                if store.blocking().cancel(id) {
                    return Ok(Some(Frame::Null));
                }
                // Served between the deadline and the cancellation: the element is already
                // ours.
                return Ok(Some(rx.await.unwrap_or(Frame::Null)));
            }
            res = conn.read_frame() => match res {
                Ok(Some(frame)) => backlog.push_back(frame),
                Ok(None) => {
                    store.blocking().cancel(id);
                    return Ok(None);
                }
                Err(e) => {
                    warn!("Protocol error: {}", e);
                    store.blocking().cancel(id);
                    let reply = Frame::Error(format!("ERR Protocol error: {}", e));
                    let _ = conn.write_frame(reply).await;
                    return Ok(None);
                }
            },
        }
    }
}

async fn expiry(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use tokio::time::Duration;

    use super::*;

    fn request(args: &[&str]) -> Frame {
        Frame::Array(
            args.iter()
                .map(|arg| Frame::Bulk(Bytes::copy_from_slice(arg.as_bytes())))
                .collect(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_waits_for_the_deadline() {
        let start = Instant::now();

        expiry(Some(start + Duration::from_secs(5))).await;

        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn claimed_element_survives_cancellation() {
        let store = Store::default();
        let (mut waiting, _rx) = Session::new(1, None);
        let (mut pushing, _rx) = Session::new(2, None);

        let Reply::Blocked(blocked) = dispatch(&store, &mut waiting, request(&["BLPOP", "queue", "1"]))
        else {
            panic!("expected BLPOP to block");
        };
        assert_eq!(blocked.timeout, Some(Duration::from_secs(1)));

        dispatch(&store, &mut pushing, request(&["RPUSH", "queue", "job"]));

        assert!(!store.blocking().cancel(blocked.id));
        assert_eq!(
            blocked.rx.await.unwrap(),
            Frame::Array(vec![Frame::bulk("queue"), Frame::bulk("job")])
        );
    }
}
