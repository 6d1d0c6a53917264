use std::net::SocketAddr;

use futures::StreamExt;
use redis::aio::MultiplexedConnection;
use redis::RedisError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, Duration, Instant};

use memdis::config::Config;
use memdis::server::{Lifecycle, Server};

/// Starts a server on a free port. It runs until the test's runtime goes away.
async fn start() -> SocketAddr {
    let config = Config {
        port: 0,
        ..Config::default()
    };
    let server = Server::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();

    tokio::spawn(server.serve(std::future::pending::<()>()));

    addr
}

async fn connect(addr: SocketAddr) -> Result<MultiplexedConnection, RedisError> {
    connect_db(addr, 0).await
}

async fn connect_db(addr: SocketAddr, db: usize) -> Result<MultiplexedConnection, RedisError> {
    let client = redis::Client::open(format!("redis://{}/{}", addr, db))?;
    client.get_multiplexed_async_connection().await
}

/// Sends raw bytes and returns whatever the server answers with before `wait` elapses.
async fn raw(addr: SocketAddr, request: &[u8], wait: Duration) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut received = vec![];
    let _ = tokio::time::timeout(wait, stream.read_to_end(&mut received)).await;
    received
}

#[tokio::test]
async fn test_set_with_expiration() {
    let addr = start().await;
    let mut conn = connect(addr).await.unwrap();

    let (set, get, ttl): (String, Option<String>, i64) = redis::pipe()
        .cmd("SET").arg("session").arg("token").arg("EX").arg(1)
        .cmd("GET").arg("session")
        .cmd("TTL").arg("session")
        .query_async(&mut conn)
        .await
        .unwrap();

    assert_eq!(set, "OK");
    assert_eq!(get.as_deref(), Some("token"));
    assert_eq!(ttl, 1);

    sleep(Duration::from_millis(1100)).await;

    let get: Option<String> = redis::cmd("GET").arg("session").query_async(&mut conn).await.unwrap();
    assert_eq!(get, None);
}

#[tokio::test]
async fn test_sinter() {
    let addr = start().await;
    let mut conn = connect(addr).await.unwrap();

    let (_, _, mut common): (i64, i64, Vec<String>) = redis::pipe()
        .cmd("SADD").arg("a").arg(&["1", "2", "3"])
        .cmd("SADD").arg("b").arg(&["2", "3", "4"])
        .cmd("SINTER").arg("a").arg("b")
        .query_async(&mut conn)
        .await
        .unwrap();
    common.sort();

    assert_eq!(common, vec!["2", "3"]);
}

#[tokio::test]
async fn test_multi_exec() {
    let addr = start().await;
    let mut conn = connect(addr).await.unwrap();

    let (len,): (i64,) = redis::pipe()
        .atomic()
        .cmd("LPUSH").arg("list").arg(&["a", "b", "c"])
        .query_async(&mut conn)
        .await
        .unwrap();
    assert_eq!(len, 3);

    let items: Vec<String> = redis::cmd("LRANGE")
        .arg("list")
        .arg(0)
        .arg(-1)
        .query_async(&mut conn)
        .await
        .unwrap();
    assert_eq!(items, vec!["c", "b", "a"]);
}

#[tokio::test]
async fn test_exec_aborts_after_queueing_error() {
    let addr = start().await;
    let mut conn = connect(addr).await.unwrap();

    let res: Result<(i64,), RedisError> = redis::pipe()
        .atomic()
        .cmd("INCR").arg("counter")
        .cmd("NOSUCHCOMMAND")
        .query_async(&mut conn)
        .await;
    assert!(res.is_err());

    let counter: Option<i64> = redis::cmd("GET").arg("counter").query_async(&mut conn).await.unwrap();
    assert_eq!(counter, None);
}

#[tokio::test]
async fn test_exec_is_not_interleaved() {
    let addr = start().await;
    let mut conn = connect(addr).await.unwrap();
    let mut other = connect(addr).await.unwrap();

    let writer = tokio::spawn(async move {
        for _ in 0..200 {
            let _: i64 = redis::cmd("INCR").arg("counter").query_async(&mut other).await.unwrap();
        }
    });

    for _ in 0..20 {
        let mut pipe = redis::pipe();
        pipe.atomic();
        for _ in 0..50 {
            pipe.cmd("INCR").arg("counter");
        }
        let counts: Vec<i64> = pipe.query_async(&mut conn).await.unwrap();

        assert_eq!(counts.len(), 50);
        for (offset, count) in counts.iter().enumerate() {
            assert_eq!(*count, counts[0] + offset as i64);
        }
    }

    writer.await.unwrap();
    let total: i64 = redis::cmd("GET").arg("counter").query_async(&mut conn).await.unwrap();
    assert_eq!(total, 200 + 20 * 50);
}

#[tokio::test]
async fn test_blpop_woken_by_push() {
    let addr = start().await;
    let mut waiting = connect(addr).await.unwrap();
    let mut pushing = connect(addr).await.unwrap();

    let blocked = tokio::spawn(async move {
        let popped: Option<(String, String)> = redis::cmd("BLPOP")
            .arg("jobs")
            .arg(0)
            .query_async(&mut waiting)
            .await
            .unwrap();
        popped
    });

    sleep(Duration::from_millis(100)).await;

    let len: i64 = redis::cmd("RPUSH").arg("jobs").arg("job-1").query_async(&mut pushing).await.unwrap();
    assert_eq!(len, 1);

    assert_eq!(
        blocked.await.unwrap(),
        Some(("jobs".to_string(), "job-1".to_string()))
    );

    let len: i64 = redis::cmd("LLEN").arg("jobs").query_async(&mut pushing).await.unwrap();
    assert_eq!(len, 0);
}

#[tokio::test]
async fn test_blpop_times_out() {
    let addr = start().await;
    let mut conn = connect(addr).await.unwrap();

    let started = Instant::now();
    let popped: Option<(String, String)> = redis::cmd("BLPOP")
        .arg("empty")
        .arg(0.2)
        .query_async(&mut conn)
        .await
        .unwrap();

    assert_eq!(popped, None);
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_zrange_with_scores() {
    let addr = start().await;
    let mut conn = connect(addr).await.unwrap();

    let (added, range): (i64, Vec<String>) = redis::pipe()
        .cmd("ZADD").arg("board").arg(&["2", "bob", "1", "alice", "3.5", "carol"])
        .cmd("ZRANGE").arg("board").arg(0).arg(-1).arg("WITHSCORES")
        .query_async(&mut conn)
        .await
        .unwrap();

    assert_eq!(added, 3);
    assert_eq!(range, vec!["alice", "1", "bob", "2", "carol", "3.5"]);
}

#[tokio::test]
async fn test_publish_subscribe() {
    let addr = start().await;
    let client = redis::Client::open(format!("redis://{}/", addr)).unwrap();
    let mut pubsub = client.get_async_pubsub().await.unwrap();
    pubsub.subscribe("news").await.unwrap();

    let mut conn = connect(addr).await.unwrap();
    let receivers: i64 = redis::cmd("PUBLISH")
        .arg("news")
        .arg("hello")
        .query_async(&mut conn)
        .await
        .unwrap();
    assert_eq!(receivers, 1);

    let message = pubsub.on_message().next().await.unwrap();
    assert_eq!(message.get_channel_name(), "news");
    assert_eq!(message.get_payload::<String>().unwrap(), "hello");
}

#[tokio::test]
async fn test_databases_are_isolated() {
    let addr = start().await;
    let mut first = connect(addr).await.unwrap();
    let mut third = connect_db(addr, 2).await.unwrap();

    let _: () = redis::cmd("SET").arg("key").arg("in-two").query_async(&mut third).await.unwrap();

    let missing: Option<String> = redis::cmd("GET").arg("key").query_async(&mut first).await.unwrap();
    assert_eq!(missing, None);

    let size: i64 = redis::cmd("DBSIZE").query_async(&mut third).await.unwrap();
    assert_eq!(size, 1);
}

#[tokio::test]
async fn test_wrong_type() {
    let addr = start().await;
    let mut conn = connect(addr).await.unwrap();

    let _: () = redis::cmd("SET").arg("name").arg("v").query_async(&mut conn).await.unwrap();
    let err = redis::cmd("LPUSH")
        .arg("name")
        .arg("a")
        .query_async::<_, i64>(&mut conn)
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some("WRONGTYPE"));
}

#[tokio::test]
async fn test_inline_ping() {
    let addr = start().await;

    let reply = raw(addr, b"PING\r\nQUIT\r\n", Duration::from_secs(1)).await;

    assert_eq!(reply, b"+PONG\r\n+OK\r\n".to_vec());
}

#[tokio::test]
async fn test_protocol_error_closes_connection() {
    let addr = start().await;

    let reply = raw(addr, b"*1\r\n$x\r\n", Duration::from_secs(1)).await;

    assert!(String::from_utf8(reply).unwrap().starts_with("-ERR Protocol error"));
}

#[tokio::test]
async fn test_protocol_error_while_blocked_releases_waiter() {
    let config = Config {
        port: 0,
        ..Config::default()
    };
    let server = Server::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    let store = server.store();
    tokio::spawn(server.serve(std::future::pending::<()>()));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"*3\r\n$5\r\nBLPOP\r\n$1\r\nq\r\n$1\r\n0\r\n")
        .await
        .unwrap();
    while store.blocking().len() == 0 {
        sleep(Duration::from_millis(10)).await;
    }

    stream.write_all(b"*x\r\n").await.unwrap();
    let mut received = vec![];
    let _ = tokio::time::timeout(Duration::from_secs(1), stream.read_to_end(&mut received)).await;
    assert!(String::from_utf8(received).unwrap().starts_with("-ERR Protocol error"));
    drop(stream);

    let deadline = Instant::now() + Duration::from_secs(1);
    while store.blocking().len() != 0 && Instant::now() < deadline {
        sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(store.blocking().len(), 0);
}

#[tokio::test]
async fn test_lifecycle() {
    let config = Config {
        port: 0,
        ..Config::default()
    };
    let server = Server::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    let mut lifecycle = server.lifecycle();
    assert_eq!(*lifecycle.borrow(), Lifecycle::Starting);

    let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
    let serving = tokio::spawn(server.serve(stopped));

    lifecycle.wait_for(|state| *state == Lifecycle::Ready).await.unwrap();
    let mut conn = connect(addr).await.unwrap();
    let pong: String = redis::cmd("PING").query_async(&mut conn).await.unwrap();
    assert_eq!(pong, "PONG");

    stop.send(()).unwrap();
    serving.await.unwrap().unwrap();
    assert_eq!(*lifecycle.borrow(), Lifecycle::Closed);
    assert!(TcpStream::connect(addr).await.is_err());
}
