pub mod blocking;
pub mod clients;
pub mod codec;
pub mod commands;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod frame;
pub mod keyspace;
pub mod pubsub;
pub mod script;
pub mod server;
pub mod session;
pub mod store;
pub mod utils;
pub mod value;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
