use bytes::Bytes;
use std::collections::HashMap;
use std::str;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::commands::executable::Context;
use crate::commands::CommandError;
use crate::dispatch;
use crate::frame::Frame;
use crate::utils::sha1::sha1_hex;

/// A value in the script interpreter's model.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    Nil,
    Boolean(bool),
    Number(f64),
    String(Bytes),
    Table(Vec<ScriptValue>),
    Error(String),
    Status(String),
}

/// Lets a running script invoke server commands synchronously.
pub trait CommandCaller {
    /// Runs one command (name first) against the script's database and returns its reply.
    /// Command failures come back as [`ScriptValue::Error`].
    fn call(&mut self, args: Vec<Bytes>) -> ScriptValue;
}

/// An embedded interpreter for EVAL. No interpreter ships with the server; embedders plug one in
/// with [`crate::store::Store::with_engine`].
pub trait ScriptEngine: Send + Sync {
    fn eval(
        &self,
        source: &str,
        keys: &[Bytes],
        args: &[Bytes],
        redis: &mut dyn CommandCaller,
    ) -> Result<ScriptValue, String>;
}

/// Command replies as seen from inside a script.
impl From<Frame> for ScriptValue {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Integer(n) => ScriptValue::Number(n as f64),
            Frame::Bulk(bytes) => ScriptValue::String(bytes),
            Frame::Null => ScriptValue::Boolean(false),
            Frame::Array(frames) => {
                ScriptValue::Table(frames.into_iter().map(ScriptValue::from).collect())
            }
            Frame::Simple(status) => ScriptValue::Status(status),
            Frame::Error(message) => ScriptValue::Error(message),
            Frame::Unknown(parts) => {
                ScriptValue::Table(parts.into_iter().map(ScriptValue::String).collect())
            }
        }
    }
}

/// A script's result as sent back to the client.
impl From<ScriptValue> for Frame {
    fn from(value: ScriptValue) -> Self {
        match value {
            ScriptValue::Nil | ScriptValue::Boolean(false) => Frame::Null,
            ScriptValue::Boolean(true) => Frame::Integer(1),
            ScriptValue::Number(n) => Frame::Integer(n as i64),
            ScriptValue::String(bytes) => Frame::Bulk(normalize_number(bytes)),
            ScriptValue::Table(values) => {
                Frame::Array(values.into_iter().map(Frame::from).collect())
            }
            ScriptValue::Error(message) => Frame::Error(message),
            ScriptValue::Status(status) => Frame::Simple(status),
        }
    }
}

/// Numeric strings are rendered as integer text, the way numbers reach the client.
fn normalize_number(bytes: Bytes) -> Bytes {
    let number = str::from_utf8(&bytes)
        .ok()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite());

    match number {
        Some(n) => Bytes::from((n as i64).to_string()),
        None => bytes,
    }
}

/// Script sources by SHA-1 digest, plus the engine that runs them.
pub struct Scripts {
    engine: Option<Arc<dyn ScriptEngine>>,
    cache: Mutex<HashMap<String, String>>,
}

impl Scripts {
    pub fn new(engine: Option<Arc<dyn ScriptEngine>>) -> Scripts {
        Scripts {
            engine,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Caches `source` and returns its digest.
    pub fn load(&self, source: &str) -> String {
        let sha = sha1_hex(source.as_bytes());
        self.cache().insert(sha.clone(), source.to_string());
        sha
    }

    pub fn get(&self, sha: &str) -> Option<String> {
        self.cache().get(&sha.to_lowercase()).cloned()
    }

    pub fn exists(&self, sha: &str) -> bool {
        self.cache().contains_key(&sha.to_lowercase())
    }

    pub fn flush(&self) {
        self.cache().clear();
    }

    pub fn engine(&self) -> Option<Arc<dyn ScriptEngine>> {
        self.engine.clone()
    }
}

struct Caller<'c, 'a> {
    ctx: &'c mut Context<'a>,
}

impl CommandCaller for Caller<'_, '_> {
    fn call(&mut self, args: Vec<Bytes>) -> ScriptValue {
        ScriptValue::from(dispatch::call(self.ctx, args))
    }
}

/// Runs `source` with the configured engine. The caller already holds the exclusive gate.
pub fn eval(
    ctx: &mut Context,
    source: &str,
    keys: &[Bytes],
    args: &[Bytes],
) -> Result<Frame, CommandError> {
    let engine = ctx
        .store
        .scripts()
        .engine()
        .ok_or_else(|| CommandError::Script("scripting engine not available".to_string()))?;

    let blocking = ctx.blocking;
    ctx.blocking = false;
    let res = engine.eval(source, keys, args, &mut Caller { ctx: &mut *ctx });
    ctx.blocking = blocking;

    match res {
        Ok(value) => Ok(Frame::from(value)),
        Err(message) => Err(CommandError::Script(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_into_script_values() {
        let frame = Frame::Array(vec![
            Frame::Integer(3),
            Frame::bulk("a"),
            Frame::Null,
            Frame::Simple("OK".to_string()),
        ]);

        assert_eq!(
            ScriptValue::from(frame),
            ScriptValue::Table(vec![
                ScriptValue::Number(3.0),
                ScriptValue::String(Bytes::from("a")),
                ScriptValue::Boolean(false),
                ScriptValue::Status("OK".to_string()),
            ])
        );
    }

    #[test]
    fn script_values_into_replies() {
        assert_eq!(Frame::from(ScriptValue::Nil), Frame::Null);
        assert_eq!(Frame::from(ScriptValue::Boolean(false)), Frame::Null);
        assert_eq!(Frame::from(ScriptValue::Boolean(true)), Frame::Integer(1));
        assert_eq!(Frame::from(ScriptValue::Number(3.9)), Frame::Integer(3));
        assert_eq!(
            Frame::from(ScriptValue::String(Bytes::from("10.0"))),
            Frame::bulk("10")
        );
        assert_eq!(
            Frame::from(ScriptValue::String(Bytes::from("ten"))),
            Frame::bulk("ten")
        );
        assert_eq!(
            Frame::from(ScriptValue::Table(vec![
                ScriptValue::Number(1.0),
                ScriptValue::Table(vec![ScriptValue::Nil]),
            ])),
            Frame::Array(vec![Frame::Integer(1), Frame::Array(vec![Frame::Null])])
        );
    }

    #[test]
    fn cache_by_digest() {
        let scripts = Scripts::new(None);

        let sha = scripts.load("return 1");

        assert_eq!(sha, "e0e1f9fabfc9d4800c877a703b823ac0578ff8db");
        assert!(scripts.exists(&sha.to_uppercase()));
        assert_eq!(scripts.get(&sha), Some("return 1".to_string()));

        scripts.flush();
        assert!(!scripts.exists(&sha));
    }
}
