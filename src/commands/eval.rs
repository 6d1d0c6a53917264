use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::script;

/// Invoke the execution of a server-side script. The script is cached, so later calls can use
/// EVALSHA with its digest.
///
/// Ref: <https://redis.io/docs/latest/commands/eval/>
#[derive(Debug, PartialEq)]
pub struct Eval {
    pub script: String,
    pub keys: Vec<Bytes>,
    pub args: Vec<Bytes>,
}

/// Splits `numkeys key [key ...] arg [arg ...]` into keys and arguments.
pub(crate) fn keys_and_args(
    parser: &mut CommandParser,
) -> Result<(Vec<Bytes>, Vec<Bytes>), CommandError> {
    let numkeys = parser.next_integer()?;
    let numkeys = usize::try_from(numkeys)
        .map_err(|_| CommandError::range("Number of keys can't be negative"))?;

    if numkeys > parser.remaining() {
        return Err(CommandError::range(
            "Number of keys can't be greater than number of args",
        ));
    }

    let mut args = parser.rest_bytes();
    let rest = args.split_off(numkeys);
    Ok((args, rest))
}

impl Executable for Eval {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        ctx.store.scripts().load(&self.script);
        script::eval(ctx, &self.script, &self.keys, &self.args)
    }
}

impl TryFrom<&mut CommandParser> for Eval {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let script = parser.next_string()?;
        let (keys, args) = keys_and_args(parser)?;

        Ok(Self { script, keys, args })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;
    use crate::dispatch::run;
    use crate::script::{CommandCaller, ScriptEngine, ScriptValue};
    use crate::session::Session;
    use crate::store::Store;

    /// Runs ARGV as a single command and returns its reply, prefixed by the KEYS.
    pub(crate) struct Forward;

    impl ScriptEngine for Forward {
        fn eval(
            &self,
            source: &str,
            keys: &[Bytes],
            args: &[Bytes],
            redis: &mut dyn CommandCaller,
        ) -> Result<ScriptValue, String> {
            if source == "error" {
                return Err("boom".to_string());
            }

            let reply = redis.call(args.to_vec());
            let mut table: Vec<ScriptValue> =
                keys.iter().cloned().map(ScriptValue::String).collect();
            table.push(reply);
            Ok(ScriptValue::Table(table))
        }
    }

    pub(crate) fn store() -> Store {
        Store::with_engine(Config::default(), Arc::new(Forward))
    }

    #[test]
    fn parse_keys_and_args() {
        let frame = Frame::Array(vec![
            Frame::bulk("EVAL"),
            Frame::bulk("src"),
            Frame::bulk("1"),
            Frame::bulk("k"),
            Frame::bulk("a"),
        ]);

        assert_eq!(
            crate::commands::Command::try_from(frame).unwrap(),
            crate::commands::Command::Eval(Eval {
                script: "src".to_string(),
                keys: vec![Bytes::from("k")],
                args: vec![Bytes::from("a")],
            })
        );
    }

    #[test]
    fn runs_commands_through_engine() {
        let store = store();
        let (mut session, _rx) = Session::new(1, None);

        assert_eq!(
            run(&store, &mut session, &["EVAL", "fwd", "1", "k", "SET", "a", "1"]),
            Frame::Array(vec![Frame::bulk("k"), Frame::Simple("OK".to_string())])
        );
        assert_eq!(
            run(&store, &mut session, &["EVAL", "fwd", "0", "INCR", "a"]),
            Frame::Array(vec![Frame::Integer(2)])
        );
        assert_eq!(
            run(&store, &mut session, &["EVAL", "error", "0"]),
            Frame::Error("ERR boom".to_string())
        );
    }

    #[test]
    fn blocking_and_transaction_commands_inside_scripts() {
        let store = store();
        let (mut session, _rx) = Session::new(1, None);

        assert_eq!(
            run(&store, &mut session, &["EVAL", "fwd", "0", "BLPOP", "empty", "0"]),
            Frame::Array(vec![Frame::Null])
        );
        assert_eq!(
            run(&store, &mut session, &["EVAL", "fwd", "0", "MULTI"]),
            Frame::Array(vec![Frame::Error(
                "ERR This Redis command is not allowed from script".to_string()
            )])
        );
    }

    #[test]
    fn invalid_numkeys() {
        let store = store();
        let (mut session, _rx) = Session::new(1, None);

        assert_eq!(
            run(&store, &mut session, &["EVAL", "fwd", "-1"]),
            Frame::Error("ERR Number of keys can't be negative".to_string())
        );
        assert_eq!(
            run(&store, &mut session, &["EVAL", "fwd", "2", "k"]),
            Frame::Error("ERR Number of keys can't be greater than number of args".to_string())
        );
    }

    #[test]
    fn no_engine() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        assert_eq!(
            run(&store, &mut session, &["EVAL", "return 1", "0"]),
            Frame::Error("ERR scripting engine not available".to_string())
        );
    }
}
