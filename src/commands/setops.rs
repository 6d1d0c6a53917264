use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::keyspace::Keyspace;
use crate::value::{Data, Set, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetOp {
    Inter,
    Union,
    Diff,
}

impl SetOp {
    /// Combines the sets stored at `keys`. Missing keys count as empty sets; every existing key
    /// must hold a set.
    fn apply(self, keyspace: &mut Keyspace, keys: &[String]) -> Result<Set, CommandError> {
        let mut sets = Vec::with_capacity(keys.len());
        for key in keys {
            sets.push(keyspace.read::<Set>(key)?.cloned().unwrap_or_default());
        }

        let mut sets = sets.into_iter();
        let first = sets.next().unwrap_or_default();

        let res = sets.fold(first, |acc, set| match self {
            SetOp::Inter => acc.intersection(&set).cloned().collect(),
            SetOp::Union => acc.union(&set).cloned().collect(),
            SetOp::Diff => acc.difference(&set).cloned().collect(),
        });

        Ok(res)
    }
}

fn strings(parser: &mut CommandParser) -> Result<Vec<String>, CommandError> {
    Ok(parser.rest_strings()?)
}

/// SINTER, SUNION and SDIFF: the members of the set resulting from combining all the given sets.
///
/// Ref: <https://redis.io/docs/latest/commands/sinter/>
#[derive(Debug, PartialEq)]
pub struct SetCombine {
    pub op: SetOp,
    pub keys: Vec<String>,
}

impl SetCombine {
    pub fn parse(parser: &mut CommandParser, op: SetOp) -> Result<SetCombine, CommandError> {
        let keys = strings(parser)?;
        Ok(SetCombine { op, keys })
    }
}

impl Executable for SetCombine {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let set = self.op.apply(&mut ctx.keyspace(), &self.keys)?;
        Ok(Frame::Array(set.into_iter().map(Frame::Bulk).collect()))
    }
}

/// SINTERSTORE, SUNIONSTORE and SDIFFSTORE: like their plain counterparts, but the result is
/// stored at `destination`, overwriting it. An empty result deletes `destination`.
///
/// Returns the number of members in the resulting set.
///
/// Ref: <https://redis.io/docs/latest/commands/sinterstore/>
#[derive(Debug, PartialEq)]
pub struct SetCombineStore {
    pub op: SetOp,
    pub destination: String,
    pub keys: Vec<String>,
}

impl SetCombineStore {
    pub fn parse(parser: &mut CommandParser, op: SetOp) -> Result<SetCombineStore, CommandError> {
        let destination = parser.next_string()?;
        let keys = strings(parser)?;

        Ok(SetCombineStore {
            op,
            destination,
            keys,
        })
    }
}

impl Executable for SetCombineStore {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let set = self.op.apply(&mut keyspace, &self.keys)?;
        let len = set.len();

        if set.is_empty() {
            keyspace.remove(&self.destination);
        } else {
            keyspace.put(self.destination, Value::new(Data::Set(set)));
        }

        Ok(Frame::Integer(len as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    fn sorted(frame: Frame) -> Vec<String> {
        let Frame::Array(members) = frame else {
            panic!("expected array");
        };
        let mut members: Vec<String> = members
            .into_iter()
            .map(|member| match member {
                Frame::Bulk(bytes) => String::from_utf8(bytes.to_vec()).unwrap(),
                frame => panic!("expected bulk, got {}", frame),
            })
            .collect();
        members.sort();
        members
    }

    fn fixture() -> (Store, Session) {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["SADD", "key1", "a", "b", "c", "d"]);
        run(&store, &mut session, &["SADD", "key2", "c"]);
        run(&store, &mut session, &["SADD", "key3", "a", "c", "e"]);
        (store, session)
    }

    #[test]
    fn inter_union_diff() {
        let (store, mut session) = fixture();

        assert_eq!(
            sorted(run(&store, &mut session, &["SINTER", "key1", "key2", "key3"])),
            vec!["c"]
        );
        assert_eq!(
            sorted(run(&store, &mut session, &["SUNION", "key1", "key2", "key3"])),
            vec!["a", "b", "c", "d", "e"]
        );
        assert_eq!(
            sorted(run(&store, &mut session, &["SDIFF", "key1", "key2", "key3"])),
            vec!["b", "d"]
        );
        assert_eq!(
            sorted(run(&store, &mut session, &["SINTER", "key1", "nope"])),
            Vec::<String>::new()
        );
    }

    #[test]
    fn store_variants() {
        let (store, mut session) = fixture();
        run(&store, &mut session, &["SET", "dst", "v"]);

        assert_eq!(
            run(&store, &mut session, &["SUNIONSTORE", "dst", "key2", "key3"]),
            Frame::Integer(3)
        );
        assert_eq!(run(&store, &mut session, &["TYPE", "dst"]), Frame::Simple("set".to_string()));

        assert_eq!(
            run(&store, &mut session, &["SINTERSTORE", "dst", "key2", "nope"]),
            Frame::Integer(0)
        );
        assert_eq!(run(&store, &mut session, &["EXISTS", "dst"]), Frame::Integer(0));
    }

    #[test]
    fn every_key_must_be_a_set() {
        let (store, mut session) = fixture();
        run(&store, &mut session, &["SET", "str", "v"]);

        assert_eq!(
            run(&store, &mut session, &["SUNION", "key1", "str"]),
            Frame::Error("WRONGTYPE Operation against a key holding the wrong kind of value".to_string())
        );
    }
}
