use rand::seq::IteratorRandom;
use rand::seq::SliceRandom;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::Set;

/// Returns random members of the set stored at `key` without removing them.
///
/// A positive `count` returns up to `count` distinct members. A negative one returns exactly
/// `|count|` members, possibly repeating some.
///
/// Ref: <https://redis.io/docs/latest/commands/srandmember/>
#[derive(Debug, PartialEq)]
pub struct Srandmember {
    pub key: String,
    pub count: Option<i64>,
}

impl Executable for Srandmember {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let set = keyspace.read::<Set>(&self.key)?;
        let mut rng = rand::thread_rng();

        let Some(count) = self.count else {
            let member = set.and_then(|set| set.iter().choose(&mut rng).cloned());
            return Ok(member.into());
        };

        let Some(set) = set else {
            return Ok(Frame::Array(vec![]));
        };

        let members = match usize::try_from(count) {
            Ok(count) => {
                let count = count.min(set.len());
                set.iter().cloned().choose_multiple(&mut rng, count)
            }
            Err(_) => {
                let pool: Vec<_> = set.iter().collect();
                let wanted = usize::try_from(count.unsigned_abs())
                    .map_err(|_| CommandError::range("value is out of range"))?;
                (0..wanted)
                    .filter_map(|_| pool.choose(&mut rng).map(|member| (*member).clone()))
                    .collect()
            }
        };

        Ok(Frame::Array(members.into_iter().map(Frame::Bulk).collect()))
    }
}

impl TryFrom<&mut CommandParser> for Srandmember {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let count = match parser.has_next() {
            true => {
                let count = parser.next_integer()?;
                // Negative counts repeat members, so their magnitude bounds the reply size.
                if count < -(i64::MAX / 2) {
                    return Err(CommandError::range("value is out of range"));
                }
                Some(count)
            }
            false => None,
        };

        Ok(Self { key, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    fn len(frame: Frame) -> usize {
        match frame {
            Frame::Array(members) => members.len(),
            frame => panic!("expected array, got {}", frame),
        }
    }

    #[test]
    fn distinct_and_repeated_counts() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["SADD", "s", "a", "b", "c"]);

        assert_eq!(len(run(&store, &mut session, &["SRANDMEMBER", "s", "2"])), 2);
        assert_eq!(len(run(&store, &mut session, &["SRANDMEMBER", "s", "10"])), 3);
        assert_eq!(len(run(&store, &mut session, &["SRANDMEMBER", "s", "-10"])), 10);
        assert_eq!(run(&store, &mut session, &["SCARD", "s"]), Frame::Integer(3));
    }

    #[test]
    fn huge_counts() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["SADD", "s", "a", "b"]);

        assert_eq!(
            len(run(&store, &mut session, &["SRANDMEMBER", "s", "1000000000000000"])),
            2
        );
        assert_eq!(
            run(&store, &mut session, &["SRANDMEMBER", "s", "-9223372036854775807"]),
            Frame::Error("ERR value is out of range".to_string())
        );
        assert_eq!(
            run(&store, &mut session, &["SRANDMEMBER", "s", "-9223372036854775808"]),
            Frame::Error("ERR value is out of range".to_string())
        );
    }

    #[test]
    fn missing_key() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        assert_eq!(run(&store, &mut session, &["SRANDMEMBER", "s"]), Frame::Null);
        assert_eq!(
            run(&store, &mut session, &["SRANDMEMBER", "s", "3"]),
            Frame::Array(vec![])
        );
    }
}
