use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Returns how many of the given keys exist. A key mentioned several times is counted each time.
///
/// Ref: <https://redis.io/docs/latest/commands/exists/>
#[derive(Debug, PartialEq)]
pub struct Exists {
    pub keys: Vec<String>,
}

impl Executable for Exists {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let mut keyspace = ctx.keyspace();
        let count = self.keys.iter().filter(|key| keyspace.exists(key)).count();
        Ok(Frame::Integer(count as i64))
    }
}

impl TryFrom<&mut CommandParser> for Exists {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let keys = parser.rest_strings()?;
        Ok(Self { keys })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn counts_duplicates() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        run(&store, &mut session, &["SET", "a", "1"]);
        run(&store, &mut session, &["SADD", "b", "x"]);

        assert_eq!(
            run(&store, &mut session, &["EXISTS", "a", "b", "a", "missing"]),
            Frame::Integer(3)
        );
    }
}
