use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

/// Select the logical database having the specified zero-based numeric index. New connections
/// always use the database 0.
///
/// Ref: <https://redis.io/docs/latest/commands/select>
#[derive(Debug, PartialEq)]
pub struct Select {
    pub index: i64,
}

impl Executable for Select {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let index = usize::try_from(self.index)
            .ok()
            .filter(|index| *index < ctx.store.databases())
            .ok_or_else(|| CommandError::range("DB index is out of range"))?;

        ctx.session.select(index);
        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for Select {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let index = parser.next_integer()?;
        Ok(Self { index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    #[test]
    fn databases_are_isolated() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        run(&store, &mut session, &["SET", "key", "zero"]);
        assert_eq!(run(&store, &mut session, &["SELECT", "1"]), Frame::ok());
        assert_eq!(session.db(), 1);

        assert_eq!(run(&store, &mut session, &["GET", "key"]), Frame::Null);
        run(&store, &mut session, &["SET", "key", "one"]);

        run(&store, &mut session, &["SELECT", "0"]);
        assert_eq!(run(&store, &mut session, &["GET", "key"]), Frame::bulk("zero"));
    }

    #[test]
    fn out_of_range() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        for index in ["16", "-1"] {
            assert_eq!(
                run(&store, &mut session, &["SELECT", index]),
                Frame::Error("ERR DB index is out of range".to_string())
            );
        }
        assert_eq!(
            run(&store, &mut session, &["SELECT", "one"]),
            Frame::Error("ERR value is not an integer or out of range".to_string())
        );
        assert_eq!(session.db(), 0);
    }
}
