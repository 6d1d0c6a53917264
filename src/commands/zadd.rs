use bytes::Bytes;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::{format_float, parse_float, CommandParser};
use crate::commands::zincrby::increment;
use crate::commands::CommandError;
use crate::frame::Frame;
use crate::value::SortedSet;

/// Adds all the specified members with the specified scores to the sorted set stored at `key`.
///
/// Options:
/// - `NX`: only add new elements, never update existing ones.
/// - `XX`: only update elements that already exist, never add new ones.
/// - `CH`: count changed elements (added or with an updated score) instead of added ones.
/// - `INCR`: act like ZINCRBY. Only one score-member pair can be given.
///
/// Ref: <https://redis.io/docs/latest/commands/zadd/>
#[derive(Debug, PartialEq)]
pub struct Zadd {
    pub key: String,
    pub condition: Option<Condition>,
    pub changed: bool,
    pub incr: bool,
    pub members: Vec<(f64, Bytes)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    Nx,
    Xx,
}

impl Condition {
    fn admits(condition: Option<Condition>, exists: bool) -> bool {
        match condition {
            Some(Condition::Nx) => !exists,
            Some(Condition::Xx) => exists,
            None => true,
        }
    }
}

impl Zadd {
    fn add(self, zset: &mut SortedSet) -> Result<Frame, CommandError> {
        if self.incr {
            let Some((delta, member)) = self.members.into_iter().next() else {
                return Err(CommandError::Syntax);
            };
            if !Condition::admits(self.condition, zset.score(&member).is_some()) {
                return Ok(Frame::Null);
            }
            let score = increment(zset, member, delta)?;
            return Ok(Frame::bulk(format_float(score)));
        }

        let mut added = 0;
        let mut changed = 0;

        for (score, member) in self.members {
            let current = zset.score(&member);
            if !Condition::admits(self.condition, current.is_some()) {
                continue;
            }
            if current == Some(score) {
                continue;
            }
            if zset.insert(member, score) {
                added += 1;
            }
            changed += 1;
        }

        let count = if self.changed { changed } else { added };
        Ok(Frame::Integer(count))
    }
}

impl Executable for Zadd {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let key = self.key.clone();

        ctx.keyspace()
            .modify::<SortedSet, _>(&key, true, |zset| self.add(zset))?
            .unwrap_or(Ok(Frame::Integer(0)))
    }
}

impl TryFrom<&mut CommandParser> for Zadd {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let mut args = parser.rest_bytes().into_iter().peekable();

        let mut condition = None;
        let mut changed = false;
        let mut incr = false;

        while let Some(flag) = args.peek() {
            match flag.to_ascii_uppercase().as_slice() {
                b"NX" if condition == Some(Condition::Xx) => return Err(incompatible()),
                b"XX" if condition == Some(Condition::Nx) => return Err(incompatible()),
                b"NX" => condition = Some(Condition::Nx),
                b"XX" => condition = Some(Condition::Xx),
                b"CH" => changed = true,
                b"INCR" => incr = true,
                _ => break,
            }
            args.next();
        }

        let args: Vec<Bytes> = args.collect();
        if args.is_empty() || args.len() % 2 != 0 {
            return Err(CommandError::Syntax);
        }
        if incr && args.len() > 2 {
            return Err(CommandError::range(
                "INCR option supports a single increment-element pair",
            ));
        }

        let members = args
            .chunks(2)
            .map(|pair| {
                let score = parse_float(&pair[0]).ok_or(CommandError::NotFloat)?;
                Ok((score, pair[1].clone()))
            })
            .collect::<Result<Vec<_>, CommandError>>()?;

        Ok(Self {
            key,
            condition,
            changed,
            incr,
            members,
        })
    }
}

fn incompatible() -> CommandError {
    CommandError::range("XX and NX options at the same time are not compatible")
}
