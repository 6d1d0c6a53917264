pub mod append;
pub mod bpop;
pub mod brpoplpush;
pub mod client;
pub mod command;
pub mod config;
pub mod dbsize;
pub mod decr;
pub mod decrby;
pub mod del;
pub mod discard;
pub mod echo;
pub mod error;
pub mod eval;
pub mod evalsha;
pub mod exec;
pub mod executable;
pub mod exists;
pub mod expire;
pub mod flushall;
pub mod flushdb;
pub mod get;
pub mod getdel;
pub mod getex;
pub mod getrange;
pub mod getset;
pub mod hdel;
pub mod hexists;
pub mod hget;
pub mod hgetall;
pub mod hincrby;
pub mod hkeys;
pub mod hlen;
pub mod hmget;
pub mod hset;
pub mod hsetnx;
pub mod hvals;
pub mod incr;
pub mod incrby;
pub mod incrbyfloat;
pub mod info;
pub mod keys;
pub mod lindex;
pub mod linsert;
pub mod llen;
pub mod lrange;
pub mod lrem;
pub mod lset;
pub mod ltrim;
pub mod mget;
pub mod move_;
pub mod mset;
pub mod msetnx;
pub mod multi;
pub mod parser;
pub mod persist;
pub mod pexpire;
pub mod ping;
pub mod pop;
pub mod psubscribe;
pub mod pttl;
pub mod publish;
pub mod pubsub;
pub mod punsubscribe;
pub mod push;
pub mod quit;
pub mod randomkey;
pub mod rename;
pub mod renamenx;
pub mod rpoplpush;
pub mod sadd;
pub mod scan;
pub mod scard;
pub mod script;
pub mod select;
pub mod set;
pub mod setnx;
pub mod setops;
pub mod setrange;
pub mod sismember;
pub mod smembers;
pub mod smove;
pub mod spop;
pub mod srandmember;
pub mod srem;
pub mod strlen;
pub mod subscribe;
pub mod time;
pub mod ttl;
pub mod type_;
pub mod unsubscribe;
pub mod zadd;
pub mod zcard;
pub mod zcount;
pub mod zincrby;
pub mod zrange;
pub mod zrangebyscore;
pub mod zrank;
pub mod zrem;
pub mod zscore;

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::blocking::End;
use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::dispatch::{Reply, Request};
use crate::frame::Frame;
use crate::value::DataType;

pub use error::CommandError;

use append::Append;
use bpop::BPop;
use brpoplpush::Brpoplpush;
use client::Client;
use command::Command as Command_;
use config::Config;
use dbsize::DBSize;
use decr::Decr;
use decrby::DecrBy;
use del::Del;
use discard::Discard;
use echo::Echo;
use eval::Eval;
use evalsha::Evalsha;
use exec::Exec;
use exists::Exists;
use expire::Expire;
use flushall::FlushAll;
use flushdb::FlushDB;
use get::Get;
use getdel::Getdel;
use getex::Getex;
use getrange::Getrange;
use getset::Getset;
use hdel::Hdel;
use hexists::Hexists;
use hget::Hget;
use hgetall::Hgetall;
use hincrby::HincrBy;
use hkeys::Hkeys;
use hlen::Hlen;
use hmget::Hmget;
use hset::Hset;
use hsetnx::Hsetnx;
use hvals::Hvals;
use incr::Incr;
use incrby::IncrBy;
use incrbyfloat::IncrByFloat;
use info::Info;
use keys::Keys;
use lindex::Lindex;
use linsert::Linsert;
use llen::Llen;
use lrange::Lrange;
use lrem::Lrem;
use lset::Lset;
use ltrim::Ltrim;
use mget::Mget;
use move_::Move;
use mset::Mset;
use msetnx::Msetnx;
use multi::Multi;
use persist::Persist;
use pexpire::Pexpire;
use ping::Ping;
use pop::Pop;
use psubscribe::Psubscribe;
use pttl::Pttl;
use publish::Publish;
use pubsub::Pubsub;
use punsubscribe::Punsubscribe;
use push::Push;
use quit::Quit;
use randomkey::Randomkey;
use rename::Rename;
use renamenx::Renamenx;
use rpoplpush::Rpoplpush;
use sadd::Sadd;
use scan::Scan;
use scard::Scard;
use script::Script;
use select::Select;
use set::Set;
use setnx::Setnx;
use setops::{SetCombine, SetCombineStore, SetOp};
use setrange::Setrange;
use sismember::Sismember;
use smembers::Smembers;
use smove::Smove;
use spop::Spop;
use srandmember::Srandmember;
use srem::Srem;
use strlen::Strlen;
use subscribe::Subscribe;
use time::Time;
use ttl::Ttl;
use type_::Type;
use unsubscribe::Unsubscribe;
use zadd::Zadd;
use zcard::Zcard;
use zcount::Zcount;
use zincrby::ZincrBy;
use zrange::Zrange;
use zrangebyscore::Zrangebyscore;
use zrank::Zrank;
use zrem::Zrem;
use zscore::Zscore;

#[derive(Debug, PartialEq)]
pub enum Command {
    // Keys and strings
    Append(Append),
    Decr(Decr),
    DecrBy(DecrBy),
    Del(Del),
    Exists(Exists),
    Expire(Expire),
    Get(Get),
    Getdel(Getdel),
    Getex(Getex),
    Getrange(Getrange),
    Getset(Getset),
    Incr(Incr),
    IncrBy(IncrBy),
    IncrByFloat(IncrByFloat),
    Keys(Keys),
    Mget(Mget),
    Move(Move),
    Mset(Mset),
    Msetnx(Msetnx),
    Persist(Persist),
    Pexpire(Pexpire),
    Pttl(Pttl),
    Randomkey(Randomkey),
    Rename(Rename),
    Renamenx(Renamenx),
    Scan(Scan),
    Set(Set),
    Setnx(Setnx),
    Setrange(Setrange),
    Strlen(Strlen),
    Ttl(Ttl),
    Type(Type),

    // Hashes
    Hdel(Hdel),
    Hexists(Hexists),
    Hget(Hget),
    Hgetall(Hgetall),
    HincrBy(HincrBy),
    Hkeys(Hkeys),
    Hlen(Hlen),
    Hmget(Hmget),
    Hset(Hset),
    Hsetnx(Hsetnx),
    Hvals(Hvals),

    // Lists
    BPop(BPop),
    Brpoplpush(Brpoplpush),
    Lindex(Lindex),
    Linsert(Linsert),
    Llen(Llen),
    Lrange(Lrange),
    Lrem(Lrem),
    Lset(Lset),
    Ltrim(Ltrim),
    Pop(Pop),
    Push(Push),
    Rpoplpush(Rpoplpush),

    // Sets
    Sadd(Sadd),
    Scard(Scard),
    SetCombine(SetCombine),
    SetCombineStore(SetCombineStore),
    Sismember(Sismember),
    Smembers(Smembers),
    Smove(Smove),
    Spop(Spop),
    Srandmember(Srandmember),
    Srem(Srem),

    // Sorted sets
    Zadd(Zadd),
    Zcard(Zcard),
    Zcount(Zcount),
    ZincrBy(ZincrBy),
    Zrange(Zrange),
    Zrangebyscore(Zrangebyscore),
    Zrank(Zrank),
    Zrem(Zrem),
    Zscore(Zscore),

    // Transactions
    Discard(Discard),
    Exec(Exec),
    Multi(Multi),

    // Pub/Sub
    Psubscribe(Psubscribe),
    Publish(Publish),
    Pubsub(Pubsub),
    Punsubscribe(Punsubscribe),
    Subscribe(Subscribe),
    Unsubscribe(Unsubscribe),

    // Scripting
    Eval(Eval),
    Evalsha(Evalsha),
    Script(Script),

    // Connection and server
    Client(Client),
    Command(Command_),
    Config(Config),
    DBSize(DBSize),
    Echo(Echo),
    FlushAll(FlushAll),
    FlushDB(FlushDB),
    Info(Info),
    Ping(Ping),
    Quit(Quit),
    Select(Select),
    Time(Time),
}

impl Command {
    pub fn run(self, ctx: &mut Context) -> Result<Reply, CommandError> {
        let frame = match self {
            // Commands that reply more than once or suspend.
            Command::BPop(cmd) => return cmd.run(ctx),
            Command::Brpoplpush(cmd) => return cmd.run(ctx),
            Command::Subscribe(cmd) => return cmd.run(ctx),
            Command::Unsubscribe(cmd) => return cmd.run(ctx),
            Command::Psubscribe(cmd) => return cmd.run(ctx),
            Command::Punsubscribe(cmd) => return cmd.run(ctx),

            Command::Append(cmd) => cmd.exec(ctx),
            Command::Decr(cmd) => cmd.exec(ctx),
            Command::DecrBy(cmd) => cmd.exec(ctx),
            Command::Del(cmd) => cmd.exec(ctx),
            Command::Exists(cmd) => cmd.exec(ctx),
            Command::Expire(cmd) => cmd.exec(ctx),
            Command::Get(cmd) => cmd.exec(ctx),
            Command::Getdel(cmd) => cmd.exec(ctx),
            Command::Getex(cmd) => cmd.exec(ctx),
            Command::Getrange(cmd) => cmd.exec(ctx),
            Command::Getset(cmd) => cmd.exec(ctx),
            Command::Incr(cmd) => cmd.exec(ctx),
            Command::IncrBy(cmd) => cmd.exec(ctx),
            Command::IncrByFloat(cmd) => cmd.exec(ctx),
            Command::Keys(cmd) => cmd.exec(ctx),
            Command::Mget(cmd) => cmd.exec(ctx),
            Command::Move(cmd) => cmd.exec(ctx),
            Command::Mset(cmd) => cmd.exec(ctx),
            Command::Msetnx(cmd) => cmd.exec(ctx),
            Command::Persist(cmd) => cmd.exec(ctx),
            Command::Pexpire(cmd) => cmd.exec(ctx),
            Command::Pttl(cmd) => cmd.exec(ctx),
            Command::Randomkey(cmd) => cmd.exec(ctx),
            Command::Rename(cmd) => cmd.exec(ctx),
            Command::Renamenx(cmd) => cmd.exec(ctx),
            Command::Scan(cmd) => cmd.exec(ctx),
            Command::Set(cmd) => cmd.exec(ctx),
            Command::Setnx(cmd) => cmd.exec(ctx),
            Command::Setrange(cmd) => cmd.exec(ctx),
            Command::Strlen(cmd) => cmd.exec(ctx),
            Command::Ttl(cmd) => cmd.exec(ctx),
            Command::Type(cmd) => cmd.exec(ctx),

            Command::Hdel(cmd) => cmd.exec(ctx),
            Command::Hexists(cmd) => cmd.exec(ctx),
            Command::Hget(cmd) => cmd.exec(ctx),
            Command::Hgetall(cmd) => cmd.exec(ctx),
            Command::HincrBy(cmd) => cmd.exec(ctx),
            Command::Hkeys(cmd) => cmd.exec(ctx),
            Command::Hlen(cmd) => cmd.exec(ctx),
            Command::Hmget(cmd) => cmd.exec(ctx),
            Command::Hset(cmd) => cmd.exec(ctx),
            Command::Hsetnx(cmd) => cmd.exec(ctx),
            Command::Hvals(cmd) => cmd.exec(ctx),

            Command::Lindex(cmd) => cmd.exec(ctx),
            Command::Linsert(cmd) => cmd.exec(ctx),
            Command::Llen(cmd) => cmd.exec(ctx),
            Command::Lrange(cmd) => cmd.exec(ctx),
            Command::Lrem(cmd) => cmd.exec(ctx),
            Command::Lset(cmd) => cmd.exec(ctx),
            Command::Ltrim(cmd) => cmd.exec(ctx),
            Command::Pop(cmd) => cmd.exec(ctx),
            Command::Push(cmd) => cmd.exec(ctx),
            Command::Rpoplpush(cmd) => cmd.exec(ctx),

            Command::Sadd(cmd) => cmd.exec(ctx),
            Command::Scard(cmd) => cmd.exec(ctx),
            Command::SetCombine(cmd) => cmd.exec(ctx),
            Command::SetCombineStore(cmd) => cmd.exec(ctx),
            Command::Sismember(cmd) => cmd.exec(ctx),
            Command::Smembers(cmd) => cmd.exec(ctx),
            Command::Smove(cmd) => cmd.exec(ctx),
            Command::Spop(cmd) => cmd.exec(ctx),
            Command::Srandmember(cmd) => cmd.exec(ctx),
            Command::Srem(cmd) => cmd.exec(ctx),

            Command::Zadd(cmd) => cmd.exec(ctx),
            Command::Zcard(cmd) => cmd.exec(ctx),
            Command::Zcount(cmd) => cmd.exec(ctx),
            Command::ZincrBy(cmd) => cmd.exec(ctx),
            Command::Zrange(cmd) => cmd.exec(ctx),
            Command::Zrangebyscore(cmd) => cmd.exec(ctx),
            Command::Zrank(cmd) => cmd.exec(ctx),
            Command::Zrem(cmd) => cmd.exec(ctx),
            Command::Zscore(cmd) => cmd.exec(ctx),

            Command::Discard(cmd) => cmd.exec(ctx),
            Command::Exec(cmd) => cmd.exec(ctx),
            Command::Multi(cmd) => cmd.exec(ctx),

            Command::Publish(cmd) => cmd.exec(ctx),
            Command::Pubsub(cmd) => cmd.exec(ctx),

            Command::Eval(cmd) => cmd.exec(ctx),
            Command::Evalsha(cmd) => cmd.exec(ctx),
            Command::Script(cmd) => cmd.exec(ctx),

            Command::Client(cmd) => cmd.exec(ctx),
            Command::Command(cmd) => cmd.exec(ctx),
            Command::Config(cmd) => cmd.exec(ctx),
            Command::DBSize(cmd) => cmd.exec(ctx),
            Command::Echo(cmd) => cmd.exec(ctx),
            Command::FlushAll(cmd) => cmd.exec(ctx),
            Command::FlushDB(cmd) => cmd.exec(ctx),
            Command::Info(cmd) => cmd.exec(ctx),
            Command::Ping(cmd) => cmd.exec(ctx),
            Command::Quit(cmd) => cmd.exec(ctx),
            Command::Select(cmd) => cmd.exec(ctx),
            Command::Time(cmd) => cmd.exec(ctx),
        };

        frame.map(Reply::Frame)
    }
}

type Parse = fn(&mut CommandParser) -> Result<Command, CommandError>;

/// Static description of a command: how many arguments it takes, which value type its first key
/// must hold, in which session states it may run, and how to parse it.
pub struct Contract {
    pub name: &'static str,
    /// Minimum number of arguments, the command name excluded.
    pub min_args: usize,
    /// Maximum number of arguments; `None` for variadic commands.
    pub max_args: Option<usize>,
    /// Type the first key must hold when it exists.
    pub value_type: Option<DataType>,
    /// Allowed while the session is subscribed to channels.
    pub pubsub: bool,
    /// Transaction control: runs immediately instead of being queued by MULTI.
    pub control: bool,
    /// Runs with every other session excluded.
    pub exclusive: bool,
    pub parse: Parse,
}

impl Contract {
    fn new(name: &'static str, min_args: usize, max_args: Option<usize>, parse: Parse) -> Contract {
        Contract {
            name,
            min_args,
            max_args,
            value_type: None,
            pubsub: false,
            control: false,
            exclusive: false,
            parse,
        }
    }

    fn typed(mut self, value_type: DataType) -> Contract {
        self.value_type = Some(value_type);
        self
    }

    fn pubsub(mut self) -> Contract {
        self.pubsub = true;
        self
    }

    fn control(mut self) -> Contract {
        self.control = true;
        self
    }

    fn exclusive(mut self) -> Contract {
        self.exclusive = true;
        self
    }

    pub fn check_arity(&self, args: usize) -> Result<(), CommandError> {
        let too_many = self.max_args.is_some_and(|max| args > max);
        if args < self.min_args || too_many {
            return Err(CommandError::WrongArity {
                command: self.name.to_string(),
            });
        }
        Ok(())
    }

    /// Arity as reported by COMMAND: positive when fixed, negative when it is a minimum. Counts
    /// the command name.
    pub fn arity(&self) -> i64 {
        let min = self.min_args as i64 + 1;
        match self.max_args {
            Some(max) if max == self.min_args => min,
            _ => -min,
        }
    }

    pub fn flags(&self) -> Vec<&'static str> {
        let mut flags = vec![];
        if self.value_type.is_some() {
            flags.push("typed");
        }
        if self.pubsub {
            flags.push("pubsub");
        }
        if self.control {
            flags.push("transaction");
        }
        if self.exclusive {
            flags.push("exclusive");
        }
        flags
    }
}

impl fmt::Debug for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contract")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .field("value_type", &self.value_type)
            .finish_non_exhaustive()
    }
}

const ANY: Option<usize> = None;

const fn exactly(n: usize) -> Option<usize> {
    Some(n)
}

static REGISTRY: LazyLock<HashMap<&'static str, Contract>> = LazyLock::new(|| {
    use DataType::{Hash, List, Set as SetType, SortedSet, String as Str};

    let contracts = [
        // Connection
        Contract::new("ping", 0, exactly(1), |p| Ping::try_from(p).map(Command::Ping)).pubsub(),
        Contract::new("echo", 1, exactly(1), |p| Echo::try_from(p).map(Command::Echo)),
        Contract::new("quit", 0, ANY, |p| Quit::try_from(p).map(Command::Quit))
            .pubsub()
            .control(),
        Contract::new("select", 1, exactly(1), |p| Select::try_from(p).map(Command::Select)),
        Contract::new("client", 1, ANY, |p| Client::try_from(p).map(Command::Client)),
        // Keyspace
        Contract::new("exists", 1, ANY, |p| Exists::try_from(p).map(Command::Exists)),
        Contract::new("del", 1, ANY, |p| Del::try_from(p).map(Command::Del)),
        Contract::new("unlink", 1, ANY, |p| Del::try_from(p).map(Command::Del)),
        Contract::new("type", 1, exactly(1), |p| Type::try_from(p).map(Command::Type)),
        Contract::new("rename", 2, exactly(2), |p| Rename::try_from(p).map(Command::Rename)),
        Contract::new("renamenx", 2, exactly(2), |p| Renamenx::try_from(p).map(Command::Renamenx)),
        Contract::new("move", 2, exactly(2), |p| Move::try_from(p).map(Command::Move)),
        Contract::new("randomkey", 0, exactly(0), |p| Randomkey::try_from(p).map(Command::Randomkey)),
        Contract::new("keys", 1, exactly(1), |p| Keys::try_from(p).map(Command::Keys)),
        Contract::new("scan", 1, ANY, |p| Scan::try_from(p).map(Command::Scan)),
        Contract::new("ttl", 1, exactly(1), |p| Ttl::try_from(p).map(Command::Ttl)),
        Contract::new("pttl", 1, exactly(1), |p| Pttl::try_from(p).map(Command::Pttl)),
        Contract::new("expire", 2, exactly(2), |p| Expire::try_from(p).map(Command::Expire)),
        Contract::new("pexpire", 2, exactly(2), |p| Pexpire::try_from(p).map(Command::Pexpire)),
        Contract::new("persist", 1, exactly(1), |p| Persist::try_from(p).map(Command::Persist)),
        // Strings
        Contract::new("get", 1, exactly(1), |p| Get::try_from(p).map(Command::Get)).typed(Str),
        Contract::new("set", 2, ANY, |p| Set::try_from(p).map(Command::Set)),
        Contract::new("setnx", 2, exactly(2), |p| Setnx::try_from(p).map(Command::Setnx)),
        Contract::new("getset", 2, exactly(2), |p| Getset::try_from(p).map(Command::Getset)).typed(Str),
        Contract::new("getdel", 1, exactly(1), |p| Getdel::try_from(p).map(Command::Getdel)).typed(Str),
        Contract::new("getex", 1, ANY, |p| Getex::try_from(p).map(Command::Getex)).typed(Str),
        Contract::new("incr", 1, exactly(1), |p| Incr::try_from(p).map(Command::Incr)).typed(Str),
        Contract::new("decr", 1, exactly(1), |p| Decr::try_from(p).map(Command::Decr)).typed(Str),
        Contract::new("incrby", 2, exactly(2), |p| IncrBy::try_from(p).map(Command::IncrBy)).typed(Str),
        Contract::new("decrby", 2, exactly(2), |p| DecrBy::try_from(p).map(Command::DecrBy)).typed(Str),
        Contract::new("incrbyfloat", 2, exactly(2), |p| {
            IncrByFloat::try_from(p).map(Command::IncrByFloat)
        })
        .typed(Str),
        Contract::new("mget", 1, ANY, |p| Mget::try_from(p).map(Command::Mget)),
        Contract::new("mset", 2, ANY, |p| Mset::try_from(p).map(Command::Mset)),
        Contract::new("msetnx", 2, ANY, |p| Msetnx::try_from(p).map(Command::Msetnx)),
        Contract::new("append", 2, exactly(2), |p| Append::try_from(p).map(Command::Append)).typed(Str),
        Contract::new("strlen", 1, exactly(1), |p| Strlen::try_from(p).map(Command::Strlen)).typed(Str),
        Contract::new("getrange", 3, exactly(3), |p| Getrange::try_from(p).map(Command::Getrange)).typed(Str),
        Contract::new("setrange", 3, exactly(3), |p| Setrange::try_from(p).map(Command::Setrange)).typed(Str),
        // Hashes
        Contract::new("hset", 3, ANY, |p| Hset::try_from(p).map(Command::Hset)).typed(Hash),
        Contract::new("hmset", 3, ANY, |p| Hset::multi(p).map(Command::Hset)).typed(Hash),
        Contract::new("hsetnx", 3, exactly(3), |p| Hsetnx::try_from(p).map(Command::Hsetnx)).typed(Hash),
        Contract::new("hget", 2, exactly(2), |p| Hget::try_from(p).map(Command::Hget)).typed(Hash),
        Contract::new("hmget", 2, ANY, |p| Hmget::try_from(p).map(Command::Hmget)).typed(Hash),
        Contract::new("hdel", 2, ANY, |p| Hdel::try_from(p).map(Command::Hdel)).typed(Hash),
        Contract::new("hexists", 2, exactly(2), |p| Hexists::try_from(p).map(Command::Hexists)).typed(Hash),
        Contract::new("hlen", 1, exactly(1), |p| Hlen::try_from(p).map(Command::Hlen)).typed(Hash),
        Contract::new("hkeys", 1, exactly(1), |p| Hkeys::try_from(p).map(Command::Hkeys)).typed(Hash),
        Contract::new("hvals", 1, exactly(1), |p| Hvals::try_from(p).map(Command::Hvals)).typed(Hash),
        Contract::new("hgetall", 1, exactly(1), |p| Hgetall::try_from(p).map(Command::Hgetall)).typed(Hash),
        Contract::new("hincrby", 3, exactly(3), |p| HincrBy::try_from(p).map(Command::HincrBy)).typed(Hash),
        // Lists
        Contract::new("lpush", 2, ANY, |p| Push::parse(p, End::Left, false).map(Command::Push)).typed(List),
        Contract::new("rpush", 2, ANY, |p| Push::parse(p, End::Right, false).map(Command::Push)).typed(List),
        Contract::new("lpushx", 2, ANY, |p| Push::parse(p, End::Left, true).map(Command::Push)).typed(List),
        Contract::new("rpushx", 2, ANY, |p| Push::parse(p, End::Right, true).map(Command::Push)).typed(List),
        Contract::new("lpop", 1, exactly(2), |p| Pop::parse(p, End::Left).map(Command::Pop)).typed(List),
        Contract::new("rpop", 1, exactly(2), |p| Pop::parse(p, End::Right).map(Command::Pop)).typed(List),
        Contract::new("lrange", 3, exactly(3), |p| Lrange::try_from(p).map(Command::Lrange)).typed(List),
        Contract::new("lindex", 2, exactly(2), |p| Lindex::try_from(p).map(Command::Lindex)).typed(List),
        Contract::new("lset", 3, exactly(3), |p| Lset::try_from(p).map(Command::Lset)).typed(List),
        Contract::new("lrem", 3, exactly(3), |p| Lrem::try_from(p).map(Command::Lrem)).typed(List),
        Contract::new("ltrim", 3, exactly(3), |p| Ltrim::try_from(p).map(Command::Ltrim)).typed(List),
        Contract::new("llen", 1, exactly(1), |p| Llen::try_from(p).map(Command::Llen)).typed(List),
        Contract::new("linsert", 4, exactly(4), |p| Linsert::try_from(p).map(Command::Linsert)).typed(List),
        Contract::new("rpoplpush", 2, exactly(2), |p| {
            Rpoplpush::try_from(p).map(Command::Rpoplpush)
        })
        .typed(List),
        Contract::new("blpop", 2, ANY, |p| BPop::parse(p, End::Left).map(Command::BPop)).typed(List),
        Contract::new("brpop", 2, ANY, |p| BPop::parse(p, End::Right).map(Command::BPop)).typed(List),
        Contract::new("brpoplpush", 3, exactly(3), |p| {
            Brpoplpush::try_from(p).map(Command::Brpoplpush)
        })
        .typed(List),
        // Sets
        Contract::new("sadd", 2, ANY, |p| Sadd::try_from(p).map(Command::Sadd)).typed(SetType),
        Contract::new("srem", 2, ANY, |p| Srem::try_from(p).map(Command::Srem)).typed(SetType),
        Contract::new("smembers", 1, exactly(1), |p| Smembers::try_from(p).map(Command::Smembers)).typed(SetType),
        Contract::new("sismember", 2, exactly(2), |p| {
            Sismember::try_from(p).map(Command::Sismember)
        })
        .typed(SetType),
        Contract::new("scard", 1, exactly(1), |p| Scard::try_from(p).map(Command::Scard)).typed(SetType),
        Contract::new("smove", 3, exactly(3), |p| Smove::try_from(p).map(Command::Smove)).typed(SetType),
        Contract::new("spop", 1, exactly(2), |p| Spop::try_from(p).map(Command::Spop)).typed(SetType),
        Contract::new("srandmember", 1, exactly(2), |p| {
            Srandmember::try_from(p).map(Command::Srandmember)
        })
        .typed(SetType),
        Contract::new("sinter", 1, ANY, |p| SetCombine::parse(p, SetOp::Inter).map(Command::SetCombine))
            .typed(SetType),
        Contract::new("sunion", 1, ANY, |p| SetCombine::parse(p, SetOp::Union).map(Command::SetCombine))
            .typed(SetType),
        Contract::new("sdiff", 1, ANY, |p| SetCombine::parse(p, SetOp::Diff).map(Command::SetCombine))
            .typed(SetType),
        Contract::new("sinterstore", 2, ANY, |p| {
            SetCombineStore::parse(p, SetOp::Inter).map(Command::SetCombineStore)
        }),
        Contract::new("sunionstore", 2, ANY, |p| {
            SetCombineStore::parse(p, SetOp::Union).map(Command::SetCombineStore)
        }),
        Contract::new("sdiffstore", 2, ANY, |p| {
            SetCombineStore::parse(p, SetOp::Diff).map(Command::SetCombineStore)
        }),
        // Sorted sets
        Contract::new("zadd", 3, ANY, |p| Zadd::try_from(p).map(Command::Zadd)).typed(SortedSet),
        Contract::new("zrange", 3, ANY, |p| Zrange::try_from(p).map(Command::Zrange)).typed(SortedSet),
        Contract::new("zrangebyscore", 3, ANY, |p| {
            Zrangebyscore::try_from(p).map(Command::Zrangebyscore)
        })
        .typed(SortedSet),
        Contract::new("zrank", 2, exactly(2), |p| Zrank::try_from(p).map(Command::Zrank)).typed(SortedSet),
        Contract::new("zscore", 2, exactly(2), |p| Zscore::try_from(p).map(Command::Zscore)).typed(SortedSet),
        Contract::new("zincrby", 3, exactly(3), |p| ZincrBy::try_from(p).map(Command::ZincrBy)).typed(SortedSet),
        Contract::new("zrem", 2, ANY, |p| Zrem::try_from(p).map(Command::Zrem)).typed(SortedSet),
        Contract::new("zcount", 3, exactly(3), |p| Zcount::try_from(p).map(Command::Zcount)).typed(SortedSet),
        Contract::new("zcard", 1, exactly(1), |p| Zcard::try_from(p).map(Command::Zcard)).typed(SortedSet),
        // Transactions
        Contract::new("multi", 0, exactly(0), |p| Multi::try_from(p).map(Command::Multi)).control(),
        Contract::new("exec", 0, exactly(0), |p| Exec::try_from(p).map(Command::Exec))
            .control()
            .exclusive(),
        Contract::new("discard", 0, exactly(0), |p| Discard::try_from(p).map(Command::Discard)).control(),
        // Pub/Sub
        Contract::new("subscribe", 1, ANY, |p| Subscribe::try_from(p).map(Command::Subscribe)).pubsub(),
        Contract::new("unsubscribe", 0, ANY, |p| {
            Unsubscribe::try_from(p).map(Command::Unsubscribe)
        })
        .pubsub(),
        Contract::new("psubscribe", 1, ANY, |p| Psubscribe::try_from(p).map(Command::Psubscribe)).pubsub(),
        Contract::new("punsubscribe", 0, ANY, |p| {
            Punsubscribe::try_from(p).map(Command::Punsubscribe)
        })
        .pubsub(),
        Contract::new("publish", 2, exactly(2), |p| Publish::try_from(p).map(Command::Publish)),
        Contract::new("pubsub", 1, ANY, |p| Pubsub::try_from(p).map(Command::Pubsub)),
        // Scripting
        Contract::new("eval", 2, ANY, |p| Eval::try_from(p).map(Command::Eval)).exclusive(),
        Contract::new("evalsha", 2, ANY, |p| Evalsha::try_from(p).map(Command::Evalsha)).exclusive(),
        Contract::new("script", 1, ANY, |p| Script::try_from(p).map(Command::Script)),
        // Server
        Contract::new("info", 0, ANY, |p| Info::try_from(p).map(Command::Info)),
        Contract::new("dbsize", 0, exactly(0), |p| DBSize::try_from(p).map(Command::DBSize)),
        Contract::new("flushdb", 0, exactly(1), |p| FlushDB::try_from(p).map(Command::FlushDB)),
        Contract::new("flushall", 0, exactly(1), |p| FlushAll::try_from(p).map(Command::FlushAll)),
        Contract::new("time", 0, exactly(0), |p| Time::try_from(p).map(Command::Time)),
        Contract::new("command", 0, ANY, |p| Command_::try_from(p).map(Command::Command)),
        Contract::new("config", 1, ANY, |p| Config::try_from(p).map(Command::Config)),
    ];

    contracts
        .into_iter()
        .map(|contract| (contract.name, contract))
        .collect()
});

/// Looks up a command by its lowercased name.
pub fn lookup(name: &str) -> Option<&'static Contract> {
    REGISTRY.get(name)
}

/// Every registered command, in no particular order.
pub fn contracts() -> impl Iterator<Item = &'static Contract> {
    REGISTRY.values()
}

impl TryFrom<Frame> for Command {
    type Error = CommandError;

    fn try_from(frame: Frame) -> Result<Self, Self::Error> {
        let request = Request::try_from(frame)?;
        let contract = lookup(&request.name).ok_or_else(|| CommandError::UnknownCommand {
            command: request.name.clone(),
        })?;
        contract.check_arity(request.args.len())?;

        let mut parser = CommandParser::new(request.args);
        (contract.parse)(&mut parser)
    }
}
