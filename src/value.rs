use bytes::Bytes;
use ordered_float::OrderedFloat;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::ops::Bound;
use strum_macros::{AsRefStr, Display, EnumString};

/// The type tag of a stored value, as reported by `TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum DataType {
    String,
    List,
    Set,
    #[strum(serialize = "zset")]
    SortedSet,
    Hash,
}

pub type List = VecDeque<Bytes>;
pub type Set = HashSet<Bytes>;
pub type Hash = HashMap<Bytes, Bytes>;

#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    String(Bytes),
    List(List),
    Set(Set),
    SortedSet(SortedSet),
    Hash(Hash),
}

impl Data {
    pub fn data_type(&self) -> DataType {
        match self {
            Data::String(_) => DataType::String,
            Data::List(_) => DataType::List,
            Data::Set(_) => DataType::Set,
            Data::SortedSet(_) => DataType::SortedSet,
            Data::Hash(_) => DataType::Hash,
        }
    }

    /// Strings are never "empty containers": an empty string is a perfectly valid value.
    pub fn is_empty_container(&self) -> bool {
        match self {
            Data::String(_) => false,
            Data::List(list) => list.is_empty(),
            Data::Set(set) => set.is_empty(),
            Data::SortedSet(zset) => zset.is_empty(),
            Data::Hash(hash) => hash.is_empty(),
        }
    }
}

/// A stored value together with its absolute expiration, in milliseconds since the unix epoch.
/// The TTL lives on the value itself so that it travels along with RENAME and MOVE.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub data: Data,
    pub expires_at: Option<u64>,
}

impl Value {
    pub fn new(data: Data) -> Value {
        Value {
            data,
            expires_at: None,
        }
    }

    pub fn with_expiration(data: Data, expires_at: Option<u64>) -> Value {
        Value { data, expires_at }
    }

    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

impl From<Bytes> for Value {
    fn from(data: Bytes) -> Self {
        Value::new(Data::String(data))
    }
}

/// Projection between `Data` and the concrete container for one type tag. Lets the keyspace
/// expose typed accessors without a function per type.
pub trait Container: Default + Sized {
    const TYPE: DataType;

    fn from_data(data: &Data) -> Option<&Self>;
    fn from_data_mut(data: &mut Data) -> Option<&mut Self>;
    fn into_data(self) -> Data;
}

macro_rules! container {
    ($ty:ty, $variant:ident) => {
        impl Container for $ty {
            const TYPE: DataType = DataType::$variant;

            fn from_data(data: &Data) -> Option<&Self> {
                match data {
                    Data::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_data_mut(data: &mut Data) -> Option<&mut Self> {
                match data {
                    Data::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn into_data(self) -> Data {
                Data::$variant(self)
            }
        }
    };
}

container!(Bytes, String);
container!(List, List);
container!(Set, Set);
container!(SortedSet, SortedSet);
container!(Hash, Hash);

type Score = OrderedFloat<f64>;

/// A set of unique members ordered by `(score, member)`. Ties in score are broken
/// lexicographically, matching Redis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedSet {
    sorted: BTreeSet<(Score, Bytes)>,
    scores: HashMap<Bytes, Score>,
}

/// Inclusive or exclusive score bound, as accepted by ZCOUNT and ZRANGEBYSCORE (`(1.5`, `-inf`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreBound {
    Inclusive(f64),
    Exclusive(f64),
}

impl ScoreBound {
    fn admits_lower(&self, score: f64) -> bool {
        match *self {
            ScoreBound::Inclusive(min) => score >= min,
            ScoreBound::Exclusive(min) => score > min,
        }
    }

    fn admits_upper(&self, score: f64) -> bool {
        match *self {
            ScoreBound::Inclusive(max) => score <= max,
            ScoreBound::Exclusive(max) => score < max,
        }
    }

    fn value(&self) -> f64 {
        match *self {
            ScoreBound::Inclusive(v) | ScoreBound::Exclusive(v) => v,
        }
    }
}

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or updates `member`. Returns `true` when the member is new.
    pub fn insert(&mut self, member: Bytes, score: f64) -> bool {
        let score = OrderedFloat(score);
        match self.scores.insert(member.clone(), score) {
            Some(old) => {
                self.sorted.remove(&(old, member.clone()));
                self.sorted.insert((score, member));
                false
            }
            None => {
                self.sorted.insert((score, member));
                true
            }
        }
    }

    pub fn remove(&mut self, member: &[u8]) -> bool {
        match self.scores.remove_entry(member) {
            Some((member, score)) => {
                self.sorted.remove(&(score, member));
                true
            }
            None => false,
        }
    }

    pub fn score(&self, member: &[u8]) -> Option<f64> {
        self.scores.get(member).map(|score| score.0)
    }

    pub fn rank(&self, member: &[u8]) -> Option<usize> {
        let score = *self.scores.get(member)?;
        let member = Bytes::copy_from_slice(member);
        Some(self.sorted.range(..(score, member)).count())
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&Bytes, f64)> {
        self.sorted.iter().map(|(score, member)| (member, score.0))
    }

    /// Members whose score falls within `[min, max]`, honouring exclusive bounds.
    pub fn range_by_score(
        &self,
        min: ScoreBound,
        max: ScoreBound,
    ) -> impl Iterator<Item = (&Bytes, f64)> {
        let start = OrderedFloat(min.value());
        self.sorted
            .range((Bound::Included((start, Bytes::new())), Bound::Unbounded))
            .map(|(score, member)| (member, score.0))
            .skip_while(move |(_, score)| !min.admits_lower(*score))
            .take_while(move |(_, score)| max.admits_upper(*score))
    }

    pub fn count(&self, min: ScoreBound, max: ScoreBound) -> usize {
        self.range_by_score(min, max).count()
    }
}
