//! Typed leaf values.

use std::cmp::Ordering;
use std::fmt;

/// The value carried by a leaf node or a list key leaf.
///
/// Values are totally ordered so that list keys built from them can be used as
/// map keys. Decimals compare with [`f64::total_cmp`].
#[derive(Clone, Debug, Default)]
pub enum LeafValue {
    /// The YANG `empty` type: present, no value.
    #[default]
    Empty,
    /// Boolean value.
    Bool(bool),
    /// Signed integer (int8 through int64).
    Int(i64),
    /// Unsigned integer (uint8 through uint64).
    Uint(u64),
    /// Decimal value.
    Decimal(f64),
    /// UTF-8 string (also used for enumerations and identities).
    String(String),
}

impl LeafValue {
    fn rank(&self) -> u8 {
        match self {
            LeafValue::Empty => 0,
            LeafValue::Bool(_) => 1,
            LeafValue::Int(_) => 2,
            LeafValue::Uint(_) => 3,
            LeafValue::Decimal(_) => 4,
            LeafValue::String(_) => 5,
        }
    }

    /// Check if this is the empty value.
    pub fn is_empty(&self) -> bool {
        matches!(self, LeafValue::Empty)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LeafValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LeafValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a signed integer, converting unsigned values that fit.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            LeafValue::Int(i) => Some(*i),
            LeafValue::Uint(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Get the value as an unsigned integer, converting signed values that fit.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            LeafValue::Uint(u) => Some(*u),
            LeafValue::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl PartialEq for LeafValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LeafValue {}

impl PartialOrd for LeafValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LeafValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (LeafValue::Empty, LeafValue::Empty) => Ordering::Equal,
            (LeafValue::Bool(a), LeafValue::Bool(b)) => a.cmp(b),
            (LeafValue::Int(a), LeafValue::Int(b)) => a.cmp(b),
            (LeafValue::Uint(a), LeafValue::Uint(b)) => a.cmp(b),
            (LeafValue::Decimal(a), LeafValue::Decimal(b)) => a.total_cmp(b),
            (LeafValue::String(a), LeafValue::String(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for LeafValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafValue::Empty => Ok(()),
            LeafValue::Bool(b) => write!(f, "{}", b),
            LeafValue::Int(i) => write!(f, "{}", i),
            LeafValue::Uint(u) => write!(f, "{}", u),
            LeafValue::Decimal(d) => write!(f, "{}", d),
            LeafValue::String(s) => write!(f, "{}", s),
        }
    }
}

// Conversion from common types

impl From<bool> for LeafValue {
    fn from(v: bool) -> Self {
        LeafValue::Bool(v)
    }
}

impl From<i64> for LeafValue {
    fn from(v: i64) -> Self {
        LeafValue::Int(v)
    }
}

impl From<i32> for LeafValue {
    fn from(v: i32) -> Self {
        LeafValue::Int(v as i64)
    }
}

impl From<u64> for LeafValue {
    fn from(v: u64) -> Self {
        LeafValue::Uint(v)
    }
}

impl From<u32> for LeafValue {
    fn from(v: u32) -> Self {
        LeafValue::Uint(v as u64)
    }
}

impl From<f64> for LeafValue {
    fn from(v: f64) -> Self {
        LeafValue::Decimal(v)
    }
}

impl From<String> for LeafValue {
    fn from(v: String) -> Self {
        LeafValue::String(v)
    }
}

impl From<&str> for LeafValue {
    fn from(v: &str) -> Self {
        LeafValue::String(v.to_string())
    }
}
