mod convert;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use convert::{from_wire, to_wire};

///
/// CONSTANTS
///

/// String label produced when a negative-infinity sentinel is decoded.
pub const INF_MIN_LABEL: &str = "INF_MIN";

/// String label produced when a positive-infinity sentinel is decoded.
pub const INF_MAX_LABEL: &str = "INF_MAX";

///
/// FieldType
///
/// Finite tagged representation of a declared field type, decided once at
/// schema-definition time. `Raw` is the explicit untyped-passthrough case;
/// it is a visible variant, not a silent default branch.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Bool,
    Timestamp,
    Binary,
    BigInt,
    Structured,
    Raw,
}

impl FieldType {
    /// Whether this type encodes on the wire as a 64-bit signed integer.
    ///
    /// This is the explicit "is integer" marker: the encoding is chosen by
    /// the declaration, never by runtime inspection of the value.
    #[must_use]
    pub const fn is_integer_encoded(self) -> bool {
        matches!(self, Self::Integer | Self::BigInt | Self::Timestamp)
    }
}

///
/// WireValue
///
/// The narrow cell-value model the store accepts on the network boundary,
/// plus the two reserved open-range sentinels used for boundary completion.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum WireValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    InfMin,
    InfMax,
}

impl WireValue {
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        matches!(self, Self::InfMin | Self::InfMax)
    }
}

///
/// Value
///
/// Application-level typed value. `Null` means "explicitly absent"; a field
/// simply missing from a [`Record`] is unmentioned, which marshalling
/// treats differently (skip vs. delete) per operation.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// Epoch milliseconds.
    Timestamp(i64),
    List(Vec<Self>),
    Map(BTreeMap<String, Self>),
}

/// Flat application record keyed by field name.
pub type Record = BTreeMap<String, Value>;

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) | Self::Timestamp(i) => Some(*i),
            _ => None,
        }
    }

    /// Bridge into the canonical JSON grammar used by structured fields.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) | Self::Timestamp(i) => serde_json::Value::from(*i),
            Self::Float(f) => {
                serde_json::Number::from_f64(*f).map_or(serde_json::Value::Null, Into::into)
            }
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Bytes(b) => serde_json::Value::Array(
                b.iter().map(|byte| serde_json::Value::from(*byte)).collect(),
            ),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Bridge back from the canonical JSON grammar.
    ///
    /// Integral JSON numbers become `Int`; anything else numeric becomes
    /// `Float`. Precision loss above 2^53 is accepted, not flagged.
    #[must_use]
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_i64().map_or_else(
                || Self::Float(n.as_f64().unwrap_or(f64::NAN)),
                Self::Int,
            ),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }
}

macro_rules! impl_from_for {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for! {
    bool    => Bool,
    i8      => Int,
    i16     => Int,
    i32     => Int,
    i64     => Int,
    u8      => Int,
    u16     => Int,
    u32     => Int,
    f32     => Float,
    f64     => Float,
    &str    => Text,
    String  => Text,
    Vec<u8> => Bytes,
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, Self>> for Value {
    fn from(entries: BTreeMap<String, Self>) -> Self {
        Self::Map(entries)
    }
}
