//! Ordered and hashable views over JSON scalars.
//!
//! Arrays arriving over HTTP are `serde_json::Value`s. A [`Comparable`] keeps
//! the original value (so responses echo `3` as `3`, not `3.0`) next to a key
//! that defines the ordering used by the algorithms. A [`NodeId`] does the
//! same for graph nodes, with equality and hashing instead of ordering.

use crate::error::AlgoError;
use serde::Deserialize;
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Integers keep their exact value; only non-integral JSON numbers are floats.
#[derive(Debug, Clone)]
enum Key {
    Integer(i128),
    Float(f64),
    Text(String),
}

/// Kind of a comparable value. Only values of the same kind may be mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Text,
}

impl ValueKind {
    fn name(self) -> &'static str {
        match self {
            ValueKind::Number => "number",
            ValueKind::Text => "string",
        }
    }
}

/// A JSON number or string with a total order.
#[derive(Debug, Clone)]
pub struct Comparable {
    value: Value,
    key: Key,
}

impl Comparable {
    /// Wrap a single JSON value. Fails for booleans, nulls, arrays and objects.
    pub fn new(value: Value) -> Result<Self, AlgoError> {
        let key = match &value {
            Value::Number(n) => match (exact_integer(n), n.as_f64()) {
                (Some(i), _) => Key::Integer(i),
                // `+ 0.0` folds -0.0 into 0.0 so both equal the integer 0.
                (None, Some(f)) => Key::Float(f + 0.0),
                (None, None) => {
                    return Err(AlgoError::Incomparable(format!(
                        "number {n} has no numeric ordering"
                    )));
                }
            },
            Value::String(s) => Key::Text(s.clone()),
            other => {
                return Err(AlgoError::Incomparable(format!(
                    "{} values cannot be ordered",
                    json_type_name(other)
                )));
            }
        };
        Ok(Self { value, key })
    }

    /// Wrap every element of a sequence, requiring a single kind throughout.
    pub fn collect(values: &[Value]) -> Result<Vec<Self>, AlgoError> {
        let items = values
            .iter()
            .cloned()
            .map(Self::new)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(first) = items.first() {
            let kind = first.kind();
            if let Some(odd) = items.iter().find(|c| c.kind() != kind) {
                return Err(mixed_kinds(kind, odd.kind()));
            }
        }

        Ok(items)
    }

    /// Reject a target whose kind differs from the elements it is searched in.
    pub fn ensure_same_kind(&self, elements: &[Comparable]) -> Result<(), AlgoError> {
        match elements.first() {
            Some(first) if first.kind() != self.kind() => {
                Err(mixed_kinds(first.kind(), self.kind()))
            }
            _ => Ok(()),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self.key {
            Key::Integer(_) | Key::Float(_) => ValueKind::Number,
            Key::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl PartialEq for Comparable {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Comparable {}

impl PartialOrd for Comparable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Comparable {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.key, &other.key) {
            (Key::Integer(a), Key::Integer(b)) => a.cmp(b),
            (Key::Float(a), Key::Float(b)) => a.total_cmp(b),
            (Key::Integer(a), Key::Float(b)) => cmp_integer_float(*a, *b),
            (Key::Float(a), Key::Integer(b)) => cmp_integer_float(*b, *a).reverse(),
            (Key::Text(a), Key::Text(b)) => a.cmp(b),
            // Never reached for validated inputs; keeps the order total.
            (Key::Text(_), _) => Ordering::Greater,
            (_, Key::Text(_)) => Ordering::Less,
        }
    }
}

/// A graph node identifier: any JSON scalar.
///
/// Object keys always arrive as strings, so `"1"` and `1` are different
/// nodes. Integral floats are the same node as the integer (`2.0 == 2`).
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "Value")]
pub struct NodeId {
    value: Value,
    key: NodeKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum NodeKey {
    Null,
    Bool(bool),
    Integer(i128),
    /// Bit pattern of a non-integral float.
    Float(u64),
    Text(String),
}

impl NodeId {
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl TryFrom<Value> for NodeId {
    type Error = AlgoError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let key = match &value {
            Value::Null => NodeKey::Null,
            Value::Bool(b) => NodeKey::Bool(*b),
            Value::Number(n) => match (exact_integer(n), n.as_f64()) {
                (Some(i), _) => NodeKey::Integer(i),
                (None, Some(f)) if f.fract() == 0.0 && f.abs() < I128_BOUND => {
                    NodeKey::Integer(f as i128)
                }
                (None, Some(f)) => NodeKey::Float(f.to_bits()),
                (None, None) => NodeKey::Text(n.to_string()),
            },
            Value::String(s) => NodeKey::Text(s.clone()),
            other => {
                return Err(AlgoError::Validation(format!(
                    "{} values cannot be graph nodes",
                    json_type_name(other)
                )));
            }
        };
        Ok(Self { value, key })
    }
}

impl PartialEq for NodeId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for NodeId {}

impl Hash for NodeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// 2^127: every finite float strictly inside ±this bound fits in an `i128`.
const I128_BOUND: f64 = 170141183460469231731687303715884105728.0;

fn exact_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Exact comparison of an integer with a finite float, without rounding the
/// integer through `f64`.
fn cmp_integer_float(i: i128, f: f64) -> Ordering {
    let floor = f.floor();
    if floor < -I128_BOUND {
        return Ordering::Greater;
    }
    if floor >= I128_BOUND {
        return Ordering::Less;
    }
    match i.cmp(&(floor as i128)) {
        Ordering::Equal if f > floor => Ordering::Less,
        ordering => ordering,
    }
}

fn mixed_kinds(expected: ValueKind, found: ValueKind) -> AlgoError {
    AlgoError::Incomparable(format!(
        "cannot compare {} with {}",
        expected.name(),
        found.name()
    ))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
