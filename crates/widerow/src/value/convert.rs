//! Bidirectional conversion between application values and store cells.
//!
//! Both directions are total over their useful domain: absent/unknown input
//! yields `None` (field omitted) rather than an error, because row-level
//! marshalling runs over a superset of fields (partial update payloads).

use crate::value::{FieldType, INF_MAX_LABEL, INF_MIN_LABEL, Value, WireValue};

/// Convert an application value to its wire cell for the declared type.
///
/// Returns `None` when the field should be omitted from the request: a
/// `Null` input, or a present value whose shape cannot satisfy the declared
/// type. Float fields never fail this way; non-numeric input coerces to
/// `NaN` (callers validate upstream).
#[must_use]
pub fn to_wire(value: &Value, ty: FieldType) -> Option<WireValue> {
    if value.is_null() {
        return None;
    }

    match ty {
        FieldType::Text => match value {
            Value::Text(s) => Some(WireValue::Text(s.clone())),
            _ => None,
        },
        FieldType::Integer | FieldType::BigInt => to_wire_int(value),
        FieldType::Float => Some(WireValue::Float(coerce_f64(value))),
        FieldType::Bool => match value {
            Value::Bool(b) => Some(WireValue::Bool(*b)),
            _ => None,
        },
        FieldType::Timestamp => match value {
            Value::Timestamp(ms) | Value::Int(ms) => Some(WireValue::Int(*ms)),
            Value::Float(f) => Some(WireValue::Int(*f as i64)),
            _ => None,
        },
        FieldType::Binary => match value {
            Value::Bytes(b) => Some(WireValue::Bytes(b.clone())),
            _ => None,
        },
        FieldType::Structured => {
            // Any non-null value serializes through the canonical JSON text
            // grammar; the inverse parses with the same grammar.
            serde_json::to_string(&value.to_json())
                .ok()
                .map(WireValue::Text)
        }
        FieldType::Raw => to_wire_raw(value),
    }
}

/// Convert a wire cell back to an application value for the declared type.
///
/// The inverse never fails: a cell that does not fit the declaration passes
/// through on the raw path unchanged, and the open-range sentinels decode to
/// their string labels rather than attempting a typed decode.
#[must_use]
pub fn from_wire(wire: &WireValue, ty: FieldType) -> Option<Value> {
    match wire {
        WireValue::InfMin => return Some(Value::Text(INF_MIN_LABEL.to_string())),
        WireValue::InfMax => return Some(Value::Text(INF_MAX_LABEL.to_string())),
        _ => {}
    }

    match (ty, wire) {
        (FieldType::Text, WireValue::Text(s)) => Some(Value::Text(s.clone())),
        (FieldType::Integer | FieldType::BigInt, WireValue::Int(i)) => Some(Value::Int(*i)),
        (FieldType::Float, WireValue::Float(f)) => Some(Value::Float(*f)),
        (FieldType::Float, WireValue::Int(i)) => Some(Value::Float(*i as f64)),
        (FieldType::Bool, WireValue::Bool(b)) => Some(Value::Bool(*b)),
        (FieldType::Timestamp, WireValue::Int(ms)) => Some(Value::Timestamp(*ms)),
        (FieldType::Binary, WireValue::Bytes(b)) => Some(Value::Bytes(b.clone())),
        (FieldType::Structured, WireValue::Text(s)) => Some(
            // A parse failure leaves the raw wire text unchanged.
            serde_json::from_str::<serde_json::Value>(s)
                .map_or_else(|_| Value::Text(s.clone()), Value::from_json),
        ),
        // Declared-type mismatch or explicit Raw: pass the cell through.
        (_, wire) => Some(from_wire_raw(wire)),
    }
}

fn to_wire_int(value: &Value) -> Option<WireValue> {
    match value {
        Value::Int(i) | Value::Timestamp(i) => Some(WireValue::Int(*i)),
        Value::Float(f) => Some(WireValue::Int(*f as i64)),
        Value::Text(s) => s.parse::<i64>().ok().map(WireValue::Int),
        _ => None,
    }
}

// Numeric coercion for float-declared fields. Mirrors the lenient store
// contract: non-numeric input becomes NaN, never an error.
fn coerce_f64(value: &Value) -> f64 {
    match value {
        Value::Float(f) => *f,
        Value::Int(i) | Value::Timestamp(i) => *i as f64,
        Value::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn to_wire_raw(value: &Value) -> Option<WireValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(WireValue::Bool(*b)),
        Value::Int(i) | Value::Timestamp(i) => Some(WireValue::Int(*i)),
        Value::Float(f) => Some(WireValue::Float(*f)),
        Value::Text(s) => Some(WireValue::Text(s.clone())),
        Value::Bytes(b) => Some(WireValue::Bytes(b.clone())),
        Value::List(_) | Value::Map(_) => serde_json::to_string(&value.to_json())
            .ok()
            .map(WireValue::Text),
    }
}

fn from_wire_raw(wire: &WireValue) -> Value {
    match wire {
        WireValue::Text(s) => Value::Text(s.clone()),
        WireValue::Int(i) => Value::Int(*i),
        WireValue::Float(f) => Value::Float(*f),
        WireValue::Bool(b) => Value::Bool(*b),
        WireValue::Bytes(b) => Value::Bytes(b.clone()),
        WireValue::InfMin | WireValue::InfMax => Value::Null,
    }
}
