//! Payload normalization.
//!
//! Device relays report readings in several shapes: the primary backend wraps
//! them in `{ "datos": [ { "valor": .. }, .. ] }` records, others use flat
//! `{ "<quantity>": .. }` objects with varying key spellings, and a bare
//! event stream may carry nothing but a numeric literal. [`normalize`]
//! collapses all of them into one `f64` or reports that no reading is
//! present.

use serde_json::Value;

use crate::Quantity;

/// Extract a numeric reading for `quantity` from a raw payload.
///
/// Candidate shapes are tried in fixed priority order:
///
/// 1. `raw.datos[0].valor` — the primary backend format
/// 2. `raw[key]` for each of the quantity's synonym keys
/// 3. `raw` itself, if directly numeric
///
/// The first candidate that converts to a finite number wins. Strings are
/// parsed; NaN and infinities are rejected. `None` means "no reading this
/// cycle" and must not be treated as a failure by callers.
pub fn normalize(raw: &Value, quantity: Quantity) -> Option<f64> {
    if let Some(v) = raw
        .get("datos")
        .and_then(Value::as_array)
        .and_then(|records| records.first())
        .and_then(|record| record.get("valor"))
    {
        if let Some(n) = coerce(v) {
            return Some(n);
        }
    }

    for &key in quantity.synonyms() {
        if let Some(n) = raw.get(key).and_then(coerce) {
            return Some(n);
        }
    }

    coerce(raw)
}

/// Convert a JSON value to a finite f64, parsing strings if needed.
fn coerce(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
