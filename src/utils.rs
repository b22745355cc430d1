//! Coercion helpers shared by record resolution and value sanitization.

/// Loose numeric coercion matching the host framework's `Number()` rules:
/// surrounding whitespace is ignored, the empty string coerces to zero, and
/// anything that fails to parse is NaN, represented here as `None`.
pub(crate) fn coerce_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(number) if !number.is_nan() => Some(number),
        _ => None,
    }
}

/// Id predicate applied to unclassified path segments. The empty string is
/// accepted because it coerces to zero under `coerce_number`; record
/// resolution preserves that behavior verbatim.
pub(crate) fn is_id_number(segment: &str) -> bool {
    coerce_number(segment).is_some()
}
