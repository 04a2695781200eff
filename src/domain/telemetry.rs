// Dotted-path lookup into a telemetry snapshot
//
// Leaves are rendered the way the viewer expects them: floats with six
// significant digits in C `%g` notation, integers in decimal, booleans as
// `0`/`1`, strings verbatim.

use core::fmt::{self, Write};
use heapless::{String, Vec};
use serde_json::Value;

/// Longest accepted key path in bytes
pub const MAX_KEY_LEN: usize = 63;

/// Upper bound on non-empty segments in a key of `MAX_KEY_LEN` bytes
pub const MAX_KEY_SEGMENTS: usize = MAX_KEY_LEN.div_ceil(2);

pub const SCRATCH_LEN: usize = 32;

/// Per-call formatting area for non-string leaves
pub type Scratch = String<SCRATCH_LEN>;

const SIGNIFICANT_DIGITS: i32 = 6;

/// Split a dotted key into its non-empty segments.
///
/// Returns `None` for empty keys and keys longer than [`MAX_KEY_LEN`].
pub fn split_key(dotted_key: &str) -> Option<Vec<&str, MAX_KEY_SEGMENTS>> {
    if dotted_key.is_empty() || dotted_key.len() > MAX_KEY_LEN {
        return None;
    }

    let mut segments = Vec::new();
    for segment in dotted_key.split('.').filter(|s| !s.is_empty()) {
        segments.push(segment).ok()?;
    }
    Some(segments)
}

/// Resolve `dotted_key` in `snapshot` and render the leaf as a string.
///
/// String leaves borrow from the snapshot; every other leaf is written into
/// `scratch`. Missing segments, non-object intermediates and leaves that are
/// arrays, objects or null all resolve to `None`.
pub fn resolve_key<'s>(
    snapshot: &'s Value,
    dotted_key: &str,
    scratch: &'s mut Scratch,
) -> Option<&'s str> {
    let segments = split_key(dotted_key)?;

    let mut node = snapshot;
    for segment in segments {
        node = node.as_object()?.get(segment)?;
    }

    scratch.clear();
    match node {
        Value::String(s) => Some(s.as_str()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                write!(scratch, "{i}").ok()?;
            } else if let Some(u) = n.as_u64() {
                write!(scratch, "{u}").ok()?;
            } else {
                write_general(scratch, n.as_f64()?).ok()?;
            }
            Some(scratch.as_str())
        }
        Value::Bool(b) => {
            scratch.push_str(if *b { "1" } else { "0" }).ok()?;
            Some(scratch.as_str())
        }
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Write `value` with six significant digits in `%g` style.
pub fn write_general<const N: usize>(out: &mut String<N>, value: f64) -> fmt::Result {
    if value.is_nan() {
        return out.write_str("nan");
    }
    if value.is_infinite() {
        return out.write_str(if value < 0.0 { "-inf" } else { "inf" });
    }
    if value == 0.0 {
        return out.write_str(if value.is_sign_negative() { "-0" } else { "0" });
    }

    // Round once in exponent form; the exponent decides the notation.
    let mut sci: String<SCRATCH_LEN> = String::new();
    write!(sci, "{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value)?;
    let (mantissa, exponent) = sci.split_once('e').ok_or(fmt::Error)?;
    let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;

    if !(-4..SIGNIFICANT_DIGITS).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(
            out,
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
        let mut fixed: String<SCRATCH_LEN> = String::new();
        write!(fixed, "{:.*}", decimals, value)?;
        out.write_str(trim_fraction(&fixed))
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}
