use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Provided JSON could not be canonicalized.
    #[error("invalid JSON structure: {0}")]
    InvalidStructure(String),
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// Value could not be converted to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Helper for building JSON paths during validation.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Encodes a JSON value as canonical bytes.
///
/// The canonical form is the hashing preimage shared by every implementation
/// of the protocol:
/// - object members are sorted by the UTF-8 bytes of their keys
/// - no whitespace outside of strings; `,` and `:` as separators
/// - strings are emitted as raw UTF-8; only `"`, `\` and control characters
///   are escaped
/// - integers keep every digit of their source text; floats take their
///   shortest round-trip digits, in exponent form (`1.5e-07`, `1e+16`)
///   below `1e-4` or from `1e16` upwards
///
/// # Example
///
/// ```rust
/// use vp_canonical::canonical_json;
/// use serde_json::json;
///
/// let bytes = canonical_json(&json!({"b": 1, "a": {"nested": "é"}}))?;
/// assert_eq!(bytes, r#"{"a":{"nested":"é"},"b":1}"#.as_bytes());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn canonical_json(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    validate(value, Path::root())?;
    let mut out = Vec::new();
    write_value(value, &mut out)?;
    Ok(out)
}

/// Canonical encoding as a `String`.
pub fn canonical_json_string(value: &Value) -> Result<String, CanonicalizationError> {
    let bytes = canonical_json(value)?;
    String::from_utf8(bytes)
        .map_err(|e| CanonicalizationError::InvalidStructure(format!("invalid UTF-8: {}", e)))
}

/// Serializes any value and returns its canonical bytes.
pub fn canonical_bytes_of<T: Serialize>(value: &T) -> Result<Vec<u8>, CanonicalizationError> {
    let value = serde_json::to_value(value)?;
    canonical_json(&value)
}

fn validate(value: &Value, path: Path) -> Result<(), CanonicalizationError> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                validate(child, path.push_field(key))?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                validate(item, path.push_index(idx))?;
            }
            Ok(())
        }
        Value::Number(num) if is_integer_token(&num.to_string()) => Ok(()),
        Value::Number(num) => match num.as_f64() {
            Some(f) if !f.is_finite() => Err(CanonicalizationError::NonFiniteNumber(path.to_string())),
            _ => Ok(()),
        },
        Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
    }
}

fn write_value(value: &Value, out: &mut Vec<u8>) -> Result<(), CanonicalizationError> {
    match value {
        Value::Object(map) => write_object(map, out)?,
        Value::Array(items) => {
            out.push(b'[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(b',');
                }
                write_value(item, out)?;
            }
            out.push(b']');
        }
        Value::String(s) => serde_json::to_writer(&mut *out, s)?,
        Value::Number(n) => write_number(n, out),
        Value::Bool(b) => out.extend_from_slice(if *b { b"true" } else { b"false" }),
        Value::Null => out.extend_from_slice(b"null"),
    }
    Ok(())
}

/// Integer tokens keep every digit; floats use the shortest round-trip
/// digits, switching to exponent form outside `1e-4 <= |x| < 1e16`.
fn write_number(number: &Number, out: &mut Vec<u8>) {
    let token = number.to_string();
    if is_integer_token(&token) {
        let digits = token.trim_start_matches('-');
        if digits.bytes().all(|b| b == b'0') {
            out.push(b'0');
        } else {
            out.extend_from_slice(token.as_bytes());
        }
        return;
    }
    match number.as_f64() {
        Some(f) => out.extend_from_slice(format_float(f).as_bytes()),
        None => out.extend_from_slice(token.as_bytes()),
    }
}

fn is_integer_token(token: &str) -> bool {
    !token.contains(['.', 'e', 'E'])
}

fn format_float(f: f64) -> String {
    // `{:e}` yields the shortest digits that round-trip, e.g. `1.5e-7`.
    let scientific = format!("{:e}", f.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let sign = if f.is_sign_negative() { "-" } else { "" };
    // Position of the decimal point relative to the first digit.
    let point = exponent + 1;

    if point > -4 && point <= 16 {
        let body = if point <= 0 {
            format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
        } else if point as usize >= digits.len() {
            format!("{}{}.0", digits, "0".repeat(point as usize - digits.len()))
        } else {
            let (whole, fraction) = digits.split_at(point as usize);
            format!("{}.{}", whole, fraction)
        };
        return format!("{}{}", sign, body);
    }

    let (lead, rest) = digits.split_at(1);
    let mantissa = if rest.is_empty() {
        lead.to_string()
    } else {
        format!("{}.{}", lead, rest)
    };
    let exponent_sign = if exponent < 0 { '-' } else { '+' };
    format!("{}{}e{}{:02}", sign, mantissa, exponent_sign, exponent.unsigned_abs())
}

fn write_object(map: &Map<String, Value>, out: &mut Vec<u8>) -> Result<(), CanonicalizationError> {
    // Map iteration order depends on serde_json features; sort explicitly.
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    out.push(b'{');
    for (idx, (key, child)) in entries.into_iter().enumerate() {
        if idx > 0 {
            out.push(b',');
        }
        serde_json::to_writer(&mut *out, key)?;
        out.push(b':');
        write_value(child, out)?;
    }
    out.push(b'}');
    Ok(())
}
