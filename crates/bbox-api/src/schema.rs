// Declarative record shapes and the single validator that interprets them.
//
// Each record type publishes a static `Schema` (field name, kind, required or
// optional, bounds, nested shape). `validate` walks a normalized JSON object
// against it, coercing lax router values into canonical JSON and collecting
// every violation instead of stopping at the first one. The canonical output
// is what the typed records deserialize from.

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use thiserror::Error;

// ── Shape description ────────────────────────────────────────────────

/// The shape of one JSON object.
#[derive(Debug)]
pub struct Schema {
    /// Record name used in error messages.
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One named field of a [`Schema`].
#[derive(Debug)]
pub struct Field {
    /// Key as it appears on the wire.
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
    /// Text that needs Latin-1/UTF-8 mojibake repair during normalization.
    pub repair: bool,
}

impl Field {
    pub const fn required(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: true,
            repair: false,
        }
    }

    pub const fn optional(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: false,
            repair: false,
        }
    }

    pub const fn repaired(mut self) -> Self {
        self.repair = true;
        self
    }
}

/// Value kinds understood by the validator.
#[derive(Debug)]
pub enum Kind {
    /// Integer with optional inclusive bounds.
    Int { min: Option<i64>, max: Option<i64> },
    Bool,
    Str,
    /// Timestamp, emitted as RFC 3339.
    DateTime,
    Object(&'static Schema),
    /// Ordered collection. Absent or null becomes an empty array.
    List(&'static Kind),
}

impl Kind {
    /// Unbounded integer.
    pub const INT: Self = Self::Int {
        min: None,
        max: None,
    };
    /// Non-negative counter.
    pub const COUNTER: Self = Self::Int {
        min: Some(0),
        max: None,
    };
    /// Percentage in `0..=100`.
    pub const PERCENT: Self = Self::Int {
        min: Some(0),
        max: Some(100),
    };
}

// ── Violations ───────────────────────────────────────────────────────

/// What was wrong with a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    Missing,
    ExpectedObject,
    ExpectedArray,
    ExpectedInteger(String),
    ExpectedBool(String),
    ExpectedString(String),
    ExpectedDateTime(String),
    BelowMinimum { min: i64, value: i128 },
    AboveMaximum { max: i64, value: i128 },
    /// Shape matched but the typed record still could not be built.
    Malformed(String),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("field required"),
            Self::ExpectedObject => f.write_str("expected an object"),
            Self::ExpectedArray => f.write_str("expected an array"),
            Self::ExpectedInteger(got) => write!(f, "expected an integer, got {got}"),
            Self::ExpectedBool(got) => write!(f, "expected a boolean, got {got}"),
            Self::ExpectedString(got) => write!(f, "expected a string, got {got}"),
            Self::ExpectedDateTime(got) => write!(f, "expected a timestamp, got {got}"),
            Self::BelowMinimum { min, value } => write!(f, "{value} is below the minimum of {min}"),
            Self::AboveMaximum { max, value } => write!(f, "{value} exceeds the maximum of {max}"),
            Self::Malformed(msg) => write!(f, "malformed record: {msg}"),
        }
    }
}

/// A violated field, addressed by its dotted path (`rx.occupation`,
/// `ip6address[1].lastseen`). The empty path is the record itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub problem: Problem,
}

impl Violation {
    pub fn new(path: impl Into<String>, problem: Problem) -> Self {
        Self {
            path: path.into(),
            problem,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.problem)
        } else {
            write!(f, "{}: {}", self.path, self.problem)
        }
    }
}

/// Every field of a response that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{record} validation failed ({} invalid field(s)): {}", .violations.len(), join(.violations))]
pub struct ValidationError {
    pub record: &'static str,
    pub violations: Vec<Violation>,
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn single(record: &'static str, path: impl Into<String>, problem: Problem) -> Self {
        Self {
            record,
            violations: vec![Violation::new(path, problem)],
        }
    }

    /// Qualify every path with `prefix`, e.g. the envelope the record came from.
    #[must_use]
    pub fn prefixed(mut self, prefix: &str) -> Self {
        for violation in &mut self.violations {
            violation.path = join_path(prefix, &violation.path);
        }
        self
    }

    /// Whether any violation sits exactly at `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.path.as_str())
    }
}

pub(crate) fn join_path(parent: &str, child: &str) -> String {
    match (parent.is_empty(), child.is_empty()) {
        (true, _) => child.to_owned(),
        (false, true) => parent.to_owned(),
        (false, false) if child.starts_with('[') => format!("{parent}{child}"),
        (false, false) => format!("{parent}.{child}"),
    }
}

// ── Validation ───────────────────────────────────────────────────────

/// Validate `value` against `schema`.
///
/// On success returns a canonical JSON object: numbers and booleans coerced
/// to their declared kind, timestamps in RFC 3339, absent optional fields as
/// `null`, absent collections as `[]`. Keys the schema does not know are
/// passed through untouched.
pub fn validate(value: &Value, schema: &'static Schema) -> Result<Value, ValidationError> {
    let mut violations = Vec::new();
    let canonical = validate_object(value, schema, "", &mut violations);

    if violations.is_empty() {
        Ok(canonical)
    } else {
        Err(ValidationError {
            record: schema.name,
            violations,
        })
    }
}

fn validate_object(
    value: &Value,
    schema: &'static Schema,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Value {
    let Some(map) = value.as_object() else {
        violations.push(Violation::new(path, Problem::ExpectedObject));
        return Value::Null;
    };

    let mut out: Map<String, Value> = map
        .iter()
        .filter(|(key, _)| schema.field(key).is_none())
        .map(|(key, v)| (key.clone(), v.clone()))
        .collect();

    for field in schema.fields {
        let field_path = join_path(path, field.name);
        let canonical = match map.get(field.name) {
            None | Some(Value::Null) => {
                if matches!(field.kind, Kind::List(_)) {
                    Value::Array(Vec::new())
                } else if field.required {
                    violations.push(Violation::new(field_path, Problem::Missing));
                    continue;
                } else {
                    Value::Null
                }
            }
            Some(raw) => match validate_value(raw, &field.kind, &field_path, violations) {
                Some(v) => v,
                None => continue,
            },
        };
        out.insert(field.name.to_owned(), canonical);
    }

    Value::Object(out)
}

/// Coerce a single present value. Returns `None` when a violation was recorded.
fn validate_value(
    raw: &Value,
    kind: &Kind,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Option<Value> {
    let result = match kind {
        Kind::Int { min, max } => coerce_int(raw).and_then(|n| check_bounds(n, *min, *max)),
        Kind::Bool => coerce_bool(raw),
        Kind::Str => coerce_str(raw),
        Kind::DateTime => coerce_datetime(raw),
        Kind::Object(schema) => {
            let before = violations.len();
            let nested = validate_object(raw, schema, path, violations);
            return (violations.len() == before).then_some(nested);
        }
        Kind::List(item) => {
            let Some(items) = raw.as_array() else {
                violations.push(Violation::new(path, Problem::ExpectedArray));
                return None;
            };
            let before = violations.len();
            let out: Vec<Value> = items
                .iter()
                .enumerate()
                .filter_map(|(i, v)| {
                    let item_path = format!("{path}[{i}]");
                    match v {
                        Value::Null => {
                            violations.push(Violation::new(item_path, Problem::Missing));
                            None
                        }
                        _ => validate_value(v, item, &item_path, violations),
                    }
                })
                .collect();
            return (violations.len() == before).then_some(Value::Array(out));
        }
    };

    match result {
        Ok(v) => Some(v),
        Err(problem) => {
            violations.push(Violation::new(path, problem));
            None
        }
    }
}

fn describe(raw: &Value) -> String {
    match raw {
        Value::String(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}

/// Every integer some 64-bit record field (signed or unsigned) can hold.
fn int_range() -> RangeInclusive<i128> {
    i128::from(i64::MIN)..=i128::from(u64::MAX)
}

fn coerce_int(raw: &Value) -> Result<i128, Problem> {
    let parsed = match raw {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| n.as_f64().and_then(integral_float)),
        Value::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| int_range().contains(n))
        .ok_or_else(|| Problem::ExpectedInteger(describe(raw)))
}

/// `42.0` is an integer, `42.5` is not. Out-of-range values saturate and are
/// rejected by the range check afterwards.
#[allow(clippy::float_cmp, clippy::cast_possible_truncation, clippy::as_conversions)]
fn integral_float(f: f64) -> Option<i128> {
    (f.is_finite() && f.fract() == 0.0).then(|| f as i128)
}

fn check_bounds(value: i128, min: Option<i64>, max: Option<i64>) -> Result<Value, Problem> {
    if let Some(min) = min.filter(|m| value < i128::from(*m)) {
        return Err(Problem::BelowMinimum { min, value });
    }
    if let Some(max) = max.filter(|m| value > i128::from(*m)) {
        return Err(Problem::AboveMaximum { max, value });
    }
    u64::try_from(value)
        .map(Value::from)
        .or_else(|_| i64::try_from(value).map(Value::from))
        .map_err(|_| Problem::ExpectedInteger(value.to_string()))
}

fn coerce_bool(raw: &Value) -> Result<Value, Problem> {
    let parsed = match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "0" | "false" => Some(false),
            "1" | "true" => Some(true),
            _ => None,
        },
        _ => None,
    };
    parsed
        .map(Value::Bool)
        .ok_or_else(|| Problem::ExpectedBool(describe(raw)))
}

fn coerce_str(raw: &Value) -> Result<Value, Problem> {
    match raw {
        Value::String(_) => Ok(raw.clone()),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        other => Err(Problem::ExpectedString(describe(other))),
    }
}

fn coerce_datetime(raw: &Value) -> Result<Value, Problem> {
    let parsed = match raw {
        Value::String(s) => parse_timestamp(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.fixed_offset()),
        _ => None,
    };
    parsed
        .map(|dt| Value::String(dt.to_rfc3339()))
        .ok_or_else(|| Problem::ExpectedDateTime(describe(raw)))
}

/// RFC 3339, or the router's variant without a colon in the offset
/// (`2025-11-07T13:40:00+0100`).
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    static INNER: Schema = Schema {
        name: "Inner",
        fields: &[
            Field::required("level", Kind::PERCENT),
            Field::optional("label", Kind::Str),
        ],
    };

    static INNER_ITEM: Kind = Kind::Object(&INNER);

    static OUTER: Schema = Schema {
        name: "Outer",
        fields: &[
            Field::required("count", Kind::COUNTER),
            Field::required("enabled", Kind::Bool),
            Field::optional("seen", Kind::DateTime),
            Field::optional("inner", Kind::Object(&INNER)),
            Field::optional("items", Kind::List(&INNER_ITEM)),
            Field::optional("tags", Kind::List(&Kind::Str)),
        ],
    };

    #[test]
    fn coerces_lax_values() {
        let out = validate(
            &json!({
                "count": "42",
                "enabled": 1,
                "seen": "2025-11-07T13:40:00+0100",
                "inner": { "level": "7", "label": 12 },
            }),
            &OUTER,
        )
        .unwrap();

        assert_eq!(
            out,
            json!({
                "count": 42,
                "enabled": true,
                "seen": "2025-11-07T13:40:00+01:00",
                "inner": { "level": 7, "label": "12" },
                "items": [],
                "tags": [],
            })
        );
    }

    #[test]
    fn reports_every_violation() {
        let err = validate(
            &json!({
                "count": -1,
                "enabled": "maybe",
                "inner": { "level": 150 },
                "items": [{ "level": 5 }, { "label": "x" }],
            }),
            &OUTER,
        )
        .unwrap_err();

        assert_eq!(err.record, "Outer");
        let paths: Vec<&str> = err.paths().collect();
        assert_eq!(
            paths,
            vec!["count", "enabled", "inner.level", "items[1].level"]
        );
        assert_eq!(
            err.violations[0].problem,
            Problem::BelowMinimum { min: 0, value: -1 }
        );
        assert_eq!(
            err.violations[2].problem,
            Problem::AboveMaximum {
                max: 100,
                value: 150
            }
        );
        assert_eq!(err.violations[3].problem, Problem::Missing);
    }

    #[test]
    fn null_counts_as_absent() {
        let err = validate(&json!({ "count": null, "enabled": true }), &OUTER).unwrap_err();
        assert!(err.has_path("count"));

        let out = validate(
            &json!({ "count": 0, "enabled": false, "inner": null, "tags": null }),
            &OUTER,
        )
        .unwrap();
        assert_eq!(out["inner"], Value::Null);
        assert_eq!(out["tags"], json!([]));
    }

    #[test]
    fn unknown_keys_pass_through() {
        let out = validate(
            &json!({ "count": 1, "enabled": true, "isCertified": 1 }),
            &OUTER,
        )
        .unwrap();
        assert_eq!(out["isCertified"], json!(1));
    }

    #[test]
    fn rejects_non_object_root() {
        let err = validate(&json!([1, 2]), &OUTER).unwrap_err();
        assert_eq!(err.violations, vec![Violation::new("", Problem::ExpectedObject)]);
    }

    #[test]
    fn list_order_is_preserved() {
        let out = validate(
            &json!({ "count": 0, "enabled": true, "tags": ["b", "a", "c"] }),
            &OUTER,
        )
        .unwrap();
        assert_eq!(out["tags"], json!(["b", "a", "c"]));
    }

    #[test]
    fn integers_from_numbers_or_numeric_strings() {
        assert_eq!(coerce_int(&json!(3)).unwrap(), 3);
        assert!(coerce_int(&json!(3.5)).is_err());
        assert!(coerce_int(&json!("abc")).is_err());
        assert_eq!(coerce_int(&json!(" -52 ")).unwrap(), -52);
    }

    #[test]
    fn integral_floats_are_integers() {
        assert_eq!(coerce_int(&json!(42.0)).unwrap(), 42);
        assert_eq!(coerce_int(&json!(-7.0)).unwrap(), -7);
        assert!(coerce_int(&json!(0.5)).is_err());
        assert!(coerce_int(&json!(1e300)).is_err());

        let out = validate(&json!({ "count": 42.0, "enabled": true }), &OUTER).unwrap();
        assert_eq!(out["count"], json!(42));
    }

    #[test]
    fn counters_span_the_unsigned_range() {
        assert_eq!(
            coerce_int(&json!(u64::MAX)).unwrap(),
            i128::from(u64::MAX)
        );
        assert_eq!(
            coerce_int(&json!("18446744073709551615")).unwrap(),
            i128::from(u64::MAX)
        );
        assert!(coerce_int(&json!("18446744073709551616")).is_err());
        assert!(coerce_int(&json!("-9223372036854775809")).is_err());

        let out = validate(&json!({ "count": u64::MAX, "enabled": true }), &OUTER).unwrap();
        assert_eq!(out["count"], json!(u64::MAX));
    }

    #[test]
    fn prefixed_paths() {
        let err = ValidationError::single("Host", "wireless.rssi0", Problem::Missing)
            .prefixed("hosts.list[2]");
        assert!(err.has_path("hosts.list[2].wireless.rssi0"));
        assert_eq!(join_path("hosts.list", "[0]"), "hosts.list[0]");
        assert_eq!(join_path("device", ""), "device");
    }

    #[test]
    fn parses_both_timestamp_styles() {
        assert!(parse_timestamp("2025-09-25T14:38:50Z").is_some());
        assert!(parse_timestamp("2025-09-25T14:38:16+0000").is_some());
        assert!(parse_timestamp("2025-11-07T13:40:00+01:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
