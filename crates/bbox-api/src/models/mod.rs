// Typed records for the Bbox read endpoints.
//
// Every record declares its wire shape as a static `Schema`; `Record::from_json`
// runs normalization and validation before serde builds the struct, so the
// derives below only ever see canonical JSON.

pub mod host;
pub mod router;
pub mod wan;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::normalize::normalize;
use crate::schema::{self, Problem, Schema, ValidationError, join_path};

pub use host::{
    DeviceInfo, EthernetInfo, Host, Ip6Address, ParentalControl, PingInfo, PlcInfo, ScanInfo,
    WirelessByBand, WirelessInfo,
};
pub use router::{Router, RouterDisplay, RouterUsing, RouterVersion};
pub use wan::{WanIpStats, WanStats};

/// A response record with a declared wire shape.
pub trait Record: DeserializeOwned {
    /// The shape the validator checks before deserialization.
    fn schema() -> &'static Schema;

    /// Normalize, validate and build the record from a raw JSON object.
    fn from_json(value: Value) -> Result<Self, ValidationError> {
        let schema = Self::schema();
        let normalized = normalize(value, schema);
        let canonical = schema::validate(&normalized, schema)?;
        serde_json::from_value(canonical)
            .map_err(|e| ValidationError::single(schema.name, "", Problem::Malformed(e.to_string())))
    }
}

/// Walk into the response envelope (`wan` → `ip` → `stats`), taking the value
/// at the end of `path`. A missing or null step is reported at its dotted path.
pub(crate) fn take_path(
    mut value: Value,
    path: &[&str],
    record: &'static str,
) -> Result<Value, ValidationError> {
    let mut walked = String::new();
    for key in path {
        let Value::Object(ref mut map) = value else {
            return Err(ValidationError::single(record, walked, Problem::ExpectedObject));
        };
        walked = join_path(&walked, key);
        match map.remove(*key) {
            Some(next) if !next.is_null() => value = next,
            _ => return Err(ValidationError::single(record, walked, Problem::Missing)),
        }
    }
    Ok(value)
}

/// Build every element of a JSON array as `T`, keeping the received order.
///
/// Violations from all elements are reported together, each qualified with
/// `path[index]`.
pub(crate) fn parse_list<T: Record>(value: Value, path: &str) -> Result<Vec<T>, ValidationError> {
    let record = T::schema().name;
    let Value::Array(items) = value else {
        return Err(ValidationError::single(record, path, Problem::ExpectedArray));
    };

    let mut records = Vec::with_capacity(items.len());
    let mut violations = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        match T::from_json(item) {
            Ok(r) => records.push(r),
            Err(e) => violations.extend(e.prefixed(&format!("{path}[{i}]")).violations),
        }
    }

    if violations.is_empty() {
        Ok(records)
    } else {
        Err(ValidationError { record, violations })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn take_path_walks_nested_envelope() {
        let body = json!({ "wan": { "ip": { "stats": { "rx": {} } } } });
        let stats = take_path(body, &["wan", "ip", "stats"], "WANIPStats").unwrap();
        assert_eq!(stats, json!({ "rx": {} }));
    }

    #[test]
    fn take_path_names_the_missing_step() {
        let err = take_path(json!({ "wan": {} }), &["wan", "ip", "stats"], "WANIPStats")
            .unwrap_err();
        assert!(err.has_path("wan.ip"));
        assert_eq!(err.violations[0].problem, Problem::Missing);

        let err = take_path(json!({ "hosts": [] }), &["hosts", "list"], "Host").unwrap_err();
        assert!(err.has_path("hosts"));
        assert_eq!(err.violations[0].problem, Problem::ExpectedObject);
    }
}
