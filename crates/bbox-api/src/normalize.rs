// Pre-validation cleanup of router payloads.
//
// The Bbox API encodes "no value" as an empty string, occasionally serves
// text that was decoded as Latin-1 somewhere upstream, and wraps single
// objects in one-element arrays. These passes undo all three so the schema
// validator only ever sees well-formed input.

use std::borrow::Cow;

use serde_json::Value;
use tracing::trace;

use crate::schema::{Kind, Schema};

/// Full normalization for a record of shape `schema`: empty strings become
/// `null` everywhere, then fields marked for repair are mojibake-fixed.
pub fn normalize(value: Value, schema: &Schema) -> Value {
    let mut value = empty_to_null(value);
    repair_marked(&mut value, schema);
    value
}

/// Replace every empty-string object field with `null`, recursively.
///
/// Arrays are descended into so objects nested in lists are cleaned too,
/// but bare string elements of an array are left alone.
pub fn empty_to_null(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, v)| match v {
                    Value::String(s) if s.is_empty() => (key, Value::Null),
                    other => (key, empty_to_null(other)),
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(_) | Value::Array(_) => empty_to_null(item),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

/// Unwrap the API's single-element array envelope.
///
/// `[x]` becomes `x`; anything else is returned as-is.
pub fn unwrap_single(value: Value) -> Value {
    match value {
        Value::Array(mut items) if items.len() == 1 => items.pop().unwrap_or(Value::Null),
        other => other,
    }
}

/// Undo one Latin-1 decode of UTF-8 text (`GÃ©nÃ©rique` → `Générique`).
///
/// Best effort: if the text has characters outside Latin-1, or the recovered
/// bytes are not valid UTF-8, the input is returned unchanged.
pub fn fix_mojibake(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }

    let latin1: Option<Vec<u8>> = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect();

    match latin1.and_then(|bytes| String::from_utf8(bytes).ok()) {
        Some(fixed) => {
            trace!(original = text, repaired = %fixed, "repaired mojibake");
            Cow::Owned(fixed)
        }
        None => Cow::Borrowed(text),
    }
}

/// Apply [`fix_mojibake`] to every string field the schema marks for repair,
/// descending through nested objects and lists of objects.
pub fn repair_marked(value: &mut Value, schema: &Schema) {
    let Value::Object(map) = value else {
        return;
    };

    for field in schema.fields {
        let Some(slot) = map.get_mut(field.name) else {
            continue;
        };
        if field.repair {
            if let Value::String(s) = slot {
                if let Cow::Owned(fixed) = fix_mojibake(s) {
                    *s = fixed;
                }
            }
        }
        repair_kind(slot, &field.kind);
    }
}

fn repair_kind(value: &mut Value, kind: &Kind) {
    match kind {
        Kind::Object(nested) => repair_marked(value, nested),
        Kind::List(item) => {
            if let Value::Array(items) = value {
                for v in items {
                    repair_kind(v, item);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::schema::Field;

    static INFO: Schema = Schema {
        name: "Info",
        fields: &[
            Field::required("type", Kind::Str).repaired(),
            Field::optional("model", Kind::Str),
        ],
    };

    static INFO_ITEM: Kind = Kind::Object(&INFO);

    static HOLDER: Schema = Schema {
        name: "Holder",
        fields: &[
            Field::optional("informations", Kind::Object(&INFO)),
            Field::optional("history", Kind::List(&INFO_ITEM)),
        ],
    };

    #[test]
    fn empty_strings_become_null_recursively() {
        let out = empty_to_null(json!({
            "hostname": "",
            "ipaddress": "192.168.1.100",
            "plc": { "rxphyrate": "", "interface": 0 },
            "ip6address": [{ "status": "" }],
            "services": ["", "ssh"],
        }));

        assert_eq!(
            out,
            json!({
                "hostname": null,
                "ipaddress": "192.168.1.100",
                "plc": { "rxphyrate": null, "interface": 0 },
                "ip6address": [{ "status": null }],
                "services": ["", "ssh"],
            })
        );
    }

    #[test]
    fn empty_to_null_is_idempotent() {
        let input = json!({ "a": "", "b": "x", "c": { "d": "" }, "e": [ { "f": "" } ] });
        let once = empty_to_null(input);
        let twice = empty_to_null(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn unwraps_single_element_arrays_only() {
        let inner = json!({ "device": { "modelname": "F@st5696b" } });
        assert_eq!(unwrap_single(json!([inner.clone()])), inner);
        assert_eq!(unwrap_single(inner.clone()), inner);
        assert_eq!(unwrap_single(json!([1, 2])), json!([1, 2]));
        assert_eq!(unwrap_single(json!([])), json!([]));
    }

    #[test]
    fn repairs_latin1_mojibake() {
        assert_eq!(fix_mojibake("GÃ©nÃ©rique"), "Générique");
        assert_eq!(fix_mojibake("TÃ©lÃ©phone"), "Téléphone");
    }

    #[test]
    fn leaves_unrepairable_text_alone() {
        // Already-correct accents are not valid UTF-8 once re-encoded.
        assert_eq!(fix_mojibake("Générique"), "Générique");
        // Characters outside Latin-1 cannot have come from a Latin-1 decode.
        assert_eq!(fix_mojibake("Ŧest €"), "Ŧest €");
        assert!(matches!(fix_mojibake("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn repair_only_touches_marked_fields() {
        let out = normalize(
            json!({
                "informations": { "type": "GÃ©nÃ©rique", "model": "GÃ©nÃ©rique" },
                "history": [{ "type": "TÃ©lÃ©phone", "model": "" }],
            }),
            &HOLDER,
        );

        assert_eq!(out["informations"]["type"], "Générique");
        assert_eq!(out["informations"]["model"], "GÃ©nÃ©rique");
        assert_eq!(out["history"][0]["type"], "Téléphone");
        assert_eq!(out["history"][0]["model"], Value::Null);
    }
}
