use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static INLINE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*([^\s:][^:\n]*?)[ \t]*::(.*)$").expect("valid inline field regex"));

pub struct InlineFieldExtractor;

impl InlineFieldExtractor {
    /// Collects `key:: value` lines. Repeated keys accumulate into a list in
    /// the order they appear; `key:: [a, b]` contributes each element.
    pub fn extract(text: &str) -> Map<String, Value> {
        let mut fields = Map::new();

        for captures in INLINE_FIELD.captures_iter(text) {
            let key = captures[1].trim();
            let raw_value = captures[2].trim();
            if key.is_empty() || raw_value.is_empty() {
                continue;
            }

            Self::merge_field(&mut fields, key, Self::parse_value(raw_value));
        }

        fields
    }

    fn parse_value(raw: &str) -> Value {
        match raw.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            Some(inner) => Value::Array(
                inner
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| Value::String(item.to_string()))
                    .collect(),
            ),
            None => Value::String(raw.to_string()),
        }
    }

    fn merge_field(fields: &mut Map<String, Value>, key: &str, incoming: Value) {
        let Some(existing) = fields.get_mut(key) else {
            fields.insert(key.to_string(), incoming);
            return;
        };

        if !existing.is_array() {
            *existing = Value::Array(vec![existing.take()]);
        }

        if let Value::Array(list) = existing {
            match incoming {
                Value::Array(items) => list.extend(items),
                scalar => list.push(scalar),
            }
        }
    }
}
