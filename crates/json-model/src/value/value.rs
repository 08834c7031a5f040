use std::fmt;

use serde_json::{Map, Number, Value as JsonValue};

use crate::model::ModelInstance;

use super::instance::Instance;

/// Dynamic value as seen by the decode engine.
///
/// Covers the JSON shapes plus the two host-side shapes that never travel
/// over the wire: [`Value::Instance`] for native payloads and
/// [`Value::Model`] for decoded sub-records.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    Arr(Vec<Value>),
    Obj(Vec<(String, Value)>),
    Instance(Instance),
    Model(Box<ModelInstance>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Num(_) => "number",
            Value::Str(_) => "string",
            Value::Arr(_) => "array",
            Value::Obj(_) => "object",
            Value::Instance(_) => "instance",
            Value::Model(_) => "model",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_arr(&self) -> Option<&[Value]> {
        match self {
            Value::Arr(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_obj(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Obj(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&ModelInstance> {
        match self {
            Value::Model(instance) => Some(instance),
            _ => None,
        }
    }

    /// Entry lookup on [`Value::Obj`]. Every other shape has no keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Obj(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Converts back to JSON. `None` when the value holds a native
    /// instance anywhere inside, since those have no JSON form.
    /// Integral numbers render as JSON integers, non-finite ones as
    /// `null`.
    pub fn to_json(&self) -> Option<JsonValue> {
        match self {
            Value::Null => Some(JsonValue::Null),
            Value::Bool(b) => Some(JsonValue::Bool(*b)),
            Value::Num(n) => {
                let n = *n;
                // Exclusive upper bound: i64::MAX rounds up to 2^63 as
                // f64, which does not fit back into i64.
                let integral = n.is_finite()
                    && n.fract() == 0.0
                    && n >= i64::MIN as f64
                    && n < 9_223_372_036_854_775_808.0;
                let num = if integral {
                    Some(Number::from(n as i64))
                } else {
                    Number::from_f64(n)
                };
                Some(num.map(JsonValue::Number).unwrap_or(JsonValue::Null))
            }
            Value::Str(s) => Some(JsonValue::String(s.clone())),
            Value::Arr(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(item.to_json()?);
                }
                Some(JsonValue::Array(out))
            }
            Value::Obj(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json()?);
                }
                Some(JsonValue::Object(map))
            }
            Value::Instance(_) => None,
            Value::Model(instance) => instance.to_json(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Num(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Arr(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Obj(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Instance(instance) => write!(f, "[instance {}]", instance.type_name()),
            Value::Model(instance) => write!(f, "[model {}]", instance.model()),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Num(n.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(s) => Value::Str(s),
            JsonValue::Array(items) => Value::Arr(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => {
                Value::Obj(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&JsonValue> for Value {
    fn from(value: &JsonValue) -> Self {
        Value::from(value.clone())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Num(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Num(value as f64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Num(value as f64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Num(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Arr(value)
    }
}

impl From<Instance> for Value {
    fn from(value: Instance) -> Self {
        Value::Instance(value)
    }
}

impl From<ModelInstance> for Value {
    fn from(value: ModelInstance) -> Self {
        Value::Model(Box::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_names() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::Bool(true).kind(), "boolean");
        assert_eq!(Value::Num(0.0).kind(), "number");
        assert_eq!(Value::Str("".into()).kind(), "string");
        assert_eq!(Value::Arr(vec![]).kind(), "array");
        assert_eq!(Value::Obj(vec![]).kind(), "object");
        assert_eq!(Value::Instance(Instance::new(1u8)).kind(), "instance");
    }

    #[test]
    fn from_json_preserves_entry_order() {
        let value = Value::from(json!({"b": 1, "a": 2, "c": 3}));
        let keys: Vec<&str> = value
            .as_obj()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn json_round_trip() {
        let json = json!({
            "name": "joy",
            "count": 3,
            "ratio": 1.5,
            "flag": false,
            "tags": ["a", "b"],
            "nested": {"x": null}
        });
        let value = Value::from(json.clone());
        assert_eq!(value.to_json(), Some(json));
    }

    #[test]
    fn integral_numbers_render_as_json_integers() {
        assert_eq!(Value::Num(3.0).to_json(), Some(json!(3)));
        assert_eq!(Value::Num(-0.0).to_json(), Some(json!(0)));
        assert_eq!(Value::Num(2.5).to_json(), Some(json!(2.5)));
        assert_eq!(Value::Num(1e20).to_json(), Some(json!(1e20)));
    }

    #[test]
    fn integral_floats_at_the_i64_boundary() {
        // 2^63 is above i64::MAX and must stay a float.
        let ceil = 9_223_372_036_854_775_808.0f64;
        let ceil_json = Value::Num(ceil).to_json();
        assert_eq!(
            ceil_json,
            Some(JsonValue::Number(Number::from_f64(ceil).unwrap()))
        );
        assert_ne!(ceil_json, Some(json!(i64::MAX)));
        let below = 9_223_372_036_854_774_784.0f64;
        assert_eq!(
            Value::Num(below).to_json(),
            Some(json!(9_223_372_036_854_774_784i64))
        );
        assert_eq!(Value::Num(i64::MIN as f64).to_json(), Some(json!(i64::MIN)));
    }

    #[test]
    fn instance_has_no_json_form() {
        let value = Value::Arr(vec![Value::Num(1.0), Value::Instance(Instance::new(1u8))]);
        assert_eq!(value.to_json(), None);
    }

    #[test]
    fn non_finite_numbers_collapse_to_null() {
        assert_eq!(Value::Num(f64::NAN).to_json(), Some(JsonValue::Null));
        assert_eq!(Value::Num(f64::INFINITY).to_json(), Some(JsonValue::Null));
    }

    #[test]
    fn get_only_works_on_objects() {
        let obj = Value::from(json!({"id": 7}));
        assert_eq!(obj.get("id"), Some(&Value::Num(7.0)));
        assert_eq!(obj.get("missing"), None);
        assert_eq!(Value::Str("id".into()).get("id"), None);
        assert_eq!(Value::Null.get("id"), None);
    }

    #[test]
    fn as_bool_matches_only_booleans() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Bool(false).as_bool(), Some(false));
        assert_eq!(Value::Num(1.0).as_bool(), None);
        assert_eq!(Value::Null.as_bool(), None);
    }

    #[test]
    fn falsy_values_are_not_null() {
        assert!(!Value::Bool(false).is_null());
        assert!(!Value::Num(0.0).is_null());
        assert!(!Value::Str(String::new()).is_null());
        assert!(Value::Null.is_null());
    }

    #[test]
    fn display_renders_json_like_text() {
        let value = Value::from(json!({"a": [1.5, "x", null], "b": true}));
        assert_eq!(value.to_string(), r#"{"a": [1.5, "x", null], "b": true}"#);
        assert_eq!(Value::Num(2.0).to_string(), "2");
    }

    #[test]
    fn scalar_conversions() {
        assert_eq!(Value::from(2i32), Value::Num(2.0));
        assert_eq!(Value::from(2.5f64), Value::Num(2.5));
        assert_eq!(Value::from("s"), Value::Str("s".into()));
        assert_eq!(Value::from(true), Value::Bool(true));
    }
}
