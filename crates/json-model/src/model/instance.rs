use serde_json::{Map, Value as JsonValue};

use crate::value::Value;

/// A decoded record: the model's name plus its fields in declaration
/// order. Built field by field by the decode plan; custom deserializers
/// see it partially filled, with later fields still at their seed value.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInstance {
    model: String,
    fields: Vec<(String, Value)>,
}

impl ModelInstance {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(model: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
        Self {
            model: model.into(),
            fields,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Sets a field, replacing in place so declaration order survives.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON view of the instance. `None` when any field holds a native
    /// instance, since those have no JSON form.
    pub fn to_json(&self) -> Option<JsonValue> {
        let mut map = Map::with_capacity(self.fields.len());
        for (key, value) in &self.fields {
            map.insert(key.clone(), value.to_json()?);
        }
        Some(JsonValue::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Instance;
    use serde_json::json;

    #[test]
    fn set_replaces_in_place() {
        let mut instance = ModelInstance::with_fields(
            "User",
            vec![
                ("id".into(), Value::Null),
                ("name".into(), Value::Null),
            ],
        );
        instance.set("id", Value::Num(1.0));
        let keys: Vec<&str> = instance.keys().collect();
        assert_eq!(keys, vec!["id", "name"]);
        assert_eq!(instance.get("id"), Some(&Value::Num(1.0)));
        assert_eq!(instance.get("name"), Some(&Value::Null));
    }

    #[test]
    fn set_appends_unknown_keys() {
        let mut instance = ModelInstance::new("User");
        assert!(instance.is_empty());
        instance.set("late", Value::Bool(true));
        assert!(!instance.is_empty());
        assert_eq!(instance.len(), 1);
        assert_eq!(instance.get("late"), Some(&Value::Bool(true)));
    }

    #[test]
    fn json_view() {
        let mut instance = ModelInstance::new("User");
        instance.set("id", Value::Num(2.0));
        instance.set("tags", Value::Arr(vec![Value::Str("a".into())]));
        assert_eq!(instance.to_json(), Some(json!({"id": 2, "tags": ["a"]})));
    }

    #[test]
    fn json_view_rejects_native_instances() {
        let mut instance = ModelInstance::new("User");
        instance.set("native", Value::Instance(Instance::new(3u8)));
        assert_eq!(instance.to_json(), None);
    }
}
