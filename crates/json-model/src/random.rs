//! Random raw-record generator for model schemas.

use rand::Rng;

use crate::model::ModelRegistry;
use crate::schema::{Primitive, SchemaKind, SchemaType};
use crate::value::Value;

// Expansion stops past this depth, so cyclic model graphs still
// produce finite records.
const MAX_DEPTH: usize = 8;

/// Generates raw records shaped to decode into a given model.
///
/// Records carry the input-side keys, so renames are honored. Optional
/// fields are omitted half the time and defaulted fields half the time,
/// letting the decode side fill them in. Instance fields have no wire
/// form and are always left out; a required instance field without a
/// default therefore makes the record undecodable.
pub struct Random;

impl Random {
    pub fn new() -> Self {
        Self
    }

    /// Random raw record for a registered model. Unknown names yield null.
    pub fn gen_record(&self, registry: &ModelRegistry, model: &str) -> Value {
        self.record_at(registry, model, 0)
    }

    /// Random value admissible for one schema node.
    pub fn gen_value(&self, registry: &ModelRegistry, node: &SchemaType) -> Value {
        self.value_at(registry, node, 0)
    }

    fn record_at(&self, registry: &ModelRegistry, model: &str, depth: usize) -> Value {
        let Some(schema) = registry.schema(model) else {
            return Value::Null;
        };
        let mut entries = Vec::new();
        for (key, node) in schema.schema_fields() {
            if matches!(node.kind, SchemaKind::Instance(_)) {
                continue;
            }
            let meta = registry.metadata().get(model, key);
            let has_default = meta
                .as_ref()
                .map_or(false, |m| m.default_value.is_some());
            if has_default && rand::thread_rng().gen_bool(0.5) {
                continue;
            }
            if node.optional && (depth >= MAX_DEPTH || rand::thread_rng().gen_bool(0.5)) {
                continue;
            }
            let lookup = meta
                .and_then(|m| m.rename)
                .unwrap_or_else(|| key.to_string());
            entries.push((lookup, self.value_at(registry, node, depth)));
        }
        Value::Obj(entries)
    }

    fn value_at(&self, registry: &ModelRegistry, node: &SchemaType, depth: usize) -> Value {
        match &node.kind {
            SchemaKind::Primitive(p) => self.gen_primitive(*p),
            SchemaKind::Enum(members) => self.gen_member(members),
            SchemaKind::Instance(_) => Value::Null,
            SchemaKind::Reference(target) => {
                // Required references cannot be omitted, so the cap has
                // to cut the recursion here. Past it the reference
                // bottoms out as an empty record.
                if depth >= MAX_DEPTH {
                    Value::Obj(Vec::new())
                } else {
                    self.record_at(registry, target, depth + 1)
                }
            }
            SchemaKind::Array(element) => self.gen_array(registry, element, depth),
        }
    }

    fn gen_primitive(&self, primitive: Primitive) -> Value {
        match primitive {
            Primitive::Boolean => Value::Bool(rand::thread_rng().gen_bool(0.5)),
            Primitive::Number => {
                let v = rand::thread_rng().gen::<f64>() * 1_000_000.0;
                Value::Num(v.round())
            }
            Primitive::String => {
                let len = rand::thread_rng().gen_range(0..=16usize);
                let s = (0..len)
                    .map(|_| rand::thread_rng().gen_range(97u8..=122) as char)
                    .collect::<String>();
                Value::Str(s)
            }
        }
    }

    fn gen_member(&self, members: &[Value]) -> Value {
        if members.is_empty() {
            return Value::Null;
        }
        members[rand::thread_rng().gen_range(0..members.len())].clone()
    }

    fn gen_array(&self, registry: &ModelRegistry, element: &SchemaType, depth: usize) -> Value {
        let count = if depth >= MAX_DEPTH {
            0
        } else {
            rand::thread_rng().gen_range(0..=5usize)
        };
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            if element.optional && rand::thread_rng().gen_bool(0.25) {
                items.push(Value::Null);
                continue;
            }
            items.push(self.value_at(registry, element, depth + 1));
        }
        Value::Arr(items)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}
