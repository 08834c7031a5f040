//! Structural checks on model declarations.
//!
//! The compiler accepts any declaration and lets problems surface at
//! decode time. This checker reports them ahead of time instead, as terse
//! stable codes. Run it after the model graph is fully defined, or
//! forward references will report as unknown.

use std::collections::HashSet;

use crate::model::{FieldInit, ModelRegistry, ModelSchema};

use super::schema::{SchemaKind, SchemaType};

pub fn validate_model(registry: &ModelRegistry, schema: &ModelSchema) -> Result<(), String> {
    if schema.name().is_empty() {
        return Err("NAME_EMPTY".into());
    }
    let mut seen = HashSet::new();
    for decl in schema.fields() {
        if decl.key.is_empty() {
            return Err("KEY_EMPTY".into());
        }
        if !seen.insert(decl.key.as_str()) {
            return Err("KEY_DUP".into());
        }
        if let FieldInit::Schema(node) = &decl.init {
            validate_node(registry, node)?;
            let has_default = decl.config.default_value.is_some()
                || registry
                    .metadata()
                    .get(schema.name(), &decl.key)
                    .map_or(false, |meta| meta.default_value.is_some());
            if has_default && matches!(node.kind, SchemaKind::Reference(_)) {
                return Err("REF_DEFAULT".into());
            }
        }
    }
    Ok(())
}

fn validate_node(registry: &ModelRegistry, node: &SchemaType) -> Result<(), String> {
    match &node.kind {
        SchemaKind::Primitive(_) | SchemaKind::Instance(_) => Ok(()),
        SchemaKind::Enum(members) => {
            if members.is_empty() {
                Err("ENUM_EMPTY".into())
            } else {
                Ok(())
            }
        }
        SchemaKind::Reference(target) => {
            if registry.contains(target) {
                Ok(())
            } else {
                Err("REF_UNKNOWN".into())
            }
        }
        SchemaKind::Array(element) => validate_node(registry, element),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldConfig, ModelSchema};
    use crate::schema::S;

    #[test]
    fn accepts_a_well_formed_model() {
        let registry = ModelRegistry::new();
        registry.define(ModelSchema::new("Tag").field("label", S.str()));
        let schema = ModelSchema::new("Post")
            .field("id", S.num())
            .field("tags", S.arr(S.ref_("Tag")))
            .field("state", S.enum_(["draft", "live"]))
            .plain("kind", "post");
        registry.define(schema.clone());
        assert_eq!(validate_model(&registry, &schema), Ok(()));
    }

    #[test]
    fn rejects_empty_names_and_keys() {
        let registry = ModelRegistry::new();
        let unnamed = ModelSchema::new("");
        assert_eq!(validate_model(&registry, &unnamed), Err("NAME_EMPTY".into()));
        let unkeyed = ModelSchema::new("User").field("", S.num());
        assert_eq!(validate_model(&registry, &unkeyed), Err("KEY_EMPTY".into()));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let registry = ModelRegistry::new();
        let schema = ModelSchema::new("User")
            .field("id", S.num())
            .field("id", S.str());
        assert_eq!(validate_model(&registry, &schema), Err("KEY_DUP".into()));
    }

    #[test]
    fn rejects_empty_enums_even_nested() {
        let registry = ModelRegistry::new();
        let schema = ModelSchema::new("User").field("roles", S.arr(S.enum_(Vec::<String>::new())));
        assert_eq!(validate_model(&registry, &schema), Err("ENUM_EMPTY".into()));
    }

    #[test]
    fn rejects_unknown_reference_targets() {
        let registry = ModelRegistry::new();
        let schema = ModelSchema::new("User").field("profile", S.ref_("Ghost"));
        assert_eq!(validate_model(&registry, &schema), Err("REF_UNKNOWN".into()));
    }

    #[test]
    fn accepts_self_reference_once_defined() {
        let registry = ModelRegistry::new();
        let schema = ModelSchema::new("Node").field("next", S.opt(S.ref_("Node")));
        registry.define(schema.clone());
        assert_eq!(validate_model(&registry, &schema), Ok(()));
    }

    #[test]
    fn rejects_defaults_on_reference_fields() {
        let registry = ModelRegistry::new();
        registry.define(ModelSchema::new("Profile").field("bio", S.opt(S.str())));
        let schema = ModelSchema::new("User").field_with(
            "profile",
            S.ref_("Profile"),
            FieldConfig::new().default_value(0),
        );
        assert_eq!(validate_model(&registry, &schema), Err("REF_DEFAULT".into()));
    }

    #[test]
    fn sees_defaults_already_folded_into_the_registry() {
        let registry = ModelRegistry::new();
        registry.define(ModelSchema::new("Profile").field("bio", S.opt(S.str())));
        let schema = ModelSchema::new("User").field("profile", S.ref_("Profile"));
        registry.define(schema.clone());
        registry
            .metadata()
            .set_default("User", "profile", crate::metadata::DefaultValue::literal(0));
        assert_eq!(validate_model(&registry, &schema), Err("REF_DEFAULT".into()));
    }
}
