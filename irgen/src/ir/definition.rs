//! The definition: services, methods, objects and fields.

use crate::error::{NotFoundError, Result};
use crate::ir::types::FieldType;
use crate::metadata::Metadata;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Everything generators need to know about one package of declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub package_name: String,
    pub services: Vec<Service>,
    pub objects: Vec<Object>,
    /// External package paths mapped to their names.
    pub imports: BTreeMap<String, String>,
}

/// A set of methods, built from an interface declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub name: String,
    pub methods: Vec<Method>,
    pub comment: String,
    pub metadata: Metadata,
}

/// A single request/response call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub name: String,
    pub name_lower_camel: String,
    pub name_lower_snake: String,
    pub input_object: FieldType,
    pub output_object: FieldType,
    pub comment: String,
    pub metadata: Metadata,
}

/// A data object, built from a struct declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    #[serde(rename = "typeID")]
    pub type_id: String,
    pub name: String,
    pub name_lower_camel: String,
    pub name_lower_snake: String,
    /// Declared outside the definition's package.
    pub imported: bool,
    pub fields: Vec<Field>,
    pub comment: String,
    pub metadata: Metadata,
}

/// A field of an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub name_lower_camel: String,
    pub name_lower_snake: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub omit_empty: bool,
    pub comment: String,
    /// Raw struct tag.
    pub tag: String,
    pub parsed_tags: BTreeMap<String, FieldTag>,
    /// Explicit or synthesized example; `null` when there is none.
    pub example: Value,
    pub metadata: Metadata,
}

/// One parsed struct tag entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTag {
    pub value: String,
    pub options: Vec<String>,
}

impl Definition {
    /// Look up an object by name.
    pub fn object(&self, name: &str) -> Result<&Object, NotFoundError> {
        self.objects
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| NotFoundError::new(name))
    }

    /// Whether any method takes the named object as its request.
    pub fn object_is_input(&self, name: &str) -> bool {
        self.methods().any(|m| m.input_object.bare_name() == name)
    }

    /// Whether any method returns the named object as its response.
    pub fn object_is_output(&self, name: &str) -> bool {
        self.methods().any(|m| m.output_object.bare_name() == name)
    }

    /// A paginated method returns a `TotalCount int64` and accepts a `Query`.
    pub fn method_has_pagination(&self, method: &Method) -> Result<bool> {
        let output_name = method.output_object.bare_name();
        if !self.object_is_output(output_name) {
            return Ok(false);
        }
        let output = self.object(output_name)?;
        let has_total_count = output
            .fields
            .iter()
            .any(|f| f.name == "TotalCount" && f.field_type.type_name == "int64");
        if !has_total_count {
            return Ok(false);
        }

        let input_name = method.input_object.bare_name();
        if !self.object_is_input(input_name) {
            return Ok(false);
        }
        let input = self.object(input_name)?;
        Ok(input.fields.iter().any(|f| f.name == "Query"))
    }

    fn methods(&self) -> impl Iterator<Item = &Method> {
        self.services.iter().flat_map(|s| s.methods.iter())
    }
}

impl Object {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}
