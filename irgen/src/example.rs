//! Example values for fields and example payloads for objects.

use crate::error::Result;
use crate::ir::{Definition, FieldType, Object};
use crate::resolver::{is_float, is_integer};
use serde_json::{json, Map, Value};
use std::collections::HashSet;

/// Example value of a field: the explicit `example` metadata when given,
/// otherwise a default chosen from the field's type.
///
/// Multiple fields hold a sequence. Default primitive examples are repeated
/// three times; everything else, including an explicit scalar example, is
/// wrapped once. Optional object references are the empty object.
pub fn field_example(ft: &FieldType, explicit: Option<&Value>) -> Value {
    if let Some(value) = explicit {
        return match value {
            Value::Array(_) => value.clone(),
            v if ft.multiple => Value::Array(vec![v.clone()]),
            v => v.clone(),
        };
    }

    if ft.is_object && ft.is_optional() {
        return json!({});
    }

    let example = default_example(&ft.clean_object_name);
    if !ft.multiple {
        return example;
    }
    match example {
        Value::String(_) | Value::Bool(_) | Value::Number(_) => {
            Value::Array(vec![example.clone(), example.clone(), example])
        }
        other => Value::Array(vec![other]),
    }
}

fn default_example(type_name: &str) -> Value {
    match type_name {
        "any" => json!({}),
        "map[string]any" => json!({
            "string": "value",
            "int": 88,
            "object": {},
        }),
        "string" => json!("text"),
        "bool" => json!(true),
        n if is_integer(n) => json!(334),
        n if is_float(n) => json!(1.235),
        _ => Value::Null,
    }
}

impl Definition {
    /// A representative JSON object for `object`, keyed by lower snake field
    /// names. Object fields are expanded recursively; a field that refers
    /// back to an object already being expanded is the empty object. A field
    /// whose object is not part of the definition keeps its own example.
    pub fn example(&self, object: &Object) -> Result<Map<String, Value>> {
        let mut expanding = HashSet::new();
        self.example_with(object, &mut expanding)
    }

    /// [`example`](Self::example) serialized as compact JSON.
    pub fn example_json(&self, object: &Object) -> Result<String> {
        let example = self.example(object)?;
        Ok(serde_json::to_string(&example)?)
    }

    fn example_with<'d>(
        &'d self,
        object: &'d Object,
        expanding: &mut HashSet<&'d str>,
    ) -> Result<Map<String, Value>> {
        expanding.insert(object.name.as_str());
        let mut example = Map::new();

        for field in &object.fields {
            let ft = &field.field_type;
            let value = match self.objects.iter().find(|o| ft.is_object && o.name == ft.bare_name()) {
                Some(sub_object) => {
                    let sub = if expanding.contains(sub_object.name.as_str()) {
                        json!({})
                    } else {
                        Value::Object(self.example_with(sub_object, expanding)?)
                    };
                    if ft.multiple {
                        Value::Array(vec![sub])
                    } else {
                        sub
                    }
                }
                // Scalars, and objects only reached through a pointer.
                None => field.example.clone(),
            };
            example.insert(field.name_lower_snake.clone(), value);
        }

        expanding.remove(object.name.as_str());
        Ok(example)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(name: &str, multiple: bool) -> FieldType {
        FieldType {
            type_name: name.into(),
            clean_object_name: name.into(),
            multiple,
            multiple_times: usize::from(multiple),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_examples() {
        assert_eq!(field_example(&scalar("string", false), None), json!("text"));
        assert_eq!(field_example(&scalar("bool", false), None), json!(true));
        assert_eq!(field_example(&scalar("int64", false), None), json!(334));
        assert_eq!(field_example(&scalar("float32", false), None), json!(1.235));
        assert_eq!(field_example(&scalar("any", false), None), json!({}));
        assert_eq!(
            field_example(&scalar("map[string]any", false), None),
            json!({"string": "value", "int": 88, "object": {}})
        );
        assert_eq!(field_example(&scalar("Custom", false), None), Value::Null);
    }

    #[test]
    fn test_multiple_defaults() {
        assert_eq!(
            field_example(&scalar("string", true), None),
            json!(["text", "text", "text"])
        );
        assert_eq!(field_example(&scalar("any", true), None), json!([{}]));
    }

    #[test]
    fn test_explicit_examples() {
        let hello = json!("Hello there");
        assert_eq!(field_example(&scalar("string", false), Some(&hello)), hello);
        assert_eq!(
            field_example(&scalar("string", true), Some(&hello)),
            json!(["Hello there"])
        );
        let list = json!(["a", "b"]);
        assert_eq!(field_example(&scalar("string", true), Some(&list)), list);
    }

    #[test]
    fn test_optional_object_is_empty_object() {
        let ft = FieldType {
            type_name: "*Greeting".into(),
            clean_object_name: "Greeting".into(),
            is_object: true,
            ..Default::default()
        };
        assert_eq!(field_example(&ft, None), json!({}));
    }

    #[test]
    fn test_object_outside_definition_keeps_field_example() {
        let page = FieldType {
            type_name: "*shared.Page".into(),
            clean_object_name: "shared.Page".into(),
            is_object: true,
            ..Default::default()
        };
        let list_request = Object {
            name: "ListRequest".into(),
            fields: vec![crate::ir::Field {
                name: "Page".into(),
                name_lower_snake: "page".into(),
                example: field_example(&page, None),
                field_type: page,
                ..Default::default()
            }],
            ..Default::default()
        };
        let def = Definition {
            objects: vec![list_request.clone()],
            ..Default::default()
        };

        let example = def.example(&list_request).unwrap();
        assert_eq!(Value::Object(example), json!({"page": {}}));
    }
}
