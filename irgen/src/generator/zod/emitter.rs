//! Zod code emitter.
//!
//! Emits one `z.object` schema per definition object, dependencies first.
//!
//! # Features
//!
//! - Object fields reference the dependency's schema by name
//! - Map fields become `z.record(key, value)`
//! - `options` metadata becomes `z.enum([...])`
//! - `type` metadata selects a `ZodTypes` custom scalar
//! - `extend` metadata folds another schema in with `.merge()`
//! - `exclude` metadata leaves a field out entirely
//! - Self-referential objects go through a base schema, a recursive type
//!   and a `z.lazy` extension
//! - Modifiers: `.array()` per sequence level, then `.nullable()`, then
//!   `.optional()`

use crate::error::{InvariantError, Result};
use crate::generator::traits::{CodeGenerator, GeneratedCode, GeneratorConfig};
use crate::generator::zod::custom_types::zod_custom_type;
use crate::ir::{unqualified, Definition, Field, Object};
use crate::metadata::flag;
use crate::naming::camelize_down;
use serde_json::Value;
use std::collections::HashSet;

/// Zod schema code generator.
///
/// # Example
///
/// ```rust
/// use irgen::generator::{CodeGenerator, GeneratorConfig};
/// use irgen::generator::zod::ZodEmitter;
/// use irgen::ir::Definition;
///
/// let generated = ZodEmitter::new()
///     .generate(&Definition::default(), &GeneratorConfig::default())
///     .unwrap();
/// assert!(generated.code.starts_with("import { z } from \"zod\";"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ZodEmitter;

impl ZodEmitter {
    pub fn new() -> Self {
        Self
    }

    /// Emit `name` and everything it depends on, skipping names already in
    /// `emitted`. Names are compared without package qualifiers.
    ///
    /// Dependencies that are not objects of the definition (objects only
    /// ever reached through a pointer) are not emitted; fields referring to
    /// them get an opaque object schema instead.
    pub fn emit_object(
        &self,
        def: &Definition,
        name: &str,
        config: &GeneratorConfig,
        out: &mut String,
        emitted: &mut HashSet<String>,
    ) -> Result<()> {
        let name = unqualified(name);
        if !emitted.insert(name.to_string()) {
            return Ok(());
        }
        let object = def.object(name)?;

        for field in object.fields.iter().filter(|f| !is_excluded(f)) {
            let ft = &field.field_type;
            if ft.is_object && def.object(ft.bare_name()).is_ok() {
                self.emit_object(def, ft.bare_name(), config, out, emitted)?;
            }
            if let Some(map) = ft.map.as_ref().filter(|_| ft.is_map) {
                let element = map.bare_element_name();
                if def.object(element).is_ok() {
                    self.emit_object(def, element, config, out, emitted)?;
                }
            }
        }

        tracing::debug!(object = %object.name, "emitting zod schema");
        out.push_str(&self.write_object(def, object, config)?);
        Ok(())
    }

    fn write_object(&self, def: &Definition, object: &Object, config: &GeneratorConfig) -> Result<String> {
        let nl = config.line_ending_str();
        let indent = config.indent_str();
        let camel = camelize_down(&object.name);
        let name = &object.name;

        let mut ordinary = Vec::new();
        let mut extended = Vec::new();
        let mut recursive = Vec::new();
        for field in object.fields.iter().filter(|f| !is_excluded(f)) {
            if is_self_reference(field, name) {
                recursive.push(field);
            } else if field.metadata.contains_key("extend") {
                extended.push(field);
            } else {
                ordinary.push(field);
            }
        }

        let base = self.base_object(def, object, &ordinary, config)?;
        let mut out = String::new();

        if recursive.is_empty() {
            out.push_str(&format!("export const {camel}Schema = {base}"));
        } else {
            out.push_str(&format!("const {camel}BaseSchema = {base};{nl}{nl}"));

            out.push_str(&format!(
                "type {name}Recursive = z.infer<typeof {camel}BaseSchema> & {{{nl}"
            ));
            for field in &recursive {
                let optional = if flag(&field.metadata, "optional") { "?" } else { "" };
                let depth = "[]".repeat(array_depth(field));
                let nullable = if flag(&field.metadata, "nullable") { " | null" } else { "" };
                out.push_str(&format!(
                    "{indent}{}{optional}: {name}Recursive{depth}{nullable};{nl}",
                    field.name_lower_snake
                ));
            }
            out.push_str(&format!("}};{nl}{nl}"));

            out.push_str(&format!(
                "export const {camel}Schema: z.ZodType<{name}Recursive> = {camel}BaseSchema.extend({{{nl}"
            ));
            for field in &recursive {
                out.push_str(&format!(
                    "{indent}{}: z.lazy(() => {camel}Schema){},{nl}",
                    field.name_lower_snake,
                    modifiers(field)
                ));
            }
            out.push_str("})");
        }

        for field in &extended {
            out.push_str(&format!(".merge({})", schema_ref(def, field.field_type.bare_name())));
        }
        out.push_str(&format!(";{nl}{nl}"));
        Ok(out)
    }

    fn base_object(
        &self,
        def: &Definition,
        object: &Object,
        fields: &[&Field],
        config: &GeneratorConfig,
    ) -> Result<String> {
        let nl = config.line_ending_str();
        let indent = config.indent_str();

        let mut body = format!("z.object({{{nl}");
        for field in fields {
            body.push_str(&format!(
                "{indent}{}: {}{},{nl}",
                field.name_lower_snake,
                self.field_body(def, object, field)?,
                modifiers(field)
            ));
        }
        body.push_str("})");
        Ok(body)
    }

    /// Schema expression of a field, without modifiers.
    fn field_body(&self, def: &Definition, object: &Object, field: &Field) -> Result<String> {
        let ft = &field.field_type;

        if ft.is_object {
            return Ok(schema_ref(def, ft.bare_name()));
        }

        if let Some(map) = ft.map.as_ref().filter(|_| ft.is_map) {
            let element = map.bare_element_name();
            let value = if def.object(element).is_ok() {
                format!("{}Schema", camelize_down(element))
            } else {
                format!("z.{}()", map.element_type_ts)
            };
            let array = if map.element_is_multiple { ".array()" } else { "" };
            return Ok(format!("z.record(z.{}(), {value}{array})", map.key_type_ts));
        }

        if let Some(Value::Array(options)) = field.metadata.get("options") {
            let literals: Vec<String> = options.iter().map(enum_literal).collect();
            return Ok(format!("z.enum([{}])", literals.join(", ")));
        }

        if let Some(Value::String(custom)) = field.metadata.get("type") {
            return zod_custom_type(custom).ok_or_else(|| {
                InvariantError::UnknownCustomType {
                    object: object.name.clone(),
                    field: field.name.clone(),
                    name: custom.clone(),
                }
                .into()
            });
        }

        Ok(format!("z.{}()", ft.js_type))
    }
}

impl CodeGenerator for ZodEmitter {
    fn id(&self) -> &'static str {
        "zod"
    }

    fn name(&self) -> &'static str {
        "Zod Schema Generator"
    }

    fn file_extension(&self) -> &'static str {
        "ts"
    }

    fn generate(&self, def: &Definition, config: &GeneratorConfig) -> Result<GeneratedCode> {
        let nl = config.line_ending_str();
        let mut out = format!("import {{ z }} from \"zod\";{nl}");
        out.push_str(&format!(
            "import ZodTypes from \"{}\";{nl}{nl}",
            config.types_import
        ));

        let mut emitted = HashSet::new();
        for object in &def.objects {
            self.emit_object(def, &object.name, config, &mut out, &mut emitted)?;
        }

        Ok(GeneratedCode::new(out, emitted.len()))
    }
}

/// Schema of an object outside the definition: any object, kept as is.
pub const OPAQUE_OBJECT_SCHEMA: &str = "z.object({}).passthrough()";

/// Name of the schema for `object`, or the opaque schema when the
/// definition does not contain it.
fn schema_ref(def: &Definition, object: &str) -> String {
    if def.object(object).is_ok() {
        format!("{}Schema", camelize_down(object))
    } else {
        tracing::warn!(object, "object is not part of the definition; using an opaque schema");
        OPAQUE_OBJECT_SCHEMA.to_string()
    }
}

/// Modifier suffixes in their fixed order: arrays, nullable, optional.
pub fn modifiers(field: &Field) -> String {
    let mut suffix = ".array()".repeat(array_depth(field));
    if flag(&field.metadata, "nullable") {
        suffix.push_str(".nullable()");
    }
    if flag(&field.metadata, "optional") {
        suffix.push_str(".optional()");
    }
    suffix
}

fn array_depth(field: &Field) -> usize {
    if field.field_type.multiple {
        field.field_type.multiple_times
    } else {
        0
    }
}

fn is_excluded(field: &Field) -> bool {
    field.metadata.contains_key("exclude")
}

fn is_self_reference(field: &Field, object_name: &str) -> bool {
    field.field_type.is_object && field.field_type.bare_name() == object_name
}

fn enum_literal(option: &Value) -> String {
    let text = match option {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Value::String(text).to_string()
}
