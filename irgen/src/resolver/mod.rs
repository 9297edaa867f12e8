//! Type resolution: resolved type expressions become [`FieldType`]s.
//!
//! Resolving a field whose type names a struct registers that struct as an
//! [`Object`] (recursing into its own fields) the first time it is reached
//! without a pointer. Registration is guarded by name, so self- and
//! mutually-referential structs terminate.

mod vocabulary;

pub use vocabulary::{is_float, is_integer, Vocabulary};

use crate::error::BuildError;
use crate::example;
use crate::ir::{unqualified, Field, FieldTag, FieldType, FieldTypeMap, Object};
use crate::metadata;
use crate::naming::{camelize_down, snake_down};
use crate::source::{
    Declaration, DeclarationKind, DeclarationSource, FieldDecl, PackageRef, Position, ResolvedType,
    TypeRef,
};
use crate::tags::Tags;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Alias chains longer than this are left unexpanded.
const MAX_ALIAS_DEPTH: usize = 32;

// ============================================================================
// Object arena
// ============================================================================

/// Append-only store of registered objects, indexed by name.
#[derive(Debug, Default)]
pub(crate) struct ObjectArena {
    objects: Vec<Object>,
    index: HashMap<String, usize>,
    in_progress: HashSet<String>,
}

impl ObjectArena {
    /// Whether the name is registered or currently being registered.
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name) || self.in_progress.contains(name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Object> {
        self.index.get(name).map(|&i| &self.objects[i])
    }

    fn begin(&mut self, name: &str) {
        self.in_progress.insert(name.to_string());
    }

    fn push(&mut self, object: Object) {
        self.in_progress.remove(&object.name);
        self.index.insert(object.name.clone(), self.objects.len());
        self.objects.push(object);
    }

    pub(crate) fn into_objects(self) -> Vec<Object> {
        self.objects
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Walks resolved types of one unit and collects the objects they reach.
pub struct TypeResolver<'s> {
    source: &'s dyn DeclarationSource,
    objects: ObjectArena,
    imports: BTreeMap<String, String>,
}

impl<'s> TypeResolver<'s> {
    pub fn new(source: &'s dyn DeclarationSource) -> Self {
        Self {
            source,
            objects: ObjectArena::default(),
            imports: BTreeMap::new(),
        }
    }

    fn local(&self) -> &'s PackageRef {
        let source: &'s dyn DeclarationSource = self.source;
        source.package()
    }

    fn lookup_struct(&self, r: &TypeRef) -> Option<&'s Declaration> {
        let source: &'s dyn DeclarationSource = self.source;
        source.lookup(r).filter(|d| d.is_struct())
    }

    /// Registered objects in registration order, plus the external packages seen.
    pub fn finish(self) -> (Vec<Object>, BTreeMap<String, String>) {
        (self.objects.into_objects(), self.imports)
    }

    /// Describe a field, request or response type.
    pub fn resolve(
        &mut self,
        ty: &ResolvedType,
        position: Option<&Position>,
    ) -> Result<FieldType, BuildError> {
        let expanded = self.expand_aliases(ty, 0);
        let mut ft = FieldType::default();

        let mut typ = &expanded;
        while let ResolvedType::Sequence(inner) = typ {
            typ = inner;
            ft.multiple = true;
            ft.multiple_times += 1;
        }

        let original = typ;
        let mut is_pointer = false;
        if let ResolvedType::Pointer(inner) = typ {
            is_pointer = true;
            typ = inner;
            if let ResolvedType::Sequence(inner) = typ {
                typ = inner;
                ft.multiple = true;
                ft.multiple_times += 1;
            }
        }

        self.note_packages(&expanded, &mut ft);

        match typ {
            ResolvedType::Named(r) => {
                if let Some(decl) = self.lookup_struct(r) {
                    ft.is_object = true;
                    if !is_pointer {
                        self.register_object(decl)?;
                    }
                }
            }
            ResolvedType::Map { key, value } => {
                ft.is_map = true;
                ft.map = Some(self.resolve_map(key, value)?);
            }
            ResolvedType::AnonymousStruct => {
                return Err(BuildError::NestedStruct {
                    position: position.cloned(),
                });
            }
            _ => {}
        }

        let local = self.local();
        ft.type_name = original.type_string(local);
        ft.object_name = original.unqualified_string();
        ft.clean_object_name = typ.type_string(local);
        let bare = unqualified(&ft.clean_object_name);
        ft.object_name_lower_camel = camelize_down(bare);
        ft.object_name_lower_snake = snake_down(bare);
        let package_path = if ft.package.is_empty() {
            local.path.as_str()
        } else {
            ft.package.as_str()
        };
        ft.type_id = format!("{}.{}", package_path, bare);

        let vocabulary = if ft.is_object {
            Vocabulary::for_object(&ft.clean_object_name)
        } else {
            Vocabulary::for_type(&ft.clean_object_name)
        };
        ft.js_type = vocabulary.js;
        ft.ts_type = vocabulary.ts;
        ft.swift_type = vocabulary.swift;

        Ok(ft)
    }

    fn resolve_map(
        &mut self,
        key: &ResolvedType,
        value: &ResolvedType,
    ) -> Result<FieldTypeMap, BuildError> {
        let local = self.local();
        let (element, element_is_multiple) = match value {
            ResolvedType::Sequence(inner) => (inner.as_ref(), true),
            other => (other, false),
        };

        if let ResolvedType::Named(r) = element {
            if let Some(decl) = self.lookup_struct(r) {
                self.register_object(decl)?;
            }
        }

        let key_type = key.type_string(local);
        let element_type = element.type_string(local);
        let key_vocabulary = Vocabulary::for_type(&key_type);
        let element_vocabulary = Vocabulary::for_type(&element_type);

        Ok(FieldTypeMap {
            key_type,
            key_type_js: key_vocabulary.js,
            key_type_ts: key_vocabulary.ts,
            key_type_swift: key_vocabulary.swift,
            element_type,
            element_type_js: element_vocabulary.js,
            element_type_ts: element_vocabulary.ts,
            element_type_swift: element_vocabulary.swift,
            element_is_multiple,
        })
    }

    /// Register a struct declaration as an object, unless its name is taken.
    pub fn register_object(&mut self, decl: &'s Declaration) -> Result<(), BuildError> {
        let DeclarationKind::Struct(fields) = &decl.kind else {
            return Ok(());
        };
        let type_id = format!("{}.{}", decl.package.path, decl.name);

        if self.objects.contains(&decl.name) {
            match self.objects.get(&decl.name) {
                Some(existing) if existing.type_id != type_id => tracing::warn!(
                    object = %decl.name,
                    kept = %existing.type_id,
                    skipped = %type_id,
                    "object name already registered by another type; keeping the first"
                ),
                _ => tracing::trace!(object = %decl.name, "object already registered"),
            }
            return Ok(());
        }

        self.objects.begin(&decl.name);
        let doc = metadata::extract(&decl.doc);
        let mut object = Object {
            type_id,
            name: decl.name.clone(),
            name_lower_camel: camelize_down(&decl.name),
            name_lower_snake: snake_down(&decl.name),
            imported: decl.package.path != self.local().path,
            fields: Vec::with_capacity(fields.len()),
            comment: doc.comment,
            metadata: doc.metadata,
        };
        for field in fields {
            object.fields.push(self.build_field(&decl.name, field)?);
        }

        tracing::debug!(object = %object.name, fields = object.fields.len(), "registered object");
        self.objects.push(object);
        Ok(())
    }

    fn build_field(&mut self, object_name: &str, decl: &FieldDecl) -> Result<Field, BuildError> {
        if !decl.exported {
            return Err(BuildError::unexported_field(
                object_name,
                &decl.name,
                decl.position.clone(),
            ));
        }

        let tags = Tags::parse(&decl.tag).map_err(|source| BuildError::InvalidTag {
            object: object_name.to_string(),
            field: decl.name.clone(),
            tag: decl.tag.clone(),
            position: decl.position.clone(),
            source,
        })?;

        let mut field = Field {
            name: decl.name.clone(),
            name_lower_camel: camelize_down(&decl.name),
            name_lower_snake: snake_down(&decl.name),
            tag: decl.tag.clone(),
            ..Default::default()
        };
        if let Some(json) = tags.get("json") {
            if !json.name.is_empty() {
                field.name_lower_camel = json.name.clone();
                field.name_lower_snake = json.name.clone();
            }
            field.omit_empty = json.has_option("omitempty");
        }
        field.parsed_tags = tags
            .iter()
            .map(|t| {
                (
                    t.key.clone(),
                    FieldTag {
                        value: t.name.clone(),
                        options: t.options.clone(),
                    },
                )
            })
            .collect();

        let doc = metadata::extract(&decl.doc);
        field.comment = doc.comment;
        field.metadata = doc.metadata;

        field.field_type = self.resolve(&decl.ty, decl.position.as_ref())?;
        field.example = example::field_example(&field.field_type, field.metadata.get("example"));

        Ok(field)
    }

    /// Replace named aliases by their targets, everywhere in the type.
    fn expand_aliases(&self, ty: &ResolvedType, depth: usize) -> ResolvedType {
        match ty {
            ResolvedType::Named(r) => match self.source.lookup(r) {
                Some(Declaration {
                    kind: DeclarationKind::Alias(target),
                    ..
                }) if depth < MAX_ALIAS_DEPTH => self.expand_aliases(target, depth + 1),
                _ => ty.clone(),
            },
            ResolvedType::Pointer(inner) => ResolvedType::pointer(self.expand_aliases(inner, depth)),
            ResolvedType::Sequence(inner) => {
                ResolvedType::sequence(self.expand_aliases(inner, depth))
            }
            ResolvedType::Map { key, value } => ResolvedType::map(
                self.expand_aliases(key, depth),
                self.expand_aliases(value, depth),
            ),
            other => other.clone(),
        }
    }

    /// Record every external package the type mentions.
    fn note_packages(&mut self, ty: &ResolvedType, ft: &mut FieldType) {
        match ty {
            ResolvedType::Named(r) if r.package.path != self.local().path => {
                self.imports
                    .insert(r.package.path.clone(), r.package.name.clone());
                ft.package = r.package.path.clone();
            }
            ResolvedType::Pointer(inner) | ResolvedType::Sequence(inner) => {
                self.note_packages(inner, ft)
            }
            ResolvedType::Map { key, value } => {
                self.note_packages(key, ft);
                self.note_packages(value, ft);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Scalar, Unit};

    fn pkg() -> PackageRef {
        PackageRef::new("services", "example/services")
    }

    fn string() -> ResolvedType {
        ResolvedType::Scalar(Scalar::String)
    }

    fn unit() -> Unit {
        let p = pkg();
        Unit::new(p.clone())
            .with(Declaration::structure(
                &p,
                "Greeting",
                vec![FieldDecl::new("Text", string())],
            ))
            .with(Declaration::structure(
                &p,
                "Node",
                vec![
                    FieldDecl::new("Name", string()),
                    FieldDecl::new("Children", ResolvedType::sequence(ResolvedType::named(&p, "Node"))),
                ],
            ))
            .with(Declaration::alias(&p, "Status", string()))
    }

    #[test]
    fn test_resolve_scalar() {
        let unit = unit();
        let mut resolver = TypeResolver::new(&unit);
        let ft = resolver
            .resolve(&ResolvedType::Scalar(Scalar::Int64), None)
            .unwrap();
        assert_eq!(ft.type_name, "int64");
        assert_eq!(ft.clean_object_name, "int64");
        assert_eq!(ft.type_id, "example/services.int64");
        assert_eq!(ft.js_type, "number");
        assert_eq!(ft.swift_type, "Double");
        assert!(!ft.is_object && !ft.multiple);
    }

    #[test]
    fn test_resolve_nested_sequences() {
        let unit = unit();
        let mut resolver = TypeResolver::new(&unit);
        let ty = ResolvedType::sequence(ResolvedType::sequence(string()));
        let ft = resolver.resolve(&ty, None).unwrap();
        assert!(ft.multiple);
        assert_eq!(ft.multiple_times, 2);
        assert_eq!(ft.type_name, "string");
    }

    #[test]
    fn test_resolve_pointer_to_sequence_counts_as_multiple() {
        let unit = unit();
        let mut resolver = TypeResolver::new(&unit);
        let ty = ResolvedType::pointer(ResolvedType::sequence(string()));
        let ft = resolver.resolve(&ty, None).unwrap();
        assert!(ft.multiple);
        assert_eq!(ft.multiple_times, 1);
        assert!(ft.is_optional());
        assert_eq!(ft.clean_object_name, "string");
        assert_eq!(ft.js_type, "string");
    }

    #[test]
    fn test_resolve_object_registers_it() {
        let unit = unit();
        let mut resolver = TypeResolver::new(&unit);
        let ft = resolver
            .resolve(&ResolvedType::named(&pkg(), "Greeting"), None)
            .unwrap();
        assert!(ft.is_object);
        assert_eq!(ft.js_type, "object");
        assert_eq!(ft.ts_type, "Greeting");
        assert_eq!(ft.object_name_lower_camel, "greeting");

        let (objects, _) = resolver.finish();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].type_id, "example/services.Greeting");
    }

    #[test]
    fn test_pointer_to_object_does_not_register() {
        let unit = unit();
        let mut resolver = TypeResolver::new(&unit);
        let ft = resolver
            .resolve(&ResolvedType::pointer(ResolvedType::named(&pkg(), "Greeting")), None)
            .unwrap();
        assert!(ft.is_object);
        assert_eq!(ft.type_name, "*Greeting");
        assert_eq!(ft.clean_object_name, "Greeting");
        assert!(resolver.finish().0.is_empty());
    }

    #[test]
    fn test_self_reference_terminates() {
        let unit = unit();
        let mut resolver = TypeResolver::new(&unit);
        resolver
            .resolve(&ResolvedType::named(&pkg(), "Node"), None)
            .unwrap();
        let (objects, _) = resolver.finish();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].fields[1].field_type.clean_object_name, "Node");
    }

    #[test]
    fn test_anonymous_struct_is_rejected() {
        let unit = unit();
        let mut resolver = TypeResolver::new(&unit);
        let err = resolver
            .resolve(&ResolvedType::AnonymousStruct, None)
            .unwrap_err();
        assert!(matches!(err, BuildError::NestedStruct { .. }));
    }

    #[test]
    fn test_alias_is_transparent() {
        let unit = unit();
        let mut resolver = TypeResolver::new(&unit);
        let ft = resolver
            .resolve(&ResolvedType::named(&pkg(), "Status"), None)
            .unwrap();
        assert_eq!(ft.type_name, "string");
        assert_eq!(ft.js_type, "string");
    }

    #[test]
    fn test_map_of_object_sequences() {
        let unit = unit();
        let mut resolver = TypeResolver::new(&unit);
        let ty = ResolvedType::map(
            string(),
            ResolvedType::sequence(ResolvedType::named(&pkg(), "Greeting")),
        );
        let ft = resolver.resolve(&ty, None).unwrap();
        let map = ft.map.as_ref().unwrap();
        assert!(ft.is_map);
        assert_eq!(map.key_type_ts, "string");
        assert_eq!(map.element_type, "Greeting");
        assert!(map.element_is_multiple);
        assert_eq!(ft.js_type, "object");

        let (objects, _) = resolver.finish();
        assert_eq!(objects[0].name, "Greeting");
    }

    #[test]
    fn test_external_package_is_imported() {
        let p = pkg();
        let shared = PackageRef::new("shared", "example/services/shared");
        let unit = Unit::new(p.clone()).with(Declaration::structure(
            &shared,
            "Page",
            vec![FieldDecl::new("Cursor", string())],
        ));
        let mut resolver = TypeResolver::new(&unit);
        let ft = resolver
            .resolve(&ResolvedType::named(&shared, "Page"), None)
            .unwrap();
        assert_eq!(ft.type_name, "shared.Page");
        assert_eq!(ft.object_name, "Page");
        assert_eq!(ft.package, "example/services/shared");
        assert_eq!(ft.type_id, "example/services/shared.Page");

        let (objects, imports) = resolver.finish();
        assert!(objects[0].imported);
        assert_eq!(imports["example/services/shared"], "shared");
    }
}
