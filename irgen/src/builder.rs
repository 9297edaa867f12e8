//! Definition builder.
//!
//! Walks every declaration of a unit once: interfaces become services,
//! structs become objects. Once all declarations are seen, objects owned by
//! excluded services are pruned, services are sorted by name, and every
//! response object gets the synthetic `Error` field.
//!
//! # Example
//!
//! ```rust
//! use irgen::builder::DefinitionBuilder;
//! use irgen::source::{Declaration, FieldDecl, MethodDecl, PackageRef, ResolvedType, Scalar, Unit};
//!
//! let pkg = PackageRef::new("services", "example/services");
//! let unit = Unit::new(pkg.clone())
//!     .with(Declaration::interface(&pkg, "GreeterService", vec![MethodDecl::new(
//!         "Greet",
//!         ResolvedType::named(&pkg, "GreetRequest"),
//!         ResolvedType::named(&pkg, "GreetResponse"),
//!     )]))
//!     .with(Declaration::structure(&pkg, "GreetRequest", vec![
//!         FieldDecl::new("Name", ResolvedType::Scalar(Scalar::String)),
//!     ]))
//!     .with(Declaration::structure(&pkg, "GreetResponse", vec![
//!         FieldDecl::new("Greeting", ResolvedType::Scalar(Scalar::String)),
//!     ]));
//!
//! let def = DefinitionBuilder::new().build(&unit).unwrap();
//! assert_eq!(def.services[0].methods[0].name_lower_camel, "greet");
//! assert!(def.object("GreetResponse").unwrap().field("Error").is_some());
//! ```

use crate::error::BuildError;
use crate::ir::{Definition, Field, FieldType, Method, Object, Service};
use crate::metadata::{self, Metadata};
use crate::naming::{camelize_down, snake_down};
use crate::resolver::TypeResolver;
use crate::source::{Declaration, DeclarationKind, DeclarationSource, MethodDecl};
use serde_json::Value;
use std::collections::BTreeSet;

/// Comment carried by the synthetic `Error` field of response objects.
pub const ERROR_FIELD_COMMENT: &str =
    "Error is string explaining what went wrong. Empty if everything was fine.";

/// Example value of the synthetic `Error` field.
pub const ERROR_FIELD_EXAMPLE: &str = "something went wrong";

/// Builds a [`Definition`] from a [`DeclarationSource`].
#[derive(Debug, Clone, Default)]
pub struct DefinitionBuilder {
    exclude_interfaces: Vec<String>,
}

impl DefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interfaces that are checked but left out of the definition.
    pub fn exclude_interfaces<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_interfaces
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn build(&self, source: &dyn DeclarationSource) -> Result<Definition, BuildError> {
        let mut resolver = TypeResolver::new(source);
        let mut services = Vec::new();
        let mut excluded_ids = BTreeSet::new();
        let mut kept_ids = BTreeSet::new();
        let mut output_objects = BTreeSet::new();

        for decl in source.declarations() {
            match &decl.kind {
                DeclarationKind::Interface(methods) => {
                    let service = build_service(&mut resolver, decl, methods)?;
                    let excluded = self.exclude_interfaces.contains(&decl.name);
                    let ids = if excluded {
                        &mut excluded_ids
                    } else {
                        &mut kept_ids
                    };
                    for method in &service.methods {
                        output_objects.insert(method.output_object.bare_name().to_string());
                        ids.insert(method.input_object.type_id.clone());
                        ids.insert(method.output_object.type_id.clone());
                    }
                    if excluded {
                        tracing::debug!(service = %decl.name, "excluding service");
                        continue;
                    }
                    services.push(service);
                }
                DeclarationKind::Struct(_) => resolver.register_object(decl)?,
                DeclarationKind::Alias(_) => {}
            }
        }

        let (mut objects, imports) = resolver.finish();
        prune_excluded(&mut objects, &excluded_ids, &kept_ids);

        services.sort_by(|a, b| a.name.cmp(&b.name));

        for name in &output_objects {
            if let Some(object) = objects.iter_mut().find(|o| &o.name == name) {
                object.fields.push(error_field());
            }
        }

        Ok(Definition {
            package_name: source.package().name.clone(),
            services,
            objects,
            imports,
        })
    }
}

fn build_service(
    resolver: &mut TypeResolver<'_>,
    decl: &Declaration,
    methods: &[MethodDecl],
) -> Result<Service, BuildError> {
    let doc = metadata::extract(&decl.doc);
    let methods = methods
        .iter()
        .map(|m| build_method(resolver, &decl.name, m))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Service {
        name: decl.name.clone(),
        methods,
        comment: doc.comment,
        metadata: doc.metadata,
    })
}

fn build_method(
    resolver: &mut TypeResolver<'_>,
    service: &str,
    decl: &MethodDecl,
) -> Result<Method, BuildError> {
    let doc = metadata::extract(&decl.doc);
    let invalid =
        || BuildError::invalid_method_signature(service, &decl.name, decl.position.clone());

    let [input] = decl.params.as_slice() else {
        return Err(invalid());
    };
    let input_object = resolver.resolve(input, decl.position.as_ref())?;

    let [output] = decl.results.as_slice() else {
        return Err(invalid());
    };
    let output_object = resolver.resolve(output, decl.position.as_ref())?;

    Ok(Method {
        name: decl.name.clone(),
        name_lower_camel: camelize_down(&decl.name),
        name_lower_snake: snake_down(&decl.name),
        input_object,
        output_object,
        comment: doc.comment,
        metadata: doc.metadata,
    })
}

/// Drop objects whose identity is a request or response of an excluded
/// service, unless a kept service uses the same identity or a surviving
/// object refers to it (through a field or a map element).
fn prune_excluded(
    objects: &mut Vec<Object>,
    excluded_ids: &BTreeSet<String>,
    kept_ids: &BTreeSet<String>,
) {
    for id in excluded_ids.iter().filter(|id| kept_ids.contains(*id)) {
        tracing::warn!(
            type_id = %id,
            "object is used by an excluded service and by a kept one; keeping it"
        );
    }
    let candidates: BTreeSet<&str> = excluded_ids
        .iter()
        .filter(|id| !kept_ids.contains(*id))
        .map(String::as_str)
        .collect();
    if candidates.is_empty() {
        return;
    }

    let mut reachable: BTreeSet<String> = BTreeSet::new();
    let mut queue: Vec<&Object> = objects
        .iter()
        .filter(|o| !candidates.contains(o.type_id.as_str()))
        .collect();
    while let Some(object) = queue.pop() {
        if !reachable.insert(object.type_id.clone()) {
            continue;
        }
        for referenced in references(object, objects.as_slice()) {
            if candidates.contains(referenced.type_id.as_str()) {
                tracing::warn!(
                    type_id = %referenced.type_id,
                    by = %object.name,
                    "object of an excluded service is referenced by a kept object; keeping it"
                );
            }
            queue.push(referenced);
        }
    }

    objects.retain(|o| reachable.contains(&o.type_id));
}

/// Objects that `object`'s fields refer to directly or as map elements.
fn references<'o>(object: &Object, objects: &'o [Object]) -> Vec<&'o Object> {
    object
        .fields
        .iter()
        .filter_map(|field| {
            let ft = &field.field_type;
            if ft.is_object {
                objects.iter().find(|o| o.type_id == ft.type_id)
            } else {
                let element = ft.map.as_ref()?.bare_element_name();
                objects.iter().find(|o| o.name == element)
            }
        })
        .collect()
}

fn error_field() -> Field {
    let string = "string".to_string();
    Field {
        name: "Error".to_string(),
        name_lower_camel: "error".to_string(),
        name_lower_snake: "error".to_string(),
        field_type: FieldType {
            type_name: string.clone(),
            object_name: string.clone(),
            clean_object_name: string.clone(),
            object_name_lower_camel: string.clone(),
            object_name_lower_snake: string.clone(),
            js_type: string.clone(),
            ts_type: string,
            swift_type: "String".to_string(),
            ..Default::default()
        },
        omit_empty: true,
        comment: ERROR_FIELD_COMMENT.to_string(),
        example: Value::String(ERROR_FIELD_EXAMPLE.to_string()),
        metadata: Metadata::new(),
        ..Default::default()
    }
}
