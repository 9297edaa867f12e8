//! Rust source loader.
//!
//! Turns parsed Rust files into the declarations of one package:
//!
//! - `trait` items are interfaces; every `fn` is a method whose parameters
//!   exclude the receiver. `()` or no return type means no results, a tuple
//!   means one result per element, and `Result<T, E>` counts as `T`.
//! - `struct` items with named fields are structs. Unit structs are empty
//!   structs and single-field tuple structs are aliases of their field.
//! - `type` aliases and enums whose variants carry no data are aliases, the
//!   latter of `string`.
//! - Inline `mod name { ... }` blocks declare items of an external package
//!   called `name`; paths such as `name::Page` refer to them.
//!
//! Resolution is by name only. `Vec<T>` and friends are sequences, `Option<T>`
//! is optional, smart pointers and references are transparent, tuples are
//! anonymous structs and `serde_json::Value` is `any`.

use crate::error::LoadError;
use crate::scanner::SourceFile;
use irgen::source::{
    Declaration, FieldDecl, MethodDecl, PackageRef, Position, ResolvedType, Scalar, Unit,
};
use irgen::tags::Tag;
use std::path::Path;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{
    Attribute, Expr, ExprLit, Fields, FnArg, GenericArgument, Item, ItemEnum, ItemStruct,
    ItemTrait, Lit, Meta, PathArguments, ReturnType, TraitItem, Type,
};

/// Loads Rust sources into a [`Unit`].
#[derive(Debug, Clone)]
pub struct RustLoader {
    package: PackageRef,
}

impl RustLoader {
    pub fn new(package: PackageRef) -> Self {
        Self { package }
    }

    pub fn package(&self) -> &PackageRef {
        &self.package
    }

    /// Load every source file, collecting errors across files.
    pub fn load(&self, sources: &[SourceFile]) -> Result<Unit, LoadError> {
        let mut unit = Unit::new(self.package.clone());
        let mut errors = Vec::new();

        for source in sources {
            if let Err(e) = self.load_source(&source.content, &source.path, &mut unit) {
                errors.push(e);
            }
        }

        match errors.len() {
            0 => {
                tracing::debug!(package = %self.package.name, declarations = unit.len(), "loaded package");
                Ok(unit)
            }
            1 => Err(errors.remove(0)),
            _ => Err(LoadError::Multiple(errors)),
        }
    }

    /// Parse one file and add its declarations to `unit`.
    pub fn load_source(&self, content: &str, file: &Path, unit: &mut Unit) -> Result<(), LoadError> {
        let syntax = syn::parse_file(content).map_err(|e| {
            let start = e.span().start();
            LoadError::syntax(file.to_path_buf(), start.line, start.column + 1, e.to_string())
        })?;

        let package = self.package.clone();
        self.load_items(&syntax.items, &package, file, unit)
    }

    fn load_items(
        &self,
        items: &[Item],
        package: &PackageRef,
        file: &Path,
        unit: &mut Unit,
    ) -> Result<(), LoadError> {
        for item in items {
            match item {
                Item::Trait(item) => unit.add(self.load_trait(item, package, file)?),
                Item::Struct(item) => unit.add(self.load_struct(item, package, file)?),
                Item::Enum(item) => {
                    if let Some(decl) = self.load_enum(item, package, file) {
                        unit.add(decl);
                    }
                }
                Item::Type(item) => {
                    let target = self.resolve(&item.ty, package, file)?;
                    unit.add(
                        Declaration::alias(package, item.ident.to_string(), target)
                            .with_doc(doc_comment(&item.attrs))
                            .with_position(position(file, item.ident.span())),
                    );
                }
                Item::Mod(item) => {
                    let Some((_, items)) = &item.content else {
                        continue;
                    };
                    if item.attrs.iter().any(|a| a.path().is_ident("cfg")) {
                        continue;
                    }
                    let module = self.module_package(&item.ident.to_string());
                    self.load_items(items, &module, file, unit)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn load_trait(
        &self,
        item: &ItemTrait,
        package: &PackageRef,
        file: &Path,
    ) -> Result<Declaration, LoadError> {
        let mut methods = Vec::new();
        for trait_item in &item.items {
            let TraitItem::Fn(f) = trait_item else {
                continue;
            };
            let params = f
                .sig
                .inputs
                .iter()
                .filter_map(|arg| match arg {
                    FnArg::Typed(pat) => Some(self.resolve(&pat.ty, package, file)),
                    FnArg::Receiver(_) => None,
                })
                .collect::<Result<Vec<_>, _>>()?;
            let results = self.results(&f.sig.output, package, file)?;

            methods.push(
                MethodDecl::with_signature(f.sig.ident.to_string(), params, results)
                    .with_doc(doc_comment(&f.attrs))
                    .with_position(position(file, f.sig.ident.span())),
            );
        }

        Ok(Declaration::interface(package, item.ident.to_string(), methods)
            .with_doc(doc_comment(&item.attrs))
            .with_position(position(file, item.ident.span())))
    }

    fn results(
        &self,
        output: &ReturnType,
        package: &PackageRef,
        file: &Path,
    ) -> Result<Vec<ResolvedType>, LoadError> {
        let ReturnType::Type(_, ty) = output else {
            return Ok(Vec::new());
        };
        match success_type(ty) {
            Type::Tuple(tuple) => tuple
                .elems
                .iter()
                .map(|ty| self.resolve(ty, package, file))
                .collect(),
            ty => Ok(vec![self.resolve(ty, package, file)?]),
        }
    }

    fn load_struct(
        &self,
        item: &ItemStruct,
        package: &PackageRef,
        file: &Path,
    ) -> Result<Declaration, LoadError> {
        let name = item.ident.to_string();
        let decl = match &item.fields {
            Fields::Named(named) => {
                let fields = named
                    .named
                    .iter()
                    .map(|f| self.load_field(f, package, file))
                    .collect::<Result<Vec<_>, _>>()?;
                Declaration::structure(package, name, fields)
            }
            Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
                let target = self.resolve(&unnamed.unnamed[0].ty, package, file)?;
                Declaration::alias(package, name, target)
            }
            Fields::Unnamed(_) => Declaration::alias(package, name, ResolvedType::AnonymousStruct),
            Fields::Unit => Declaration::structure(package, name, Vec::new()),
        };

        Ok(decl
            .with_doc(doc_comment(&item.attrs))
            .with_position(position(file, item.ident.span())))
    }

    fn load_field(
        &self,
        field: &syn::Field,
        package: &PackageRef,
        file: &Path,
    ) -> Result<FieldDecl, LoadError> {
        let span = field.ident.as_ref().map_or_else(|| field.span(), |i| i.span());
        let name = field
            .ident
            .as_ref()
            .map(|i| i.to_string().trim_start_matches("r#").to_string())
            .unwrap_or_default();

        let mut decl = FieldDecl::new(name, self.resolve(&field.ty, package, file)?)
            .with_doc(doc_comment(&field.attrs))
            .with_tag(field_tag(&field.attrs, file)?)
            .with_position(position(file, span));
        if !matches!(field.vis, syn::Visibility::Public(_)) {
            decl = decl.unexported();
        }
        Ok(decl)
    }

    fn load_enum(&self, item: &ItemEnum, package: &PackageRef, file: &Path) -> Option<Declaration> {
        if item.variants.iter().any(|v| !matches!(v.fields, Fields::Unit)) {
            tracing::debug!(name = %item.ident, "skipping enum with data-carrying variants");
            return None;
        }
        Some(
            Declaration::alias(package, item.ident.to_string(), ResolvedType::Scalar(Scalar::String))
                .with_doc(doc_comment(&item.attrs))
                .with_position(position(file, item.ident.span())),
        )
    }

    /// Describe a type expression.
    pub fn resolve(&self, ty: &Type, package: &PackageRef, file: &Path) -> Result<ResolvedType, LoadError> {
        match ty {
            Type::Reference(r) => self.resolve(&r.elem, package, file),
            Type::Paren(p) => self.resolve(&p.elem, package, file),
            Type::Group(g) => self.resolve(&g.elem, package, file),
            Type::Slice(s) => Ok(ResolvedType::sequence(self.resolve(&s.elem, package, file)?)),
            Type::Array(a) => Ok(ResolvedType::sequence(self.resolve(&a.elem, package, file)?)),
            Type::Tuple(_) => Ok(ResolvedType::AnonymousStruct),
            Type::Path(p) if p.qself.is_none() => self.resolve_path(&p.path, package, file),
            other => {
                let kind = match other {
                    Type::BareFn(_) => "function pointer",
                    Type::ImplTrait(_) => "impl Trait",
                    Type::TraitObject(_) => "trait object",
                    Type::Ptr(_) => "raw pointer",
                    Type::Never(_) => "never type",
                    Type::Macro(_) => "type macro",
                    Type::Infer(_) => "inferred type",
                    Type::Path(_) => "qualified path",
                    _ => "type expression",
                };
                Err(LoadError::unsupported_type(
                    file.to_path_buf(),
                    other.span().start().line,
                    kind,
                ))
            }
        }
    }

    fn resolve_path(
        &self,
        path: &syn::Path,
        package: &PackageRef,
        file: &Path,
    ) -> Result<ResolvedType, LoadError> {
        let rooted = path
            .segments
            .first()
            .is_some_and(|s| s.ident == "crate" || s.ident == "super");
        let segments: Vec<_> = path
            .segments
            .iter()
            .filter(|s| s.ident != "crate" && s.ident != "self" && s.ident != "super")
            .collect();
        let Some(last) = segments.last() else {
            return Err(LoadError::unsupported_type(
                file.to_path_buf(),
                path.span().start().line,
                "empty path",
            ));
        };

        let name = last.ident.to_string();
        let args = type_args(&last.arguments);
        if let (Some(s), true) = (scalar(&name), args.is_empty()) {
            return Ok(ResolvedType::Scalar(s));
        }

        match (name.as_str(), args.as_slice()) {
            ("Option", [inner]) => Ok(ResolvedType::pointer(self.resolve(inner, package, file)?)),
            ("Vec" | "VecDeque" | "LinkedList" | "HashSet" | "BTreeSet" | "IndexSet", [inner, ..]) => {
                Ok(ResolvedType::sequence(self.resolve(inner, package, file)?))
            }
            ("Box" | "Rc" | "Arc" | "Cow", [inner]) => self.resolve(inner, package, file),
            ("HashMap" | "BTreeMap" | "IndexMap", [key, value, ..]) => Ok(ResolvedType::map(
                self.resolve(key, package, file)?,
                self.resolve(value, package, file)?,
            )),
            ("Value", []) => Ok(ResolvedType::Scalar(Scalar::Any)),
            _ if segments.len() >= 2 => {
                let module = segments[segments.len() - 2].ident.to_string();
                Ok(ResolvedType::named(&self.module_package(&module), name))
            }
            _ if rooted => Ok(ResolvedType::named(&self.package, name)),
            _ => Ok(ResolvedType::named(package, name)),
        }
    }

    fn module_package(&self, module: &str) -> PackageRef {
        PackageRef::new(module, format!("{}/{}", self.package.path, module))
    }
}

/// Canonical scalar for a Rust primitive or standard string type.
fn scalar(name: &str) -> Option<Scalar> {
    Some(match name {
        "String" | "str" | "char" => Scalar::String,
        "bool" => Scalar::Bool,
        "isize" => Scalar::Int,
        "i8" => Scalar::Int8,
        "i16" => Scalar::Int16,
        "i32" => Scalar::Int32,
        "i64" | "i128" => Scalar::Int64,
        "usize" => Scalar::Uint,
        "u8" => Scalar::Uint8,
        "u16" => Scalar::Uint16,
        "u32" => Scalar::Uint32,
        "u64" | "u128" => Scalar::Uint64,
        "f32" => Scalar::Float32,
        "f64" => Scalar::Float64,
        _ => return None,
    })
}

fn type_args(arguments: &PathArguments) -> Vec<&Type> {
    match arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|a| match a {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// `T` for `Result<T, E>`, otherwise the type itself.
fn success_type(ty: &Type) -> &Type {
    if let Type::Path(p) = ty {
        if let Some(last) = p.path.segments.last() {
            if last.ident == "Result" {
                if let Some(ok) = type_args(&last.arguments).first() {
                    return ok;
                }
            }
        }
    }
    ty
}

fn position(file: &Path, span: proc_macro2::Span) -> Position {
    let start = span.start();
    Position::new(file, start.line, start.column + 1)
}

/// Joined `///` lines, each without its first leading space.
fn doc_comment(attrs: &[Attribute]) -> String {
    let mut lines = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("doc")) {
        let Meta::NameValue(nv) = &attr.meta else {
            continue;
        };
        let Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) = &nv.value
        else {
            continue;
        };
        for line in s.value().lines() {
            lines.push(line.strip_prefix(' ').unwrap_or(line).to_string());
        }
    }
    lines.join("\n")
}

/// Tag string for a field: a `json` entry derived from serde attributes,
/// followed by raw `#[irgen(tag = "...")]` strings.
fn field_tag(attrs: &[Attribute], file: &Path) -> Result<String, LoadError> {
    let mut rename = None;
    let mut omit_empty = false;
    let mut raw = Vec::new();

    for attr in attrs {
        let result = if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") && meta.input.peek(syn::Token![=]) {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    rename = Some(value.value());
                    Ok(())
                } else if meta.path.is_ident("skip_serializing_if") {
                    omit_empty = true;
                    skip_meta(&meta)
                } else {
                    skip_meta(&meta)
                }
            })
        } else if attr.path().is_ident("irgen") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("tag") {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    raw.push(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unknown irgen attribute, expected `tag`"))
                }
            })
        } else {
            Ok(())
        };
        result.map_err(|e| {
            LoadError::attribute(file.to_path_buf(), e.span().start().line, e.to_string())
        })?;
    }

    let mut parts = Vec::new();
    if rename.is_some() || omit_empty {
        let json = Tag {
            key: "json".to_string(),
            name: rename.unwrap_or_default(),
            options: if omit_empty {
                vec!["omitempty".to_string()]
            } else {
                Vec::new()
            },
        };
        parts.push(json.to_string());
    }
    parts.extend(raw);
    Ok(parts.join(" "))
}

/// Consume the value of an attribute entry we do not interpret.
fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        meta.value()?.parse::<Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use irgen::source::{DeclarationKind, DeclarationSource, TypeRef};
    use std::path::PathBuf;

    fn pkg() -> PackageRef {
        PackageRef::new("services", "services")
    }

    fn load(code: &str) -> Unit {
        let mut unit = Unit::new(pkg());
        RustLoader::new(pkg())
            .load_source(code, &PathBuf::from("test.rs"), &mut unit)
            .unwrap();
        unit
    }

    fn find<'u>(unit: &'u Unit, name: &str) -> &'u Declaration {
        unit.lookup(&TypeRef {
            package: pkg(),
            name: name.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_trait_becomes_interface() {
        let unit = load(
            r#"
            /// GreeterService is a polite API.
            pub trait GreeterService {
                /// Greet prepares a lovely greeting.
                fn greet(&self, request: GreetRequest) -> GreetResponse;
                fn ping(&self);
                fn pair(&self) -> (GreetRequest, GreetResponse);
                async fn fallible(&self, request: GreetRequest) -> Result<GreetResponse, Error>;
            }
            "#,
        );

        let decl = find(&unit, "GreeterService");
        assert_eq!(decl.doc, "GreeterService is a polite API.");
        let DeclarationKind::Interface(methods) = &decl.kind else {
            panic!("expected interface");
        };
        assert_eq!(methods[0].name, "greet");
        assert_eq!(methods[0].doc, "Greet prepares a lovely greeting.");
        assert_eq!(methods[0].params, [ResolvedType::named(&pkg(), "GreetRequest")]);
        assert_eq!(methods[0].results, [ResolvedType::named(&pkg(), "GreetResponse")]);
        assert!(methods[1].params.is_empty() && methods[1].results.is_empty());
        assert_eq!(methods[2].results.len(), 2);
        assert_eq!(methods[3].results, [ResolvedType::named(&pkg(), "GreetResponse")]);
        assert_eq!(methods[0].position.as_ref().map(|p| p.line), Some(5));
    }

    #[test]
    fn test_struct_fields() {
        let unit = load(
            r#"
            pub struct User {
                /// The display name.
                /// example: "Mat"
                #[serde(rename = "fullName", skip_serializing_if = "String::is_empty")]
                pub name: String,
                pub tags: Vec<String>,
                pub nickname: Option<String>,
                pub scores: HashMap<String, Vec<u32>>,
                pub extra: serde_json::Value,
                #[irgen(tag = "db:\"user_id\"")]
                pub id: Box<u64>,
                secret: String,
            }
            "#,
        );

        let DeclarationKind::Struct(fields) = &find(&unit, "User").kind else {
            panic!("expected struct");
        };
        assert_eq!(fields[0].doc, "The display name.\nexample: \"Mat\"");
        assert_eq!(fields[0].tag, r#"json:"fullName,omitempty""#);
        assert_eq!(fields[1].ty, ResolvedType::sequence(ResolvedType::Scalar(Scalar::String)));
        assert_eq!(fields[2].ty, ResolvedType::pointer(ResolvedType::Scalar(Scalar::String)));
        assert_eq!(
            fields[3].ty,
            ResolvedType::map(
                ResolvedType::Scalar(Scalar::String),
                ResolvedType::sequence(ResolvedType::Scalar(Scalar::Uint32)),
            )
        );
        assert_eq!(fields[4].ty, ResolvedType::Scalar(Scalar::Any));
        assert_eq!(fields[5].tag, r#"db:"user_id""#);
        assert_eq!(fields[5].ty, ResolvedType::Scalar(Scalar::Uint64));
        assert!(fields[0].exported);
        assert!(!fields[6].exported);
    }

    #[test]
    fn test_aliases() {
        let unit = load(
            r#"
            pub type Names = Vec<String>;
            pub struct UserId(pub String);
            pub struct Empty;
            pub enum Status { Active, Disabled }
            pub enum Shape { Circle(f64) }
            "#,
        );

        assert_eq!(
            find(&unit, "Names").kind,
            DeclarationKind::Alias(ResolvedType::sequence(ResolvedType::Scalar(Scalar::String)))
        );
        assert_eq!(
            find(&unit, "UserId").kind,
            DeclarationKind::Alias(ResolvedType::Scalar(Scalar::String))
        );
        assert_eq!(find(&unit, "Empty").kind, DeclarationKind::Struct(vec![]));
        assert_eq!(
            find(&unit, "Status").kind,
            DeclarationKind::Alias(ResolvedType::Scalar(Scalar::String))
        );
        assert!(unit
            .lookup(&TypeRef { package: pkg(), name: "Shape".into() })
            .is_none());
    }

    #[test]
    fn test_inline_modules_are_external_packages() {
        let unit = load(
            r#"
            pub struct ListRequest {
                pub page: shared::Page,
            }

            pub mod shared {
                pub struct Page {
                    pub size: usize,
                }
            }
            "#,
        );

        let shared = PackageRef::new("shared", "services/shared");
        let DeclarationKind::Struct(fields) = &find(&unit, "ListRequest").kind else {
            panic!("expected struct");
        };
        assert_eq!(fields[0].ty, ResolvedType::named(&shared, "Page"));
        assert!(unit
            .lookup(&TypeRef { package: shared, name: "Page".into() })
            .is_some());
        assert_eq!(unit.len(), 1);
    }

    #[test]
    fn test_syntax_error_has_location() {
        let mut unit = Unit::new(pkg());
        let err = RustLoader::new(pkg())
            .load_source("pub struct {", &PathBuf::from("broken.rs"), &mut unit)
            .unwrap_err();
        assert!(matches!(err, LoadError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_unsupported_type() {
        let mut unit = Unit::new(pkg());
        let err = RustLoader::new(pkg())
            .load_source(
                "pub struct Callback { pub f: fn() -> u8 }",
                &PathBuf::from("cb.rs"),
                &mut unit,
            )
            .unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedType { ref type_name, .. } if type_name == "function pointer"));
    }
}
