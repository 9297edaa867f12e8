//! Resolved-type view of a compilation unit.
//!
//! The resolver never parses source text. A front end describes each unit as
//! a set of [`Declaration`]s whose field, parameter and result types are
//! already resolved into [`ResolvedType`] trees, and hands them over through
//! the [`DeclarationSource`] trait. [`Unit`] is the in-memory implementation
//! used by the CLI loader and by tests.
//!
//! Type strings use a small language-neutral notation: `[]T` for sequences,
//! `*T` for optional (pointer) values, `map[K]V` for maps and `pkg.Name` for
//! names declared in another package.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;

// ============================================================================
// Packages and positions
// ============================================================================

/// A package (module) that declarations belong to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageRef {
    /// Short name used to qualify types, e.g. `shared`.
    pub name: String,
    /// Unique path of the package, e.g. `services/shared`.
    pub path: String,
}

impl PackageRef {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Source location for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// File path.
    pub file: PathBuf,

    /// Line number (1-indexed).
    pub line: usize,

    /// Column number (1-indexed).
    pub column: usize,
}

impl Position {
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

// ============================================================================
// Resolved types
// ============================================================================

/// Built-in scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    String,
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    /// Any JSON value.
    Any,
}

impl Scalar {
    /// Canonical name of the scalar.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scalar::String => "string",
            Scalar::Bool => "bool",
            Scalar::Int => "int",
            Scalar::Int8 => "int8",
            Scalar::Int16 => "int16",
            Scalar::Int32 => "int32",
            Scalar::Int64 => "int64",
            Scalar::Uint => "uint",
            Scalar::Uint8 => "uint8",
            Scalar::Uint16 => "uint16",
            Scalar::Uint32 => "uint32",
            Scalar::Uint64 => "uint64",
            Scalar::Float32 => "float32",
            Scalar::Float64 => "float64",
            Scalar::Any => "any",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Scalar::Int
                | Scalar::Int8
                | Scalar::Int16
                | Scalar::Int32
                | Scalar::Int64
                | Scalar::Uint
                | Scalar::Uint8
                | Scalar::Uint16
                | Scalar::Uint32
                | Scalar::Uint64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Scalar::Float32 | Scalar::Float64)
    }
}

/// Reference to a named declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub package: PackageRef,
    pub name: String,
}

/// A fully resolved type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedType {
    Scalar(Scalar),
    /// A named declaration, looked up through the [`DeclarationSource`].
    Named(TypeRef),
    /// An inline struct literal (or tuple) with no name of its own.
    AnonymousStruct,
    /// An optional value.
    Pointer(Box<ResolvedType>),
    Sequence(Box<ResolvedType>),
    Map {
        key: Box<ResolvedType>,
        value: Box<ResolvedType>,
    },
}

impl ResolvedType {
    pub fn named(package: &PackageRef, name: impl Into<String>) -> Self {
        ResolvedType::Named(TypeRef {
            package: package.clone(),
            name: name.into(),
        })
    }

    pub fn pointer(inner: ResolvedType) -> Self {
        ResolvedType::Pointer(Box::new(inner))
    }

    pub fn sequence(inner: ResolvedType) -> Self {
        ResolvedType::Sequence(Box::new(inner))
    }

    pub fn map(key: ResolvedType, value: ResolvedType) -> Self {
        ResolvedType::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Render the type, qualifying names declared outside `local`.
    pub fn type_string(&self, local: &PackageRef) -> String {
        self.render(&|package| package != local)
    }

    /// Render the type without any package qualifiers.
    pub fn unqualified_string(&self) -> String {
        self.render(&|_| false)
    }

    fn render(&self, qualify: &dyn Fn(&PackageRef) -> bool) -> String {
        match self {
            ResolvedType::Scalar(s) => s.as_str().to_string(),
            ResolvedType::Named(r) if qualify(&r.package) => {
                format!("{}.{}", r.package.name, r.name)
            }
            ResolvedType::Named(r) => r.name.clone(),
            ResolvedType::AnonymousStruct => "struct{}".to_string(),
            ResolvedType::Pointer(inner) => format!("*{}", inner.render(qualify)),
            ResolvedType::Sequence(inner) => format!("[]{}", inner.render(qualify)),
            ResolvedType::Map { key, value } => {
                format!("map[{}]{}", key.render(qualify), value.render(qualify))
            }
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// A named top-level type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub package: PackageRef,
    /// Raw documentation comment.
    pub doc: String,
    pub position: Option<Position>,
    pub kind: DeclarationKind,
}

/// Shape of a declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    /// A service: a set of methods.
    Interface(Vec<MethodDecl>),
    /// A data object: an ordered set of fields.
    Struct(Vec<FieldDecl>),
    /// Another name for an existing type. Resolved transparently.
    Alias(ResolvedType),
}

/// A method of an interface declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub doc: String,
    pub position: Option<Position>,
    pub params: Vec<ResolvedType>,
    pub results: Vec<ResolvedType>,
}

/// A field of a struct declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub doc: String,
    pub position: Option<Position>,
    pub ty: ResolvedType,
    /// Raw struct tag string, e.g. `json:"name,omitempty"`.
    pub tag: String,
    pub exported: bool,
}

impl Declaration {
    fn new(package: &PackageRef, name: impl Into<String>, kind: DeclarationKind) -> Self {
        Self {
            name: name.into(),
            package: package.clone(),
            doc: String::new(),
            position: None,
            kind,
        }
    }

    pub fn interface(package: &PackageRef, name: impl Into<String>, methods: Vec<MethodDecl>) -> Self {
        Self::new(package, name, DeclarationKind::Interface(methods))
    }

    pub fn structure(package: &PackageRef, name: impl Into<String>, fields: Vec<FieldDecl>) -> Self {
        Self::new(package, name, DeclarationKind::Struct(fields))
    }

    pub fn alias(package: &PackageRef, name: impl Into<String>, target: ResolvedType) -> Self {
        Self::new(package, name, DeclarationKind::Alias(target))
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, DeclarationKind::Struct(_))
    }
}

impl MethodDecl {
    /// A method with one request and one response, the only valid shape.
    pub fn new(name: impl Into<String>, param: ResolvedType, result: ResolvedType) -> Self {
        Self::with_signature(name, vec![param], vec![result])
    }

    pub fn with_signature(
        name: impl Into<String>,
        params: Vec<ResolvedType>,
        results: Vec<ResolvedType>,
    ) -> Self {
        Self {
            name: name.into(),
            doc: String::new(),
            position: None,
            params,
            results,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: ResolvedType) -> Self {
        Self {
            name: name.into(),
            doc: String::new(),
            position: None,
            ty,
            tag: String::new(),
            exported: true,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn unexported(mut self) -> Self {
        self.exported = false;
        self
    }
}

// ============================================================================
// Sources
// ============================================================================

/// Supplies the declarations of one compilation unit.
pub trait DeclarationSource {
    /// The package being described.
    fn package(&self) -> &PackageRef;

    /// Top-level declarations of the package, in the order they are visited.
    fn declarations(&self) -> Vec<&Declaration>;

    /// Find a declaration by reference, in this package or another one.
    fn lookup(&self, ty: &TypeRef) -> Option<&Declaration>;
}

/// In-memory compilation unit.
///
/// Declarations of the unit's own package are visited in name order.
/// Declarations of other packages are only reachable through [`lookup`].
///
/// [`lookup`]: DeclarationSource::lookup
#[derive(Debug, Clone)]
pub struct Unit {
    package: PackageRef,
    declarations: BTreeMap<String, Declaration>,
    external: HashMap<(String, String), Declaration>,
}

impl Unit {
    pub fn new(package: PackageRef) -> Self {
        Self {
            package,
            declarations: BTreeMap::new(),
            external: HashMap::new(),
        }
    }

    /// Add a declaration, routing it by its package.
    pub fn add(&mut self, declaration: Declaration) {
        if declaration.package == self.package {
            self.declarations
                .insert(declaration.name.clone(), declaration);
        } else {
            self.external.insert(
                (declaration.package.path.clone(), declaration.name.clone()),
                declaration,
            );
        }
    }

    pub fn with(mut self, declaration: Declaration) -> Self {
        self.add(declaration);
        self
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl DeclarationSource for Unit {
    fn package(&self) -> &PackageRef {
        &self.package
    }

    fn declarations(&self) -> Vec<&Declaration> {
        self.declarations.values().collect()
    }

    fn lookup(&self, ty: &TypeRef) -> Option<&Declaration> {
        if ty.package == self.package {
            self.declarations.get(&ty.name)
        } else {
            self.external
                .get(&(ty.package.path.clone(), ty.name.clone()))
        }
    }
}
