//! Primitive type names for the three target vocabularies.

const INTEGERS: &[&str] = &[
    "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32", "uint64",
];

const FLOATS: &[&str] = &["float32", "float64"];

/// JavaScript, TypeScript and Swift spellings of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub js: String,
    pub ts: String,
    pub swift: String,
}

impl Vocabulary {
    fn new(js: &str, ts: &str, swift: &str) -> Self {
        Self {
            js: js.to_string(),
            ts: ts.to_string(),
            swift: swift.to_string(),
        }
    }

    /// Map a canonical type string. Unknown names are used as-is.
    pub fn for_type(name: &str) -> Self {
        match name {
            "any" => Self::new("any", "any", "Any"),
            "string" => Self::new("string", "string", "String"),
            "bool" => Self::new("boolean", "boolean", "Bool"),
            n if n.starts_with("map[") => Self::new("object", "object", "Any"),
            n if is_integer(n) || is_float(n) => Self::new("number", "number", "Double"),
            other => Self::new(other, other, other),
        }
    }

    /// Object references are opaque objects in JS and keep their name elsewhere.
    pub fn for_object(clean_name: &str) -> Self {
        Self::new("object", clean_name, clean_name)
    }
}

pub fn is_integer(name: &str) -> bool {
    INTEGERS.contains(&name)
}

pub fn is_float(name: &str) -> bool {
    FLOATS.contains(&name)
}
