//! Field type descriptors.

use serde::{Deserialize, Serialize};

/// Resolved description of a field's, request's or response's type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldType {
    /// Package path plus clean name, e.g. `example/services.Greeting`.
    #[serde(rename = "typeID")]
    pub type_id: String,
    /// Display name with sequences stripped, qualified when external: `*shared.Page`.
    pub type_name: String,
    /// Display name without package qualifier: `*Page`.
    pub object_name: String,
    /// Pointer-stripped display name, qualified when external: `shared.Page`.
    pub clean_object_name: String,
    pub object_name_lower_camel: String,
    pub object_name_lower_snake: String,
    pub multiple: bool,
    /// Number of sequence wrappers around the element.
    pub multiple_times: usize,
    /// Package path of an external type, empty for local and built-in types.
    pub package: String,
    pub is_object: bool,
    #[serde(rename = "jsType")]
    pub js_type: String,
    #[serde(rename = "tsType")]
    pub ts_type: String,
    pub swift_type: String,
    pub is_map: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub map: Option<FieldTypeMap>,
}

/// Key and element descriptors of a map field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTypeMap {
    pub key_type: String,
    #[serde(rename = "keyTypeJS")]
    pub key_type_js: String,
    #[serde(rename = "keyTypeTS")]
    pub key_type_ts: String,
    pub key_type_swift: String,
    pub element_type: String,
    #[serde(rename = "elementTypeJS")]
    pub element_type_js: String,
    #[serde(rename = "elementTypeTS")]
    pub element_type_ts: String,
    pub element_type_swift: String,
    pub element_is_multiple: bool,
}

impl FieldType {
    /// Optional values are displayed with a leading `*`.
    pub fn is_optional(&self) -> bool {
        self.type_name.starts_with('*')
    }

    /// Clean object name with any package qualifier removed.
    pub fn bare_name(&self) -> &str {
        unqualified(&self.clean_object_name)
    }
}

impl FieldTypeMap {
    /// Element type name with pointer and package qualifier removed.
    pub fn bare_element_name(&self) -> &str {
        unqualified(self.element_type.trim_start_matches('*'))
    }
}

/// Drop a `pkg.` qualifier: `shared.Page` becomes `Page`.
pub fn unqualified(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, bare)| bare)
}
