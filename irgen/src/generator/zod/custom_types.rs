//! Custom scalar types selectable with `type: "types.X"` metadata.

/// Scalars exported by the `ZodTypes` module.
pub const ZOD_TYPES: &[&str] = &[
    "String",
    "Int",
    "Int16",
    "Int32",
    "Int64",
    "Float64",
    "Bool",
    "Time",
    "Date",
    "Timestamp",
    "UUID",
    "RichText",
    "JSON",
];

/// Map `types.Timestamp` to `ZodTypes.Timestamp`. Unknown names give `None`.
pub fn zod_custom_type(name: &str) -> Option<String> {
    let scalar = name.strip_prefix("types.")?;
    ZOD_TYPES
        .contains(&scalar)
        .then(|| format!("ZodTypes.{scalar}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types() {
        assert_eq!(zod_custom_type("types.UUID").as_deref(), Some("ZodTypes.UUID"));
        assert_eq!(zod_custom_type("types.RichText").as_deref(), Some("ZodTypes.RichText"));
    }

    #[test]
    fn test_unknown_types() {
        assert_eq!(zod_custom_type("types.Money"), None);
        assert_eq!(zod_custom_type("UUID"), None);
    }
}
