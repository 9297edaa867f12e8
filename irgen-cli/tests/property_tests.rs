//! Property-based tests for irgen-cli.
//!
//! Properties tested:
//! - File discovery completeness
//! - Field order preservation in the loader
//! - Config override precedence
//! - Dry run safety

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use irgen::source::{DeclarationKind, DeclarationSource, PackageRef, Unit};
use irgen_cli::{
    config::{CliArgs, Config, ConfigManager},
    loader::RustLoader,
    scanner::SourceScanner,
    writer::FileWriter,
};

// =============================================================================
// Generators for property tests
// =============================================================================

/// File names that cannot collide with Rust keywords.
fn arb_filename() -> impl Strategy<Value = String> {
    "f_[a-z0-9_]{0,10}"
}

/// Field names that cannot collide with Rust keywords.
fn arb_field_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("x_[a-z0-9]{0,8}", 1..8).prop_map(|s| s.into_iter().collect())
}

fn struct_source(name: &str, fields: &[String]) -> String {
    let body: String = fields
        .iter()
        .map(|f| format!("    pub {f}: String,\n"))
        .collect();
    format!("pub struct {name} {{\n{body}}}\n")
}

// =============================================================================
// File discovery
// =============================================================================

proptest! {
    #[test]
    fn prop_scanner_finds_every_rust_file(names in prop::collection::btree_set(arb_filename(), 1..6)) {
        let dir = TempDir::new().unwrap();
        for name in &names {
            fs::write(dir.path().join(format!("{name}.rs")), "pub struct Empty;").unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "not rust").unwrap();

        let files = SourceScanner::new(dir.path()).scan().unwrap();

        let found: BTreeSet<String> = files
            .iter()
            .filter_map(|f| f.path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        prop_assert_eq!(found, names);

        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        prop_assert_eq!(paths, sorted);
    }
}

// =============================================================================
// Loader
// =============================================================================

proptest! {
    #[test]
    fn prop_loader_keeps_field_order(fields in arb_field_names()) {
        let loader = RustLoader::new(PackageRef::new("services", "services"));
        let mut unit = Unit::new(loader.package().clone());
        loader
            .load_source(&struct_source("Record", &fields), Path::new("record.rs"), &mut unit)
            .unwrap();

        let decls = unit.declarations();
        prop_assert_eq!(decls.len(), 1);
        match &decls[0].kind {
            DeclarationKind::Struct(loaded) => {
                let names: Vec<_> = loaded.iter().map(|f| f.name.clone()).collect();
                prop_assert_eq!(names, fields);
                prop_assert!(loaded.iter().all(|f| f.exported));
            }
            other => prop_assert!(false, "expected struct, got {:?}", other),
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

proptest! {
    #[test]
    fn prop_cli_args_override_config(
        configured in arb_filename(),
        cli in prop::option::of(arb_filename()),
        types_import in prop::option::of("\\./[a-z_]{1,10}"),
    ) {
        let mut config = Config::default();
        config.package.name = Some(configured.clone());
        let original_import = config.output.types_import.clone();

        let merged = ConfigManager::merge_cli_args(
            config,
            &CliArgs {
                package_name: cli.clone(),
                types_import: types_import.clone(),
                ..Default::default()
            },
        );

        prop_assert_eq!(merged.package.name, Some(cli.unwrap_or(configured)));
        prop_assert_eq!(merged.output.types_import, types_import.unwrap_or(original_import));
    }

    #[test]
    fn prop_excludes_are_unioned(
        configured in prop::collection::vec("[A-Z][a-z]{1,6}", 0..4),
        cli in prop::collection::vec("[A-Z][a-z]{1,6}", 0..4),
    ) {
        let mut config = Config::default();
        config.parse.exclude = configured.clone();

        let merged = ConfigManager::merge_cli_args(
            config,
            &CliArgs {
                exclude: cli.clone(),
                ..Default::default()
            },
        );

        for name in configured.iter().chain(cli.iter()) {
            prop_assert!(merged.parse.exclude.contains(name));
        }
    }
}

// =============================================================================
// Output
// =============================================================================

proptest! {
    #[test]
    fn prop_dry_run_never_writes(name in arb_filename(), content in ".{0,64}") {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join(format!("{name}.ts"));

        let result = FileWriter::new(true).write(&path, &content).unwrap();

        prop_assert!(!result.was_written());
        prop_assert!(!path.exists());
        prop_assert!(!dir.path().join("out").exists());
    }
}
