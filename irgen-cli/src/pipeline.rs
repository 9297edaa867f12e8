//! The load, build and render steps shared by every command.

use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::loader::RustLoader;
use crate::scanner::SourceScanner;
use irgen::generator::zod::ZodEmitter;
use irgen::generator::CodeGenerator;
use irgen::source::PackageRef;
use irgen::{helpers, Definition, DefinitionBuilder};
use std::path::Path;

/// Package name and path for a source directory.
///
/// Configured values win; otherwise the directory's own name is used for
/// both.
pub fn package_for(input: &Path, config: &Config) -> PackageRef {
    let dir_name = input
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "main".to_string());
    let name = config.package.name.clone().unwrap_or(dir_name);
    let path = config.package.path.clone().unwrap_or_else(|| name.clone());
    PackageRef::new(name, path)
}

/// Scan, load and build the definition of the package in `input`.
pub fn load_definition(input: &Path, config: &Config) -> CliResult<Definition> {
    let mut scanner = SourceScanner::new(input);
    if let Some(ref pattern) = config.parse.filter {
        scanner = scanner.with_filter(pattern)?;
    }
    let files = scanner.scan()?;

    let loader = RustLoader::new(package_for(input, config));
    let unit = loader.load(&files)?;

    let def = DefinitionBuilder::new()
        .exclude_interfaces(config.parse.exclude.iter().cloned())
        .build(&unit)?;
    tracing::info!(
        package = %def.package_name,
        services = def.services.len(),
        objects = def.objects.len(),
        "built definition"
    );
    Ok(def)
}

/// The Zod schema file for a definition.
pub fn render_zod(def: &Definition, config: &Config) -> CliResult<String> {
    let generated = ZodEmitter::new().generate(def, &config.generator_config()?)?;
    Ok(generated.code)
}

/// The definition as tab-indented JSON, for external template renderers.
pub fn render_definition(def: &Definition) -> CliResult<String> {
    let mut json = helpers::to_json(def)?;
    json.push('\n');
    Ok(json)
}

/// Example payload of one object as tab-indented JSON.
pub fn render_example(def: &Definition, object: &str) -> CliResult<String> {
    let object = def.object(object).map_err(|e| {
        let known: Vec<_> = def.objects.iter().map(|o| o.name.as_str()).collect();
        CliError::Validation(format!("{e} (known objects: {})", known.join(", ")))
    })?;
    let example = def.example(object)?;
    Ok(helpers::to_json(&example)?)
}
