//! Developer tasks (schema generation, conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use cuiscope_app::{
    AnswerFile, AssessInput, AssessmentReport, ReplayProvider, parse_answers_json, run_assess,
    serialize_report,
};
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;

/// Get the project root (parent of xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("Cannot determine current directory")?,
    };

    // If we're in the xtask directory, go up one level
    if manifest_dir.ends_with("xtask")
        && let Some(parent) = manifest_dir.parent()
    {
        return Ok(parent.to_path_buf());
    }
    Ok(manifest_dir)
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

fn fixtures_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("tests").join("fixtures"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "cuiscope.assessment.v1.json",
            generate: || schema_for!(AssessmentReport),
        },
        SchemaSpec {
            filename: "cuiscope.answers.v1.json",
            generate: || schema_for!(AnswerFile),
        },
        SchemaSpec {
            filename: "cuiscope.catalog.v1.json",
            generate: || schema_for!(cuiscope_settings::CatalogDefV1),
        },
        SchemaSpec {
            filename: "cuiscope.config.v1.json",
            generate: || schema_for!(cuiscope_settings::CuiscopeConfigV1),
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn compile(schema: &schemars::Schema) -> anyhow::Result<jsonschema::Validator> {
    let value = serde_json::to_value(schema).context("Failed to convert schema")?;
    jsonschema::validator_for(&value).map_err(|e| anyhow::anyhow!("Failed to compile schema: {e}"))
}

fn validation_errors(validator: &jsonschema::Validator, doc: &serde_json::Value) -> Vec<String> {
    validator.iter_errors(doc).map(|e| e.to_string()).collect()
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that every schema compiles, accepts the shipped documents, and
/// matches the committed copy in schemas/ when one exists.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut errors = Vec::new();

    for spec in schema_specs() {
        let schema = (spec.generate)();
        compile(&schema).with_context(|| spec.filename.to_string())?;

        let path = dir.join(spec.filename);
        if path.exists() {
            let expected = serialize_schema(&schema)?;
            let actual = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if expected != actual {
                errors.push(format!("{} is out of date", spec.filename));
            }
        }
    }

    // The built-in catalog must satisfy its own schema.
    let catalog_schema = compile(&schema_for!(cuiscope_settings::CatalogDefV1))?;
    let catalog_doc: serde_json::Value =
        toml::from_str(cuiscope_settings::BUILTIN_CATALOG_TOML).context("parse built-in catalog")?;
    for e in validation_errors(&catalog_schema, &catalog_doc) {
        errors.push(format!("built-in catalog: {e}"));
    }

    let answers_schema = compile(&schema_for!(AnswerFile))?;
    for (name, doc) in answer_fixtures()? {
        for e in validation_errors(&answers_schema, &doc) {
            errors.push(format!("{name}: {e}"));
        }
    }

    if errors.is_empty() {
        println!("All schemas compile and accept the shipped documents.");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        eprintln!("\nRun `cargo run -p xtask -- emit-schemas` to regenerate.");
        bail!("Schema validation failed with {} errors", errors.len())
    }
}

fn answer_fixtures() -> anyhow::Result<Vec<(String, serde_json::Value)>> {
    let dir = fixtures_dir()?.join("answers");
    let mut docs = Vec::new();
    for entry in fs::read_dir(&dir).with_context(|| format!("read {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let doc = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        docs.push((name, doc));
    }
    docs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(docs)
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check schemas compile, accept shipped documents, match schemas/");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Assess the complete answer fixtures and validate the reports");
    eprintln!("  explain-coverage  Validate every built-in control has an explanation");
}

/// Run the built-in catalog over every complete answer fixture and check
/// the resulting reports.
///
/// This checks:
/// 1. Each report validates against the `cuiscope.assessment.v1` schema
/// 2. Coverage lists every declared control exactly once
/// 3. A second run is identical once run metadata is normalized
fn conform() -> anyhow::Result<()> {
    let catalog = cuiscope_settings::builtin_catalog()?;
    let validator = compile(&schema_for!(AssessmentReport))?;
    println!("✓ cuiscope.assessment.v1 schema compiles");

    let mut errors = Vec::new();
    let mut assessed = 0;

    for (name, doc) in answer_fixtures()? {
        let file = parse_answers_json(&doc.to_string())
            .with_context(|| format!("parse answers: {name}"))?;
        // Only complete fixtures produce a report.
        let Ok(first) = assess_once(&catalog, file.clone()) else {
            println!("- {name}: incomplete or invalid, skipped");
            continue;
        };
        let second = assess_once(&catalog, file)?;
        assessed += 1;

        let value: serde_json::Value = serde_json::from_slice(&first)?;
        for e in validation_errors(&validator, &value) {
            errors.push(format!("{name}: {e}"));
        }

        let declared = catalog.controls().controls().len();
        let covered = value["data"]["coverage"].as_array().map_or(0, Vec::len);
        if covered != declared {
            errors.push(format!(
                "{name}: coverage has {covered} entries, catalog declares {declared}"
            ));
        }

        let first = cuiscope_test_util::normalize_nondeterministic(value);
        let second = cuiscope_test_util::normalize_nondeterministic(serde_json::from_slice(
            &second,
        )?);
        if first != second {
            errors.push(format!("{name}: reports differ between runs"));
        }

        println!("✓ {name}");
    }

    if assessed == 0 {
        bail!("no complete answer fixtures found");
    }

    if errors.is_empty() {
        println!("\n✓ All conformance checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!("Conformance validation failed with {} errors", errors.len())
    }
}

fn assess_once(catalog: &cuiscope_domain::Catalog, file: AnswerFile) -> anyhow::Result<Vec<u8>> {
    let output = run_assess(
        AssessInput {
            catalog,
            subject: Default::default(),
        },
        ReplayProvider::new(file),
    )?;
    serialize_report(&output.report)
}

/// Validate that every control in the built-in catalog has an explanation.
fn explain_coverage() -> anyhow::Result<()> {
    let catalog = cuiscope_settings::builtin_catalog()?;
    let mut errors = Vec::new();

    for control in catalog.controls().controls() {
        match cuiscope_types::explain::lookup_explanation(&control.id) {
            Some(exp) => {
                if exp.title.is_empty() {
                    errors.push(format!("Control '{}' has empty title", control.id));
                }
                if exp.description.is_empty() {
                    errors.push(format!("Control '{}' has empty description", control.id));
                }
                if exp.remediation.is_empty() {
                    errors.push(format!("Control '{}' has empty remediation", control.id));
                }
            }
            None => errors.push(format!("Control '{}' has no explanation", control.id)),
        }
    }

    for id in cuiscope_types::explain::all_control_ids() {
        if catalog.controls().control(id).is_none() {
            errors.push(format!("Explained control '{id}' is not in the built-in catalog"));
        }
    }

    if errors.is_empty() {
        println!(
            "✓ {} controls have explanations",
            catalog.controls().controls().len()
        );
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo run -p xtask -- help` for usage."),
    }
    .context("xtask failed")
}
