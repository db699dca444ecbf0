//! Generates directive-annotated test files from TinyC sources and their
//! expected JSON outputs. Sources named `*_parser_error` / `*_lexer_error`
//! become error tests and need no JSON pair.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tinyc_test::classify;
use tinyc_test::generate::{compact_json, render_test_file};
use tinyc_test::types::{Expectation, TestConfiguration};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(version, about = "TinyC test file generator")]
struct Cli {
    /// Directory containing TinyC (.tc) source files
    #[arg(short = 't', long = "tc-dir", value_name = "DIR", default_value = "samples")]
    tc_dir: PathBuf,

    /// Directory containing expected JSON output files
    #[arg(short = 'j', long = "json-dir", value_name = "DIR", default_value = "json")]
    json_dir: PathBuf,

    /// Directory to write test files to
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = "tests")]
    output_dir: PathBuf,

    /// Add a "test_" prefix to generated filenames
    #[arg(short = 'p', long)]
    prefix: bool,
}

fn error_kind_for(stem: &str) -> Option<&'static str> {
    if stem.ends_with("_parser_error") {
        Some(classify::PARSER_ERROR)
    } else if stem.ends_with("_lexer_error") {
        Some(classify::LEXER_ERROR)
    } else {
        None
    }
}

fn configurations_for(stem: &str, json_dir: &Path) -> Result<Option<Vec<TestConfiguration>>> {
    if let Some(kind) = error_kind_for(stem) {
        return Ok(Some(vec![TestConfiguration {
            run_type: "parser".to_string(),
            expectation: Expectation::Error,
            expected_result: None,
            error_kind: Some(kind.to_string()),
        }]));
    }

    let json_path = json_dir.join(format!("{stem}.json"));
    if !json_path.exists() {
        return Ok(None);
    }
    let json_text = fs::read_to_string(&json_path)
        .with_context(|| format!("failed to read {}", json_path.display()))?;
    let result = compact_json(&json_text)
        .with_context(|| format!("bad expected output in {}", json_path.display()))?;
    Ok(Some(vec![TestConfiguration {
        run_type: "parser".to_string(),
        expectation: Expectation::Success,
        expected_result: Some(result),
        error_kind: None,
    }]))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "tinyc_test=warn,tinyc_testgen=warn".to_string()),
        )
        .init();

    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("failed to create {}", cli.output_dir.display()))?;

    let mut sources: Vec<PathBuf> = fs::read_dir(&cli.tc_dir)
        .with_context(|| format!("failed to read {}", cli.tc_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "tc"))
        .collect();
    sources.sort();

    anyhow::ensure!(!sources.is_empty(), "no .tc files found in {}", cli.tc_dir.display());

    let mut created = 0;
    for source_path in &sources {
        let stem = source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let Some(configurations) = configurations_for(&stem, &cli.json_dir)? else {
            warn!(source = %source_path.display(), "no expected JSON output, skipping");
            continue;
        };

        let source = fs::read_to_string(source_path)
            .with_context(|| format!("failed to read {}", source_path.display()))?;
        let description = format!("Test for {stem}");
        let content = render_test_file(&description, &configurations, &source);

        let file_name = if cli.prefix {
            format!("test_{stem}.tc")
        } else {
            format!("{stem}.tc")
        };
        let output_path = cli.output_dir.join(file_name);
        fs::write(&output_path, content)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        println!("Created test file: {}", output_path.display());
        created += 1;
    }

    println!("\nSummary: created {created} test files out of {} TinyC sources", sources.len());
    Ok(())
}
