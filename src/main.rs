use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::control::set_override as set_color_override;
use std::path::PathBuf;
use std::time::Duration;
use tinyc_test::compiler::{Compiler, ExternalCompiler};
use tinyc_test::discover::{collect_test_files, load_test_case, TestFilter};
use tinyc_test::engine::{run_cases, Registry};
use tinyc_test::report::{print_summary, OutputKind};
use tinyc_test::schema::SchemaValidator;
use tinyc_test::types::TestCase;
use tracing::{error, info, warn};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Normal,
    Compact,
    Json,
}

impl From<OutputFormat> for OutputKind {
    fn from(v: OutputFormat) -> Self {
        match v {
            OutputFormat::Normal => OutputKind::Normal,
            OutputFormat::Compact => OutputKind::Compact,
            OutputFormat::Json => OutputKind::Json,
        }
    }
}

/// TinyC conformance test runner: drives an external compiler binary over
/// directive-annotated test files and checks its output.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
struct Cli {
    /// Command used to invoke the compiler under test, e.g. "./tinyc".
    /// The phase flag and the source path are appended per configuration.
    #[arg(value_name = "COMPILER_COMMAND")]
    compiler: String,

    /// Directory containing .tc test files
    #[arg(short = 'd', long = "test-dir", value_name = "DIR", default_value = "tests")]
    test_dir: PathBuf,

    /// JSON schema for AST pre-validation (validation is skipped when the
    /// file cannot be loaded)
    #[arg(short = 's', long, value_name = "FILE", default_value = "tinyc-ast-schema.json")]
    schema: PathBuf,

    /// Per-invocation timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,

    /// Run only the test with this numeric prefix (e.g. 5 for 5_*.tc)
    #[arg(short = 't', long, value_name = "N", conflicts_with = "range")]
    test: Option<u32>,

    /// Run tests in an inclusive prefix range, e.g. 3-7
    #[arg(short = 'r', long, value_name = "START-END")]
    range: Option<String>,

    /// Show detailed structural differences for failing tests
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Suppress the report (exit status still reflects the outcome)
    #[arg(short = 'q', long = "silent")]
    silent: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    no_color: bool,

    /// Report format
    #[arg(short = 'o', long, value_enum, default_value = "normal")]
    output: OutputFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter_directive = if cli.verbose {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tinyc_test=info".to_string())
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tinyc_test=warn".to_string())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter_directive)
        .init();

    if cli.no_color {
        set_color_override(false);
    }

    let filter = match (&cli.test, &cli.range) {
        (Some(n), _) => TestFilter::Single(*n),
        (None, Some(range)) => match TestFilter::parse_range(range) {
            Ok(filter) => filter,
            Err(e) => {
                error!("{e:#}");
                std::process::exit(2);
            }
        },
        (None, None) => TestFilter::All,
    };

    let compiler = ExternalCompiler {
        command: cli.compiler.clone(),
        timeout: Some(Duration::from_secs(cli.timeout)),
    };
    if let Err(e) = compiler.validate() {
        error!("{e:#}");
        std::process::exit(2);
    }

    let schema = SchemaValidator::load(&cli.schema);
    if schema.is_enabled() {
        info!(schema = %cli.schema.display(), "loaded JSON schema");
    }

    let files = match collect_test_files(&cli.test_dir, filter) {
        Ok(files) => files,
        Err(e) => {
            error!("{e:#}");
            std::process::exit(2);
        }
    };
    if files.is_empty() {
        warn!(dir = %cli.test_dir.display(), "no matching test files found");
    }

    let mut cases: Vec<TestCase> = Vec::new();
    for file in &files {
        match load_test_case(file) {
            Ok(case) => cases.push(case),
            // Format defects skip the file, never the run.
            Err(e) => warn!("{e:#}"),
        }
    }

    if cli.verbose {
        info!(
            files = cases.len(),
            configurations = cases.iter().map(|c| c.configurations.len()).sum::<usize>(),
            "starting test run"
        );
    }

    let registry = Registry::default();
    let summary = run_cases(&compiler, &registry, &schema, &cases);

    if !cli.silent {
        print_summary(&summary, cli.output.into(), cli.verbose)?;
    }

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
