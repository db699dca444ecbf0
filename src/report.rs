//! Console rendering of run summaries. Difference lists are always computed
//! completely by the comparator; only their display is bounded here.

use crate::types::{ConfigResult, Summary};
use colored::Colorize;

const MAX_DIFFERENCES_SHOWN: usize = 10;
const MAX_SCHEMA_ERRORS_SHOWN: usize = 5;
const PREVIEW_LEN: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Normal,
    /// Failures and the footer only.
    Compact,
    Json,
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_LEN {
        let head: String = text.chars().take(PREVIEW_LEN).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn render_result(out: &mut String, result: &ConfigResult, verbose: bool) {
    let heading = format!("({}, expecting {})", result.run_type, result.expecting);
    if result.passed {
        out.push_str(&format!(
            "{} {} {heading}\n",
            "[OK]".green().bold(),
            result.test_name.green()
        ));
        return;
    }

    out.push_str(&format!(
        "{} {} {heading}\n",
        "[FAIL]".red().bold(),
        result.test_name.red().bold()
    ));
    if let Some(detail) = &result.detail {
        out.push_str(&format!("  {detail}\n"));
    }
    // Schema violations are shown regardless of verbosity; there is no
    // expected/actual pair to fall back on for them.
    if !result.schema_errors.is_empty() {
        for error in result.schema_errors.iter().take(MAX_SCHEMA_ERRORS_SHOWN) {
            out.push_str(&format!("    - {error}\n"));
        }
        if result.schema_errors.len() > MAX_SCHEMA_ERRORS_SHOWN {
            out.push_str(&format!(
                "    ... and {} more schema errors\n",
                result.schema_errors.len() - MAX_SCHEMA_ERRORS_SHOWN
            ));
        }
    }
    if verbose && !result.differences.is_empty() {
        for difference in result.differences.iter().take(MAX_DIFFERENCES_SHOWN) {
            out.push_str(&format!("    - {difference}\n"));
        }
        if result.differences.len() > MAX_DIFFERENCES_SHOWN {
            out.push_str(&format!(
                "    ... and {} more differences\n",
                result.differences.len() - MAX_DIFFERENCES_SHOWN
            ));
        }
    }
    if let Some(expected) = &result.expected {
        out.push_str(&format!("  {} {}\n", "expected:".bold(), preview(expected)));
        out.push_str(&format!("  {} {}\n", "actual  :".bold(), preview(&result.actual)));
    } else {
        out.push_str(&format!("  {} {}\n", "actual  :".bold(), preview(&result.actual)));
    }
}

pub fn render_human(summary: &Summary, kind: OutputKind, verbose: bool) -> String {
    let mut out = String::new();
    for result in &summary.results {
        if result.passed && kind == OutputKind::Compact {
            continue;
        }
        render_result(&mut out, result, verbose);
    }

    let verdict = if summary.failed == 0 {
        "PASSED".green().bold().to_string()
    } else {
        "FAILED".red().bold().to_string()
    };
    out.push_str(&format!("{}\n", "=".repeat(50)));
    out.push_str(&format!(
        "Test Results: {} passed, {} failed\n",
        summary.passed.to_string().green(),
        if summary.failed > 0 {
            summary.failed.to_string().red().bold().to_string()
        } else {
            summary.failed.to_string().green().to_string()
        }
    ));
    out.push_str(&format!("Overall: {verdict}\n"));
    out.push_str(&format!("{}\n", "=".repeat(50)));
    out
}

pub fn render_json(summary: &Summary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

pub fn print_summary(summary: &Summary, kind: OutputKind, verbose: bool) -> serde_json::Result<()> {
    match kind {
        OutputKind::Json => println!("{}", render_json(summary)?),
        _ => print!("{}", render_human(summary, kind, verbose)),
    }
    Ok(())
}
