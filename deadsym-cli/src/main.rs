//! deadsym CLI - dead symbol detector for shared libraries.
//!
//! Disassembles the library with `objdump`, reads its dynamic exports with
//! `nm`, and lists symbols that no exported function (or curated callback)
//! can reach.
//!
//! Exit status is 0 whenever a report is printed, diagnostics included, and
//! non-zero on any fatal error.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use deadsym_core::{
    init_structured_logging, load_config, print_plain, AnalysisStats, Deadsym, DeadsymConfig,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Find symbols unreachable from a shared library's exports")]
pub struct Cli {
    /// Path to the shared library or object file
    library: PathBuf,
}

/// Short header printed above the report.
fn summary(stats: &AnalysisStats) -> String {
    format!(
        "=== Dead Symbol Analysis ===\n\
         Symbols:    {} ({} distinct names, {} references)\n\
         Roots:      {} exported, {} curated\n\
         Reached:    {}\n\
         Unreached:  {}\n\
         Unresolved: {}  Ambiguous: {}\n",
        stats.total_symbols,
        stats.distinct_names,
        stats.edges,
        stats.exported_roots,
        stats.curated_roots,
        stats.reached,
        stats.unreached,
        stats.unresolved_references,
        stats.ambiguous_names,
    )
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] deadsym internal error: {}", info);
        eprintln!("[PANIC] No report was produced.");
    }));

    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let config = load_config(&cwd)?.unwrap_or_default();
    init_structured_logging(config.log_format());

    run(&cli, &config)
}

fn run(cli: &Cli, config: &DeadsymConfig) -> Result<()> {
    let result = Deadsym::new(&cli.library)
        .with_config(config)
        .analyze()
        .with_context(|| format!("Analysis of {} aborted", cli.library.display()))?;

    tracing::debug!(diagnostics = result.diagnostics.len(), "printing report");
    println!("{}", summary(&result.stats));
    print_plain(&result.report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_single_positional() {
        let cli = Cli::try_parse_from(["deadsym", "libsflphone.so"]).unwrap();
        assert_eq!(cli.library, PathBuf::from("libsflphone.so"));
    }

    #[test]
    fn test_cli_requires_library() {
        assert!(Cli::try_parse_from(["deadsym"]).is_err());
    }

    #[test]
    fn test_cli_rejects_extra_arguments() {
        assert!(Cli::try_parse_from(["deadsym", "a.so", "b.so"]).is_err());
        assert!(Cli::try_parse_from(["deadsym", "--json", "a.so"]).is_err());
    }

    #[test]
    fn test_run_missing_library_fails() {
        let cli = Cli {
            library: PathBuf::from("/nonexistent/deadsym/libnothing.so"),
        };
        let err = run(&cli, &DeadsymConfig::default()).unwrap_err();
        assert!(err.to_string().contains("aborted"));
    }

    #[test]
    fn test_summary_lists_counts() {
        let stats = AnalysisStats {
            total_symbols: 10,
            distinct_names: 9,
            edges: 14,
            exported_roots: 3,
            curated_roots: 2,
            reached: 7,
            unreached: 3,
            unresolved_references: 1,
            ambiguous_names: 1,
        };
        let text = summary(&stats);
        assert!(text.contains("Symbols:    10 (9 distinct names, 14 references)"));
        assert!(text.contains("Roots:      3 exported, 2 curated"));
        assert!(text.contains("Unreached:  3"));
    }
}
