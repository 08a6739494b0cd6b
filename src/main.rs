//! liberate - find duplicate, junk and oversized files and write a liberation report.
//!
//! Usage:
//!   liberate SOURCE TARGET                 Analyze SOURCE, write manifest and report into TARGET
//!   liberate SOURCE TARGET --dry-run       Same analysis, marked as a dry run
//!   liberate SOURCE TARGET -t 1GB          Flag files over 1 GiB as oversized
//!   liberate --help                        Show help

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Context, Result, bail};
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use liberator_core::bytes_to_mib;
use liberator_mission::{Mission, MissionConfig, MissionOutcome, SizeConfig};

#[derive(Parser)]
#[command(
    name = "liberate",
    version,
    about = "Find duplicate, junk and oversized files in a directory tree",
    long_about = "liberate walks SOURCE once, hashes every file to find duplicates, \
                  sorts files into categories, flags oversized and junk files, and \
                  writes a backup manifest and liberation_report.json into TARGET.\n\n\
                  No file in SOURCE is ever moved or deleted."
)]
struct Cli {
    /// Directory to analyze
    source: PathBuf,

    /// Directory that receives the manifest and report (created if missing)
    target: PathBuf,

    /// Analyze only; no files are moved
    #[arg(long)]
    dry_run: bool,

    /// Files larger than this are oversized (e.g., "100MB", "1GB")
    #[arg(short, long, default_value = "100MB")]
    threshold: String,

    /// Number of oversized files to list
    #[arg(short = 'n', long, default_value = "10")]
    top: usize,

    /// Follow symbolic links while walking
    #[arg(long)]
    follow_symlinks: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let threshold = parse_size(&cli.threshold)
        .with_context(|| format!("Invalid threshold: {}", cli.threshold))?;

    let mut config = MissionConfig::new(&cli.source, &cli.target);
    config.dry_run = cli.dry_run;
    config.follow_symlinks = cli.follow_symlinks;
    config.sizes = SizeConfig::builder()
        .oversize_threshold(threshold)
        .top_n(cli.top)
        .build()
        .context("Invalid size configuration")?;
    debug!(threshold, follow_symlinks = cli.follow_symlinks, "mission configured");

    eprintln!(
        "Liberating documents from {} to {}...",
        cli.source.display(),
        cli.target.display()
    );

    let mission = Mission::new(config).context("Mission setup failed")?;
    let outcome = mission.execute().context("Mission failed")?;

    print_report(&outcome, threshold, cli.top);

    if outcome.dry_run {
        println!(" DRY RUN COMPLETE - No files were moved");
    } else {
        println!(" Ready to liberate {} documents", outcome.report.total_files);
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

/// Print the mission summary.
fn print_report(outcome: &MissionOutcome, threshold: u64, top_n: usize) {
    let report = &outcome.report;

    println!();
    println!("{}", "─".repeat(60));
    println!(" Mission Report");
    println!("{}", "─".repeat(60));
    println!();
    println!(
        " Total files found: {} ({} hashed)",
        report.total_files,
        format_size(outcome.hunt.bytes_hashed)
    );
    println!(" Duplicate sets:    {}", report.duplicate_sets);
    println!(
        " Large files (>{}): {}",
        format_size(threshold),
        report.large_files
    );
    println!(" Junk files:        {}", report.junk_files);
    println!(" Total size:        {:.1} MB", report.total_size_mb);
    println!();

    if !report.categories.is_empty() {
        println!(" Categories:");
        for (category, count) in &report.categories {
            println!("   {:<16} {:>8} files", category.as_ref(), count);
        }
        println!();
    }

    let duplicates = outcome.hunt.report();
    if duplicates.has_duplicates() {
        println!(
            " Wasted by duplicates: {} across {} files",
            format_size(duplicates.total_wasted_space),
            duplicates.files_with_duplicates
        );
        for (i, group) in duplicates.groups.iter().take(top_n).enumerate() {
            println!(
                "   Set {} ({} files, {} each, {} wasted)",
                i + 1,
                group.count(),
                format_size(group.size),
                format_size(group.wasted_bytes)
            );
            for path in &group.paths {
                println!("     {}", path.display());
            }
        }
        if duplicates.group_count > top_n {
            println!("   ... and {} more", duplicates.group_count - top_n);
        }
        println!();
    }

    if !outcome.sizes.oversized.is_empty() {
        println!(
            " Largest files ({} combined):",
            format_size(outcome.sizes.oversized_bytes())
        );
        for file in outcome.sizes.oversized.iter().take(top_n) {
            println!("   {:>10}  {}", format_size(file.size), file.path.display());
        }
        println!();
    }

    if outcome.junk.count() > 0 {
        println!(
            " Junk: {} files, {:.1} MB reclaimable",
            outcome.junk.count(),
            bytes_to_mib(outcome.junk.total_size)
        );
        println!();
    }

    let failures = outcome.hunt.failures.len() + outcome.warnings.len();
    if failures > 0 {
        println!(" {} file(s) could not be read", failures);
        println!();
    }

    println!(" Manifest: {}", outcome.manifest.path.display());
    println!(" Report:   {}", outcome.report_path.display());
    println!("{}", "─".repeat(60));
    println!();
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Parse a size string (e.g., "1KB", "10MB", "1GB").
fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim().to_uppercase();
    let digits = s.trim_end_matches(|c: char| !c.is_ascii_digit() && c != '.');
    let unit = &s[digits.len()..];

    let multiplier: u64 = match unit {
        "GB" | "G" | "GIB" => 1024 * 1024 * 1024,
        "MB" | "M" | "MIB" => 1024 * 1024,
        "KB" | "K" | "KIB" => 1024,
        "B" | "" => 1,
        other => bail!("Unknown size unit: {other}"),
    };

    let num: f64 = digits.parse()?;
    if num < 0.0 || !num.is_finite() {
        bail!("Size must be a non-negative number");
    }

    Ok((num * multiplier as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("100MB").unwrap(), 100 * 1024 * 1024);
        assert_eq!(parse_size("1g").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("1.5K").unwrap(), 1536);
        assert_eq!(parse_size("42").unwrap(), 42);
        assert_eq!(parse_size(" 7B ").unwrap(), 7);
        assert!(parse_size("10XB").is_err());
        assert!(parse_size("MB").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["liberate", "/src", "/dst", "--dry-run", "-vv", "-t", "1GB"])
            .unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threshold, "1GB");
        assert!(!cli.follow_symlinks);

        assert!(Cli::try_parse_from(["liberate", "/src"]).is_err());
    }
}
