use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use stridemerge::cli::Cli;
use stridemerge::config::ReportConfig;
use stridemerge::parser::ParseStats;
use stridemerge::report;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; warnings always reach stderr
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse arguments, exiting with status 1 on usage errors
fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    }
}

/// Print parser counters to stderr
fn print_stats(stats: &ParseStats) {
    eprintln!("=== Parse Statistics ===");
    eprintln!("bytes read:          {}", stats.bytes_read);
    eprintln!("non-ASCII dropped:   {}", stats.bytes_dropped);
    eprintln!("unterminated bytes:  {}", stats.unterminated_bytes);
    eprintln!("lines:               {}", stats.lines);
    eprintln!("headers:             {}", stats.headers);
    eprintln!("patterns:            {}", stats.patterns);
    eprintln!("orphan patterns:     {}", stats.orphan_patterns);
    eprintln!("zero-access records: {}", stats.zero_access_records);
    eprintln!("ignored lines:       {}", stats.ignored_lines);
    eprintln!("rejected lines:      {}", stats.rejected_lines);
}

fn main() -> Result<()> {
    let args = parse_args();

    let Some(input) = args.input.clone() else {
        eprintln!("{}", Cli::command().render_usage());
        std::process::exit(1);
    };

    init_tracing(args.debug);

    let mut config = match &args.config {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::default(),
    };
    config.apply_overrides(&args);
    config.validate()?;

    let analysis = report::analyze_file(&input, config.chunk_size)
        .with_context(|| format!("Failed to analyze {}", input.display()))?;

    if args.stats {
        print_stats(&analysis.stats);
    }

    if analysis.is_empty() {
        eprintln!("Warning: no valid memory analysis records found");
        return Ok(());
    }

    if let Some(path) = report::write_report(&analysis, &config)? {
        println!("\nAnalysis complete. Results written to {}", path.display());
    }

    Ok(())
}
