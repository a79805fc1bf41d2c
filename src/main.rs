use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use redirect_audit::{CheckConfig, RuleSet, TracingSink, parse, process_tests};

#[derive(Debug, Parser)]
#[command(name = "redirect-audit")]
#[command(version, about = "Check redirect rules against expected outcomes", long_about = None)]
#[command(group(ArgGroup::new("untested").args(["ignore_untested", "error_untested"])))]
struct Cli {
    /// File with rewrite rules
    htaccess_file: PathBuf,

    /// File with test data
    test_file: PathBuf,

    /// Ignore untested rules
    #[arg(long)]
    ignore_untested: bool,

    /// Error if there are untested rules (default)
    #[arg(long)]
    error_untested: bool,

    /// Longest permitted redirect chain, 0 for unlimited
    #[arg(short, long, default_value_t = 0, env = "REDIRECT_AUDIT_MAX_HOPS")]
    max_hops: usize,

    /// Run quietly
    #[arg(short, long)]
    quiet: bool,

    /// Log matches and load progress
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> CheckConfig {
        CheckConfig::new()
            .max_hops(self.max_hops)
            .error_untested(!self.ignore_untested)
            .quiet(self.quiet)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(&cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("redirect_audit=debug")
    } else {
        EnvFilter::new("redirect_audit=info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Load both files, check them, print the report, and return the failure count.
fn run(cli: &Cli) -> Result<usize, redirect_audit::Error> {
    let config = cli.config();
    let ruleset = RuleSet::from_file(&cli.htaccess_file)?;
    let tests = parse::load_tests_file(&cli.test_file)?;

    let report = process_tests(&ruleset, &tests, &config, &mut TracingSink);
    print!("{}", report.render(&ruleset, &config));

    Ok(report.failure_count(&config))
}
