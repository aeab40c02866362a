#![forbid(unsafe_code)]

use clap::Parser;
use tracing_subscriber::EnvFilter;

use circle_compare::ReportFormat;
use circle_compare::compare_cmd::{self, CompareOptions};

#[derive(Parser, Debug)]
#[command(name = "circle-compare")]
#[command(about = "Compare 2 CircleCI Cloud builds", long_about = None)]
struct Cli {
    /// Job build link URLs (only the first two are compared)
    #[arg(value_name = "URL", num_args = 2.., required = true)]
    build_links: Vec<String>,

    /// Run sanity checks on URLs
    #[arg(long)]
    validate: bool,

    /// Extract build information from URL
    #[arg(long)]
    info: bool,

    /// Fetch the selected job and write its report (needs CIRCLE_TOKEN)
    #[arg(long)]
    report: bool,

    /// Index of build link (URL)
    #[arg(long, default_value_t = 0)]
    index: usize,

    /// Report encoding
    #[arg(long, value_enum)]
    format: Option<ReportFormat>,

    /// Output directory for reports
    #[arg(long)]
    output: Option<std::path::PathBuf>,

    /// Path to config file (default: circle-compare.toml if present)
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (or set CIRCLE_COMPARE_LOG)
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("CIRCLE_COMPARE_LOG").unwrap_or_else(|_| {
        if verbose { "circle_compare=debug".to_string() } else { "circle_compare=info".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn main() {
    color_eyre::install().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let opts = CompareOptions {
        urls: cli.build_links,
        validate: cli.validate,
        info: cli.info,
        report: cli.report,
        index: cli.index,
        format: cli.format,
        output: cli.output,
        config: cli.config,
    };

    match compare_cmd::run(&opts) {
        Ok(Some(path)) => println!("{}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(1);
        }
    }
}
