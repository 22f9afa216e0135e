use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(about = "Vigil Market Surveillance", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Some(config) = args.config {
        std::env::set_var("VIGIL_CONFIG", config);
    }
    if args.json {
        std::env::set_var("VIGIL_JSON_OUTPUT", "true");
    }

    vigil_bootstrap::run()
}
