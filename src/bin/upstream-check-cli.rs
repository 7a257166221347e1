use std::time::Duration;

use clap::{Parser, Subcommand};

use upstream_check::collector::Collector;
use upstream_check::sink::MemoryAccumulator;

#[derive(Parser)]
#[command(name = "upstream-check-cli")]
#[command(about = "Ad-hoc probing of nginx upstream_check_module status pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect once from the given URLs and print the records
    Probe {
        /// Status page URLs, e.g. http://lb/status?format=json
        #[arg(required = true)]
        urls: Vec<String>,

        /// Response timeout in milliseconds
        #[arg(short, long, default_value_t = 5000)]
        timeout_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Probe { urls, timeout_ms } => {
            let collector =
                Collector::new(urls).with_response_timeout(Duration::from_millis(timeout_ms));
            let acc = MemoryAccumulator::new();
            collector.gather(&acc).await?;

            let records = acc.take_records();
            println!("{}", serde_json::to_string_pretty(&records)?);

            let errors = acc.take_errors();
            for error in &errors {
                eprintln!("Error: {}", error);
            }
            if !errors.is_empty() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
