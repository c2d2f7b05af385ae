use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use truenotion::Backend;
use truenotion::core::config::{self, CliOverrides, TrueNotionConfig};

#[derive(Parser)]
#[command(name = "truenotion", about = "Terminal chat for the TrueNotion assistant")]
struct Args {
    /// Transport to use (overrides config and TRUENOTION_BACKEND)
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Backend base URL (overrides config and TRUENOTION_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Where to write the debug log
    #[arg(long, default_value = "truenotion.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: {e}. Using defaults.");
            log::warn!("Config load failed: {}", e);
            TrueNotionConfig::default()
        }
    };

    let cli = CliOverrides {
        backend: args.backend,
        base_url: args.base_url.as_deref(),
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "TrueNotion starting up: backend={:?}, base_url={}",
        resolved.backend,
        resolved.base_url
    );

    truenotion::tui::run(resolved)
}
