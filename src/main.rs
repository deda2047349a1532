use std::fs::File;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use travelbud::ResolverKind;
use travelbud::core::config;
use travelbud::tui;

#[derive(Parser)]
#[command(name = "travelbud", about = "Multi-agent travel planning assistant")]
struct Args {
    /// Reply resolver to use (overrides config file and env)
    #[arg(short, long, value_enum)]
    resolver: Option<ResolverKind>,

    /// Display name for a personalized session (omit for guest mode)
    #[arg(short, long)]
    user: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to travelbud.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("travelbud.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            log::warn!("Falling back to default config: {}", e);
            Default::default()
        }
    };
    let resolved = config::resolve(
        &file_config,
        args.resolver.map(|r| r.as_str()),
        args.user.as_deref(),
    );

    log::info!(
        "TravelBud starting up (resolver: {}, user: {})",
        resolved.resolver,
        resolved.user_name.as_deref().unwrap_or("guest"),
    );

    tui::run(resolved)
}
