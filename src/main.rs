use clap::Parser;
use mira::api::RouteStyle;
use mira::core::config;
use mira::core::identity::UsernameCache;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "mira", about = "Mood check-ins and a companion to talk them through")]
struct Args {
    /// Backend base URL (overrides MIRA_BASE_URL and the config file)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Backend route layout
    #[arg(short, long, value_enum)]
    routes: Option<RouteStyle>,

    /// Forget the remembered username and exit
    #[arg(long)]
    forget_user: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("mira: {e}; using defaults");
        config::MiraConfig::default()
    });
    let config = config::resolve(&file_config, args.base_url.as_deref(), args.routes);

    // Initialize file logger - writes to mira.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("mira.log") {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }

    if args.forget_user {
        if let Some(cache) = UsernameCache::default_path().map(UsernameCache::new) {
            cache.clear()?;
            println!("Forgot remembered user ({})", cache.path().display());
        }
        return Ok(());
    }

    log::info!(
        "Mira starting up against {} ({} routes)",
        config.base_url,
        config.routes.label()
    );

    mira::tui::run(config)
}
