use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use heartwalk::app::App;
use heartwalk::config::{SceneConfig, CONFIG_FILE};
use heartwalk::logging::setup_logging;

#[derive(Parser, Debug)]
#[command(version, about = "Collect the hearts, then watch the ending")]
struct Args {
    /// Scene configuration file; missing files fall back to defaults.
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[arg(long, default_value_t = 960)]
    width: u32,

    #[arg(long, default_value_t = 640)]
    height: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(true)?;

    let config = SceneConfig::load(&args.config)?;
    info!(config = %args.config.display(), "Configuration loaded");

    let mut app = App::new(config, args.width, args.height)?;
    app.run()
}
