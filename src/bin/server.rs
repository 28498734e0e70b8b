use city_poster::config::theme_file::load_theme_set;
use city_poster::utils::{logger, validation::Validate};
use city_poster::{CliConfig, LocalStorage, PosterEngine, SimplePosterPipeline};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "poster-server")]
#[command(about = "Serve the city map poster web form")]
struct ServerConfig {
    #[arg(long, default_value = "0.0.0.0:3000")]
    listen: String,

    #[command(flatten)]
    poster: CliConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();

    logger::init_server_logger();
    tracing::info!("Starting poster-server");

    if let Err(e) = config.poster.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let themes = load_theme_set(config.poster.themes_file.as_deref())?;
    let storage = LocalStorage::new(config.poster.output_path.clone());
    let pipeline = SimplePosterPipeline::new(storage, config.poster, themes)?;
    let engine = PosterEngine::new(pipeline);

    city_poster::web::serve(engine, &config.listen).await
}
