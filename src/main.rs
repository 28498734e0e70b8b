use city_poster::config::theme_file::load_theme_set;
use city_poster::utils::{logger, validation::Validate};
use city_poster::{CliConfig, LocalStorage, PosterEngine, PosterRequest, SimplePosterPipeline};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting city-poster CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let themes = match load_theme_set(config.themes_file.as_deref()) {
        Ok(themes) => themes,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let request = PosterRequest {
        city: config.city.clone(),
        country: config.country.clone(),
        distance_m: config.distance,
        theme: config.theme.clone(),
    };
    let all_themes = config.theme == "all";
    let archive = config.archive;

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = match SimplePosterPipeline::new(storage, config, themes) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!("❌ Pipeline setup failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let engine = PosterEngine::new_with_monitoring(pipeline, monitor_enabled);

    let result = if all_themes {
        engine.run_all(&request, archive).await
    } else {
        engine.run(&request).await.map(|path| vec![path])
    };

    match result {
        Ok(paths) => {
            tracing::info!("✅ Poster generation completed successfully!");
            println!("✅ Poster generation completed successfully!");
            for path in paths {
                println!("📁 {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Poster generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                city_poster::utils::error::ErrorSeverity::Low => 0,
                city_poster::utils::error::ErrorSeverity::Medium => 2,
                city_poster::utils::error::ErrorSeverity::High => 1,
                city_poster::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
