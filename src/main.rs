use anyhow::{Context, Result};
use chrono::{Local, Timelike};
use skycast::geolocate::Unavailable;
use skycast::{
    OpenMeteoForecast, OpenMeteoGeocoder, SearchController, SearchOutcome, SkycastConfig,
    SuggestionEngine, view,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(2).filter(|_| {
        std::env::args().nth(1).as_deref() == Some("--config")
    });
    let config = SkycastConfig::load(config_path.map(PathBuf::from).as_deref())
        .context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    let geocoder = Arc::new(OpenMeteoGeocoder::new(&config)?);
    let forecast = Arc::new(OpenMeteoForecast::new(&config)?);
    let controller = SearchController::new(geocoder.clone(), forecast);
    let engine = SuggestionEngine::new(geocoder, &config);

    // This build has no position service wired up, so the startup lookup is
    // a silent no-op; a platform shell can substitute its own source.
    controller.initial_geolocation(&Unavailable).await;

    // One-shot mode: skycast <city>
    if let Some(city) = std::env::args().nth(1).filter(|arg| arg != "--config") {
        run_search(&controller, &city).await;
        return Ok(());
    }

    println!("skycast {} - type a city name, or 'quit' to exit", skycast::VERSION);
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        // Feed the line through the autocomplete engine so matches show up
        // alongside the weather result
        if let Some(pending) = engine.on_input(line) {
            let _ = pending.await;
            print!("{}", view::render_suggestions(&engine.session()));
        }

        if engine.submit().is_some() {
            run_search(&controller, line).await;
        }
    }

    Ok(())
}

async fn run_search(controller: &SearchController, city: &str) {
    match controller.submit_by_name(city).await {
        SearchOutcome::NotFound => println!("City not found"),
        SearchOutcome::Skipped => println!("Please enter at least two characters"),
        SearchOutcome::FetchFailed => {
            println!("Could not load weather right now, please try again")
        }
        SearchOutcome::Updated | SearchOutcome::Superseded => {
            let hour = Local::now().hour();
            println!("{}", view::render_app(&controller.state(), hour));
        }
    }
}
