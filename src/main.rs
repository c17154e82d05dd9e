use log::{LevelFilter, error, info};
use std::error::Error;

mod app;
mod audio;
mod config;
mod game;
mod screens;
mod ui;

fn main() -> Result<(), Box<dyn Error>> {
    // Install the logger immediately, then set the runtime max level from the
    // config after loading it.
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Trace)
        .init();
    // Startup default when the config is missing or malformed. Logs go to
    // stderr; redirect it when running with higher levels, the terminal
    // itself is owned by the game.
    log::set_max_level(LevelFilter::Warn);

    config::load();
    log::set_max_level(config::get().log_level.as_level_filter());

    info!("RingRush starting...");

    if let Err(e) = app::run() {
        error!("Application exited with error: {}", e);
        return Err(e);
    }

    info!("Application exited gracefully.");
    Ok(())
}
