use std::env;

use log::info;

use morel::config::ParConfig;

const DEFAULT_CONFIG: &str = "./data/config/par.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    info!("Reading configuration from {}", path);

    let config = ParConfig::from_file(&path)?;
    let day = morel::par::calculate(&config)?;

    println!("Daily PAR, in Em-2d-1: {}", day.daily);

    Ok(())
}
