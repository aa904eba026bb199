use std::env;

use log::info;

use morel::config::ModelConfig;
use morel::production::{self, WaterColumn};

const DEFAULT_CONFIG: &str = "./data/config/morel91.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    info!("Reading configuration from {}", path);

    let config = ModelConfig::from_file(&path)?;

    let mut column = WaterColumn::new();
    column.load_inputs(&config)?;

    let result = production::calculate(&config, &column)?;

    println!("Calculated prime production is {}", result.total);

    Ok(())
}
