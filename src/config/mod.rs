use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::utils::parse_clock;

pub mod error;
pub use error::ConfigError;

pub mod par;
pub use par::ParConfig;

pub mod policy;
pub use policy::RecomputePolicy;

/// Quantities the primary production model can read, by configuration key.
pub const MODEL_INPUTS: [&str; 12] = [
    "ed", "chl", "beta", "st", "k", "kc", "kw", "aw", "bw", "achl", "ab", "aph",
];

/// An evenly stepped integer range, both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRange {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl GridRange {
    pub fn new(name: &'static str, min: u32, max: u32, step: u32) -> Result<Self, ConfigError> {
        if step == 0 {
            return Err(ConfigError::NotPositive(name));
        }
        if min > max {
            return Err(ConfigError::RangeOrder(name));
        }
        Ok(Self { min, max, step })
    }

    /// Number of grid points.
    pub fn count(&self) -> usize {
        ((self.max - self.min) / self.step) as usize + 1
    }

    pub fn values(&self) -> impl Iterator<Item = u32> + use<> {
        (self.min..=self.max).step_by(self.step as usize)
    }

    pub fn at(&self, index: usize) -> u32 {
        self.min + index as u32 * self.step
    }

    /// Grid index of `value`, clamped into the grid.
    pub fn index_of(&self, value: u32) -> usize {
        let index = (value.saturating_sub(self.min) / self.step) as usize;
        index.min(self.count() - 1)
    }
}

#[derive(Deserialize)]
struct RangeHelper {
    min: u32,
    max: u32,
    step: u32,
}

impl RangeHelper {
    fn into_range<E: Error>(self, name: &'static str) -> Result<GridRange, E> {
        GridRange::new(name, self.min, self.max, self.step).map_err(E::custom)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InputFile {
    pub path: PathBuf,
    pub conversion: Option<f32>,
    /// Only read for the irradiance input.
    pub mu0_conversion: Option<f32>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Outputs {
    pub profile: Option<PathBuf>,
    pub spec_irr_depth: Option<PathBuf>,
    pub spec_irr_depth_8bit: Option<PathBuf>,
    pub spec_irr_depth_tiff: Option<PathBuf>,
}

/// Settings of one primary production run.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Minutes between time steps.
    pub time_step: u32,
    /// First minute, defaults to the first loaded irradiance time.
    pub start_time: Option<u32>,
    /// Last minute, defaults to the last loaded irradiance time.
    pub end_time: Option<u32>,
    pub wavelength: GridRange,
    pub depth: GridRange,
    pub euphotic_ratio: f32,
    /// KPUR at 20 °C, µE m⁻² s⁻¹.
    pub kpur: f32,
    pub temperature: f32,
    pub phi_mu_max: f32,
    pub a_chl_max: f32,
    /// Constant chlorophyll replacing any chlorophyll input.
    pub chl: Option<f32>,
    pub chl_recalc: RecomputePolicy,
    pub a_chl_max_recalc: RecomputePolicy,
    pub phi_mu_max_recalc: RecomputePolicy,
    pub recompute_irr: bool,
    pub inputs: BTreeMap<String, InputFile>,
    pub hydrolight_lut: Option<PathBuf>,
    pub outputs: Outputs,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            time_step: 1,
            start_time: None,
            end_time: None,
            wavelength: GridRange {
                min: 400,
                max: 700,
                step: 5,
            },
            depth: GridRange {
                min: 0,
                max: 300,
                step: 1,
            },
            euphotic_ratio: 0.01,
            kpur: 80.0,
            temperature: crate::quantity::profile::SEA_TEMPERATURE_DEFAULT,
            phi_mu_max: 0.06,
            a_chl_max: 0.033,
            chl: None,
            chl_recalc: RecomputePolicy::FromDepth,
            a_chl_max_recalc: RecomputePolicy::Constant,
            phi_mu_max_recalc: RecomputePolicy::Constant,
            recompute_irr: true,
            inputs: BTreeMap::new(),
            hydrolight_lut: None,
            outputs: Outputs::default(),
        }
    }
}

fn parse_time<E: Error>(token: Option<String>) -> Result<Option<u32>, E> {
    token
        .map(|t| parse_clock(&t).ok_or_else(|| E::custom(ConfigError::Time(t.clone()))))
        .transpose()
}

fn positive<E: Error>(name: &'static str, value: f32) -> Result<f32, E> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(E::custom(ConfigError::NotPositive(name)))
    }
}

// Deserializes a ModelConfig, filling in defaults and rejecting settings the
// engine cannot run with.
impl<'de> Deserialize<'de> for ModelConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct ConfigHelper {
            time_step: Option<u32>,
            start_time: Option<String>,
            end_time: Option<String>,
            wavelength: Option<RangeHelper>,
            depth: Option<RangeHelper>,
            euphotic_ratio: Option<f32>,
            kpur: Option<f32>,
            temperature: Option<f32>,
            phi_mu_max: Option<f32>,
            a_chl_max: Option<f32>,
            chl: Option<f32>,
            chl_recalc: Option<RecomputePolicy>,
            a_chl_max_recalc: Option<RecomputePolicy>,
            phi_mu_max_recalc: Option<RecomputePolicy>,
            recompute_irr: Option<bool>,
            inputs: BTreeMap<String, InputFile>,
            hydrolight_lut: Option<PathBuf>,
            #[serde(default)]
            outputs: Outputs,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;
        let defaults = ModelConfig::default();

        let time_step = helper.time_step.unwrap_or(defaults.time_step);
        if time_step == 0 {
            return Err(D::Error::custom(ConfigError::NotPositive("time_step")));
        }

        let start_time = parse_time::<D::Error>(helper.start_time)?;
        let end_time = parse_time::<D::Error>(helper.end_time)?;
        if let (Some(start), Some(end)) = (start_time, end_time) {
            if start > end {
                return Err(D::Error::custom(ConfigError::TimeOrder));
            }
        }

        let wavelength = match helper.wavelength {
            Some(range) => range.into_range::<D::Error>("wavelength")?,
            None => defaults.wavelength,
        };
        let depth = match helper.depth {
            Some(range) => range.into_range::<D::Error>("depth")?,
            None => defaults.depth,
        };

        let euphotic_ratio = helper.euphotic_ratio.unwrap_or(defaults.euphotic_ratio);
        if !(0.0..=1.0).contains(&euphotic_ratio) {
            return Err(D::Error::custom(ConfigError::EuphoticRatio));
        }

        let chl = helper.chl.map(|c| positive::<D::Error>("chl", c)).transpose()?;

        for name in helper.inputs.keys() {
            if !MODEL_INPUTS.contains(&name.as_str()) {
                return Err(D::Error::custom(ConfigError::UnknownInput(name.clone())));
            }
        }
        for required in ["ed", "achl"] {
            if !helper.inputs.contains_key(required) {
                return Err(D::Error::custom(ConfigError::MissingInput(required)));
            }
        }

        Ok(ModelConfig {
            time_step,
            start_time,
            end_time,
            wavelength,
            depth,
            euphotic_ratio,
            kpur: positive::<D::Error>("kpur", helper.kpur.unwrap_or(defaults.kpur))?,
            temperature: helper.temperature.unwrap_or(defaults.temperature),
            phi_mu_max: positive::<D::Error>("phi_mu_max", helper.phi_mu_max.unwrap_or(defaults.phi_mu_max))?,
            a_chl_max: positive::<D::Error>("a_chl_max", helper.a_chl_max.unwrap_or(defaults.a_chl_max))?,
            chl,
            // A constant chlorophyll has no depth structure to follow
            chl_recalc: match chl {
                Some(_) => RecomputePolicy::Constant,
                None => helper.chl_recalc.unwrap_or(defaults.chl_recalc),
            },
            a_chl_max_recalc: helper.a_chl_max_recalc.unwrap_or(defaults.a_chl_max_recalc),
            phi_mu_max_recalc: helper.phi_mu_max_recalc.unwrap_or(defaults.phi_mu_max_recalc),
            recompute_irr: helper.recompute_irr.unwrap_or(defaults.recompute_irr),
            inputs: helper.inputs,
            hydrolight_lut: helper.hydrolight_lut,
            outputs: helper.outputs,
        })
    }
}

impl ModelConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ModelConfig, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: ModelConfig = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Time steps of the run, given the span of the loaded irradiance.
    pub fn minutes(&self, first: u32, last: u32) -> impl Iterator<Item = u32> + use<> {
        let start = self.start_time.unwrap_or(first);
        let end = self.end_time.unwrap_or(last);
        (start..=end).step_by(self.time_step as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const MINIMAL: &str = r#"
    {
        "inputs": {
            "ed": { "path": "ed.txt" },
            "achl": { "path": "achl.txt", "conversion": 0.5 }
        }
    }
    "#;

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.json");
        let mut file = File::create(&file_path).unwrap();

        let config_data = r#"
    {
        "time_step": 10,
        "start_time": "06:00",
        "end_time": "18:00",
        "wavelength": { "min": 400, "max": 700, "step": 10 },
        "depth": { "min": 0, "max": 100, "step": 2 },
        "euphotic_ratio": 0.001,
        "phi_mu_max_recalc": "DEPTH",
        "recompute_irr": false,
        "inputs": {
            "ed": { "path": "ed.txt", "mu0_conversion": 1.0 },
            "achl": { "path": "achl.txt" },
            "kw": { "path": "kw.txt" }
        },
        "outputs": { "profile": "profile.tsv" }
    }
    "#;

        file.write_all(config_data.as_bytes()).unwrap();

        let config = ModelConfig::from_file(file_path).unwrap();

        assert_eq!(config.time_step, 10);
        assert_eq!(config.start_time, Some(360));
        assert_eq!(config.end_time, Some(1080));
        assert_eq!(config.wavelength.count(), 31);
        assert_eq!(config.depth.count(), 51);
        assert_eq!(config.phi_mu_max_recalc, RecomputePolicy::FromDepth);
        assert_eq!(config.chl_recalc, RecomputePolicy::FromDepth);
        assert!(!config.recompute_irr);
        assert_eq!(config.outputs.profile, Some(PathBuf::from("profile.tsv")));
        assert_eq!(config.inputs.len(), 3);
    }

    #[test]
    fn test_defaults() {
        let config: ModelConfig = serde_json::from_str(MINIMAL).unwrap();

        assert_eq!(config.time_step, 1);
        assert_eq!(config.wavelength, GridRange { min: 400, max: 700, step: 5 });
        assert_eq!(config.depth.count(), 301);
        assert!((config.euphotic_ratio - 0.01).abs() < 1e-9);
        assert!((config.kpur - 80.0).abs() < 1e-6);
        assert_eq!(config.a_chl_max_recalc, RecomputePolicy::Constant);
        assert_eq!(config.inputs["achl"].conversion, Some(0.5));
        assert!(config.recompute_irr);
    }

    #[test]
    fn test_missing_required_input() {
        let result = serde_json::from_str::<ModelConfig>(r#"{ "inputs": { "ed": { "path": "ed.txt" } } }"#);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("achl"), "{message}");
    }

    #[test]
    fn test_unknown_input() {
        let data = r#"{ "inputs": {
            "ed": { "path": "a" }, "achl": { "path": "b" }, "salinity": { "path": "c" } } }"#;
        let message = serde_json::from_str::<ModelConfig>(data).unwrap_err().to_string();
        assert!(message.contains("salinity"), "{message}");
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let data = r#"{ "depth": { "min": 50, "max": 10, "step": 1 },
            "inputs": { "ed": { "path": "a" }, "achl": { "path": "b" } } }"#;
        assert!(serde_json::from_str::<ModelConfig>(data).is_err());

        let data = r#"{ "wavelength": { "min": 400, "max": 700, "step": 0 },
            "inputs": { "ed": { "path": "a" }, "achl": { "path": "b" } } }"#;
        assert!(serde_json::from_str::<ModelConfig>(data).is_err());

        let data = r#"{ "euphotic_ratio": 1.5,
            "inputs": { "ed": { "path": "a" }, "achl": { "path": "b" } } }"#;
        assert!(serde_json::from_str::<ModelConfig>(data).is_err());

        let data = r#"{ "start_time": "18:00", "end_time": "06:00",
            "inputs": { "ed": { "path": "a" }, "achl": { "path": "b" } } }"#;
        assert!(serde_json::from_str::<ModelConfig>(data).is_err());
    }

    #[test]
    fn test_constant_chl_forces_constant_policy() {
        let data = r#"{ "chl": 0.8, "chl_recalc": "DEPTH",
            "inputs": { "ed": { "path": "a" }, "achl": { "path": "b" } } }"#;
        let config: ModelConfig = serde_json::from_str(data).unwrap();
        assert_eq!(config.chl, Some(0.8));
        assert_eq!(config.chl_recalc, RecomputePolicy::Constant);
    }

    #[test]
    fn test_grid_range() {
        let range = GridRange::new("depth", 0, 10, 3).unwrap();
        assert_eq!(range.count(), 4);
        assert_eq!(range.values().collect::<Vec<_>>(), vec![0, 3, 6, 9]);
        assert_eq!(range.at(2), 6);
        assert_eq!(range.index_of(7), 2);
        assert_eq!(range.index_of(100), 3);
        assert!(GridRange::new("depth", 5, 1, 1).is_err());
    }

    #[test]
    fn test_minutes() {
        let mut config = ModelConfig {
            time_step: 30,
            ..ModelConfig::default()
        };
        assert_eq!(config.minutes(600, 700).collect::<Vec<_>>(), vec![600, 630, 660, 690]);

        config.start_time = Some(650);
        assert_eq!(config.minutes(600, 700).collect::<Vec<_>>(), vec![650, 680]);
    }
}
