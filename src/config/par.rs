use chrono::{Datelike, NaiveDate};

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::{ConfigError, GridRange, InputFile};
use crate::utils::parse_clock;

/// Atmospheric state for the clear-sky irradiance model.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Atmosphere {
    /// Air-mass type, 1 (marine) to 10 (continental).
    pub am: f32,
    /// Relative humidity, %.
    pub rh: f32,
    /// Ångström exponent.
    pub alpha: f32,
    /// Precipitable water vapour, cm.
    pub wv: f32,
    /// Surface pressure, mbar.
    pub p: f32,
    /// Wind speed, m s⁻¹.
    pub w: f32,
    /// 24 h mean wind speed, m s⁻¹.
    pub wm: f32,
    /// Visibility, km.
    pub v: f32,
    /// Ozone, Dobson units.
    pub o3: f32,
    /// Cloud cover fraction.
    pub c: f32,
    pub lat: f32,
    pub lon: f32,
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self {
            am: 1.0,
            rh: 75.0,
            alpha: 0.8,
            wv: 2.0,
            p: 1013.0,
            w: 2.0,
            wm: 4.0,
            v: 15.0,
            o3: 270.0,
            c: 0.0,
            lat: 51.0,
            lon: -5.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ParInputs {
    /// `wavelength h_o a_oz a_o a_w` table.
    pub atmosphere: Option<InputFile>,
    /// `HH:MM degrees` zenith angles replacing the computed ones.
    pub theta: Option<InputFile>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ParOutputs {
    pub par: Option<PathBuf>,
    pub sensor: Option<PathBuf>,
    pub total_par: Option<PathBuf>,
    pub zenith: Option<PathBuf>,
}

/// Settings of one PAR run.
#[derive(Debug, Clone)]
pub struct ParConfig {
    pub date: NaiveDate,
    pub start_time: u32,
    pub end_time: u32,
    pub time_step: u32,
    pub wavelength: GridRange,
    pub atmosphere: Atmosphere,
    pub inputs: ParInputs,
    pub outputs: ParOutputs,
}

impl ParConfig {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            start_time: 0,
            end_time: 24 * 60,
            time_step: 1,
            wavelength: GridRange {
                min: 400,
                max: 700,
                step: 5,
            },
            atmosphere: Atmosphere::default(),
            inputs: ParInputs::default(),
            outputs: ParOutputs::default(),
        }
    }

    pub fn day_of_year(&self) -> u32 {
        self.date.ordinal()
    }

    pub fn minutes(&self) -> impl Iterator<Item = u32> + use<> {
        (self.start_time..=self.end_time).step_by(self.time_step as usize)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ParConfig, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: ParConfig = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }
}

impl<'de> Deserialize<'de> for ParConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ParHelper {
            date: String,
            start_time: Option<String>,
            end_time: Option<String>,
            time_step: Option<u32>,
            wavelength: Option<super::RangeHelper>,
            #[serde(default)]
            atmosphere: Atmosphere,
            #[serde(default)]
            inputs: ParInputs,
            #[serde(default)]
            outputs: ParOutputs,
        }

        let helper = ParHelper::deserialize(deserializer)?;

        let date = NaiveDate::parse_from_str(&helper.date, "%Y-%m-%d")
            .map_err(|e| D::Error::custom(format!("Invalid date format: {}", e)))?;

        let mut config = ParConfig::new(date);

        if let Some(token) = helper.start_time {
            config.start_time =
                parse_clock(&token).ok_or_else(|| D::Error::custom(ConfigError::Time(token.clone())))?;
        }
        if let Some(token) = helper.end_time {
            config.end_time =
                parse_clock(&token).ok_or_else(|| D::Error::custom(ConfigError::Time(token.clone())))?;
        }
        if config.start_time > config.end_time {
            return Err(D::Error::custom(ConfigError::TimeOrder));
        }

        if let Some(step) = helper.time_step {
            if step == 0 {
                return Err(D::Error::custom(ConfigError::NotPositive("time_step")));
            }
            config.time_step = step;
        }

        if let Some(range) = helper.wavelength {
            config.wavelength = range.into_range::<D::Error>("wavelength")?;
        }

        if !(0.0..=1.0).contains(&helper.atmosphere.c) {
            return Err(D::Error::custom("cloud cover c must lie between 0 and 1"));
        }

        config.atmosphere = helper.atmosphere;
        config.inputs = helper.inputs;
        config.outputs = helper.outputs;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: ParConfig = serde_json::from_str(r#"{ "date": "2001-06-21" }"#).unwrap();

        assert_eq!(config.day_of_year(), 172);
        assert_eq!(config.start_time, 0);
        assert_eq!(config.end_time, 1440);
        assert_eq!(config.atmosphere, Atmosphere::default());
        assert_eq!(config.wavelength.count(), 61);
        assert!(config.inputs.theta.is_none());
    }

    #[test]
    fn test_overrides() {
        let data = r#"
        {
            "date": "2001-01-10",
            "start_time": "04:00",
            "end_time": "20:00",
            "time_step": 15,
            "atmosphere": { "lat": 60.0, "o3": 300.0 },
            "inputs": { "atmosphere": { "path": "atmo.txt" } },
            "outputs": { "par": "par.txt" }
        }
        "#;
        let config: ParConfig = serde_json::from_str(data).unwrap();

        assert_eq!(config.day_of_year(), 10);
        assert_eq!(config.minutes().next(), Some(240));
        assert_eq!(config.minutes().count(), 65);
        assert_eq!(config.atmosphere.lat, 60.0);
        assert_eq!(config.atmosphere.rh, 75.0);
        assert_eq!(config.outputs.par, Some(PathBuf::from("par.txt")));
    }

    #[test]
    fn test_rejects_bad_date() {
        assert!(serde_json::from_str::<ParConfig>(r#"{ "date": "2001-13-01" }"#).is_err());
        assert!(serde_json::from_str::<ParConfig>(r#"{ "date": "2001-01-01", "time_step": 0 }"#).is_err());
    }
}
