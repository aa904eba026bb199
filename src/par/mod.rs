//! Clear-sky PAR at the sea surface over one day.
//!
//! Produces the spectral irradiance and mean cosine table the production
//! model reads as its `ed` input, together with daily and instantaneous PAR.

use std::f32::consts::{FRAC_PI_2, PI};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::config::ParConfig;
use crate::interpolation::{Axis1D, SparseAxis};
use crate::production::photosynthesis::MOL_PHOTONS_PER_JOULE_NM;
use crate::quantity::{LoadError, Quantity, SpectralQuantity};
use crate::readers::{Field, read_records};
use crate::solar::SolarPosition;
use crate::utils::format_clock;

pub mod output;
pub mod transmittance;

use transmittance::{ClearSky, MU_SKY, Spectrum};

/// Interpolated atmosphere values are held within this range.
const ATMOSPHERE_LIMITS: (f32, f32) = (0.0, 10.0);

/// Conversion applied to `h_o` when the configuration does not give one.
pub const H_O_CONVERSION: f32 = 10.0;

#[derive(Error, Debug)]
pub enum ParError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("could not write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Irradiance just below the surface at one wavelength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralIrradiance {
    pub wavelength: u32,
    pub ed: f32,
    pub mu0: f32,
}

/// Results for one time step with the sun up.
#[derive(Debug, Clone)]
pub struct ParStep {
    pub minute: u32,
    pub zenith_deg: f32,
    /// Zenith angle as written to the sensor output, radians.
    pub sensor_angle: f32,
    /// Direct, diffuse and total PAR, µE m⁻² s⁻¹.
    pub par_direct: f32,
    pub par_diffuse: f32,
    pub par_total: f32,
    pub spectrum: Vec<SpectralIrradiance>,
}

#[derive(Debug, Clone)]
pub struct ParDay {
    /// Daily PAR, E m⁻² d⁻¹.
    pub daily: f32,
    pub steps: Vec<ParStep>,
}

/// Spectral atmosphere and optional zenith angle table.
#[derive(Debug, Clone)]
pub struct ParModel {
    pub h_o: SpectralQuantity,
    pub a_oz: SpectralQuantity,
    pub a_o: SpectralQuantity,
    pub a_w: SpectralQuantity,
    /// Zenith angle overrides in radians, by minute.
    pub theta: Quantity<Axis1D>,
}

impl Default for ParModel {
    fn default() -> Self {
        Self {
            h_o: SpectralQuantity::new("h_o", 0.0, H_O_CONVERSION),
            a_oz: SpectralQuantity::new("a_oz", 0.0, 1.0),
            a_o: SpectralQuantity::new("a_o", 0.0, 1.0),
            a_w: SpectralQuantity::new("a_w", 0.0, 1.0),
            theta: Quantity::new("theta", 0.0),
        }
    }
}

impl ParModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every configured input.
    pub fn load_inputs(&mut self, config: &ParConfig) -> Result<(), LoadError> {
        if let Some(input) = &config.inputs.atmosphere {
            let records =
                self.load_atmosphere(&input.path, input.conversion.unwrap_or(H_O_CONVERSION))?;
            info!("Loaded {} atmosphere records from {}", records, input.path.display());
        }
        if let Some(input) = &config.inputs.theta {
            let records = self.load_theta(&input.path, input.conversion.unwrap_or(1.0))?;
            info!("Loaded {} zenith angles from {}", records, input.path.display());
        }
        Ok(())
    }

    /// Reads `wavelength h_o a_oz a_o a_w` records; `h_o_conversion` scales
    /// the extraterrestrial irradiance only.
    pub fn load_atmosphere(&mut self, path: &Path, h_o_conversion: f32) -> Result<usize, LoadError> {
        for spectral in [&self.h_o, &self.a_oz, &self.a_o, &self.a_w] {
            spectral.quantity().begin_load()?;
        }

        let (h_o, a_oz, a_o, a_w) = (
            self.h_o.quantity_mut(),
            self.a_oz.quantity_mut(),
            self.a_o.quantity_mut(),
            self.a_w.quantity_mut(),
        );
        let result = read_records(path, &[Field::Number; 5], |r| {
            h_o.insert(r[0], r[1] * h_o_conversion);
            a_oz.insert(r[0], r[2]);
            a_o.insert(r[0], r[3]);
            a_w.insert(r[0], r[4]);
        });

        for spectral in [&mut self.a_oz, &mut self.a_o, &mut self.a_w] {
            spectral.quantity_mut().mark(path, result.is_ok());
        }
        self.h_o.quantity_mut().finish_load(path, result)
    }

    /// Reads `HH:MM degrees` records.
    pub fn load_theta(&mut self, path: &Path, conversion: f32) -> Result<usize, LoadError> {
        self.theta
            .load_records(path, &[Field::Time, Field::Number], conversion, |r, c| {
                (r[0], (r[1] * c).to_radians())
            })
    }

    /// Atmosphere values at one wavelength, held within their limits.
    pub fn spectrum(&self, wavelength: u32) -> Spectrum {
        let l = wavelength as f32;
        let (low, high) = ATMOSPHERE_LIMITS;
        Spectrum {
            wavelength: l,
            h_o: self.h_o.at(l).clamp(low, high),
            a_oz: self.a_oz.at(l).clamp(low, high),
            a_o: self.a_o.at(l).clamp(low, high),
            a_w: self.a_w.at(l).clamp(low, high),
        }
    }

    /// Zenith angle in radians: the loaded table when present, otherwise the
    /// computed solar position.
    pub fn theta(&self, config: &ParConfig, minute: u32) -> f32 {
        let atmosphere = &config.atmosphere;
        let computed =
            SolarPosition::zenith_at(config.day_of_year(), minute, atmosphere.lat, atmosphere.lon);
        self.theta
            .axis()
            .lookup(minute as f32, computed)
            .clamp(0.0, PI)
    }

    /// Walks the day and returns PAR for every step with the sun up.
    pub fn run(&self, config: &ParConfig) -> ParDay {
        log_parameters(config);

        let sky = ClearSky::new(&config.atmosphere, config.day_of_year(), self.theta(config, 720));
        let step = config.wavelength.step as f32;
        let to_micro_einsteins = MOL_PHOTONS_PER_JOULE_NM * 1.0e6;

        let mut steps = Vec::new();
        let mut daily = 0.0;

        for minute in config.minutes() {
            let theta = self.theta(config, minute);
            if is_below_horizon(theta) {
                continue;
            }

            let sun = sky.sun(theta);
            let mu_sun = sun.mu_sun();

            let mut par_direct = 0.0;
            let mut par_diffuse = 0.0;
            let mut spectrum = Vec::with_capacity(config.wavelength.count());

            for wavelength in config.wavelength.values() {
                let s = self.spectrum(wavelength);
                let direct = sun.direct(&s);
                let diffuse = sun.diffuse(&s);
                let ed = direct + diffuse;
                let mu0 = if ed > 0.0 {
                    (mu_sun * direct + MU_SKY * diffuse) / ed
                } else {
                    mu_sun
                };

                par_direct += s.wavelength * direct * step;
                par_diffuse += s.wavelength * diffuse * step;
                spectrum.push(SpectralIrradiance {
                    wavelength,
                    ed,
                    mu0,
                });
            }

            let par_total = (par_direct + par_diffuse) * to_micro_einsteins;
            debug!("{} PAR {} uE m^-2 s^-1", format_clock(minute), par_total);
            daily += par_total;

            steps.push(ParStep {
                minute,
                zenith_deg: theta.to_degrees(),
                sensor_angle: theta,
                par_direct: par_direct * to_micro_einsteins,
                par_diffuse: par_diffuse * to_micro_einsteins,
                par_total,
                spectrum,
            });
        }

        ParDay {
            daily: daily * config.time_step as f32 * 60.0 / 1.0e6,
            steps,
        }
    }
}

/// Zenith at or past 90°. The computed night zenith is exactly `π/2`.
fn is_below_horizon(theta: f32) -> bool {
    theta >= FRAC_PI_2 || theta.to_degrees() >= 90.0
}

fn log_parameters(config: &ParConfig) {
    let a = &config.atmosphere;
    info!(
        "begin= {} end= {} time_step= {} mins",
        format_clock(config.start_time),
        format_clock(config.end_time),
        config.time_step
    );
    info!(
        "wavelength= {}..{} nm step {} nm",
        config.wavelength.min, config.wavelength.max, config.wavelength.step
    );
    info!(
        "AM={} RH={} alpha={} WV={} P={} W={} WM={} D={} V={} O_3={} C={} lat={} lon={}",
        a.am,
        a.rh,
        a.alpha,
        a.wv,
        a.p,
        a.w,
        a.wm,
        config.day_of_year(),
        a.v,
        a.o3,
        a.c,
        a.lat,
        a.lon
    );
}

/// Loads the inputs, runs the day and writes the configured outputs.
pub fn calculate(config: &ParConfig) -> Result<ParDay, ParError> {
    let mut model = ParModel::new();
    model.load_inputs(config)?;

    let day = model.run(config);
    output::write_all(&day, &config.outputs)?;

    Ok(day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn midsummer() -> ParConfig {
        let mut config = ParConfig::new(NaiveDate::from_ymd_opt(2001, 6, 21).unwrap());
        config.time_step = 30;
        config.wavelength.step = 50;
        config
    }

    fn flat_atmosphere() -> ParModel {
        let mut model = ParModel::new();
        for wavelength in [400.0, 700.0] {
            model.h_o.insert(wavelength, 1.5);
        }
        model
    }

    #[test]
    fn test_night_is_skipped() {
        let day = flat_atmosphere().run(&midsummer());

        assert!(!day.steps.is_empty());
        assert!(day.steps.iter().all(|s| s.zenith_deg < 90.0));
        // 51°N: no sun at midnight even in June
        assert!(day.steps.iter().all(|s| s.minute > 120 && s.minute < 1320));
    }

    #[test]
    fn test_daily_par() {
        let config = midsummer();
        let day = flat_atmosphere().run(&config);

        let summed: f32 = day.steps.iter().map(|s| s.par_total).sum();
        let expected = summed * 30.0 * 60.0 / 1.0e6;
        assert!(((day.daily - expected) / expected).abs() < 1e-5);
        assert!(day.daily > 0.0);

        let noon = day.steps.iter().find(|s| s.minute == 720).unwrap();
        assert!(
            ((noon.par_direct + noon.par_diffuse - noon.par_total) / noon.par_total).abs() < 1e-5
        );
        for s in &noon.spectrum {
            assert!(s.mu0 > 0.0 && s.mu0 <= 1.0, "mu0 {} at {}", s.mu0, s.wavelength);
        }
    }

    #[test]
    fn test_no_atmosphere_file_gives_no_light() {
        let day = ParModel::new().run(&midsummer());
        assert_eq!(day.daily, 0.0);
    }

    #[test]
    fn test_atmosphere_values_are_clamped() {
        let mut model = ParModel::new();
        model.a_w.insert(400.0, 25.0);
        model.a_o.insert(400.0, -1.0);

        let s = model.spectrum(400);
        assert_eq!(s.a_w, 10.0);
        assert_eq!(s.a_o, 0.0);
    }

    #[test]
    fn test_load_atmosphere() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("atmo.txt");
        fs::write(&path, "400 0.15 0.1 0.0 0.0\n700 0.14 0.2 0.5 0.3\n").unwrap();

        let mut model = ParModel::new();
        assert_eq!(model.load_atmosphere(&path, H_O_CONVERSION).unwrap(), 2);

        let s = model.spectrum(700);
        assert!((s.h_o - 1.4).abs() < 1e-6);
        assert_eq!(s.a_oz, 0.2);
        assert_eq!(s.a_w, 0.3);

        assert!(matches!(
            model.load_atmosphere(&path, 1.0),
            Err(LoadError::AlreadyLoaded { name: "h_o" })
        ));
    }

    #[test]
    fn test_sun_just_above_horizon_is_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("theta.txt");
        fs::write(&path, "00:00 89.999\n").unwrap();

        let config = midsummer();
        let mut model = flat_atmosphere();
        model.load_theta(&path, 1.0).unwrap();
        let day = model.run(&config);

        assert_eq!(day.steps.len(), config.minutes().count());
        assert!(day.steps.iter().all(|s| s.par_total.is_finite()));
        assert!(!is_below_horizon(89.999_f32.to_radians()));
        assert!(is_below_horizon(FRAC_PI_2));
        assert!(is_below_horizon(PI));
    }

    #[test]
    fn test_theta_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("theta.txt");
        fs::write(&path, "10:00 40.0\n14:00 60.0\n").unwrap();

        let config = midsummer();
        let mut model = ParModel::new();
        let computed = model.theta(&config, 720);
        model.load_theta(&path, 1.0).unwrap();

        assert!((model.theta(&config, 720).to_degrees() - 50.0).abs() < 1e-3);
        assert!((model.theta(&config, 720) - computed).abs() > 1e-3);
        // Flat outside the table, even at night
        assert!((model.theta(&config, 0).to_degrees() - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_sample_configuration() {
        let mut config = ParConfig::from_file("./data/config/par.json").unwrap();
        config.outputs = crate::config::par::ParOutputs::default();

        let day = calculate(&config).unwrap();
        assert!(!day.steps.is_empty());
        assert!(day.daily > 0.0);
    }
}
