//! Daily primary production from the Morel (1991) spectral model.
//!
//! The [`Engine`] walks the configured time steps, finds the euphotic depth
//! at each one, integrates the production rate over wavelength at every depth
//! step down to it and accumulates the depth integrals over the day.

use std::io;
use std::path::PathBuf;

use log::info;
use ndarray::Array2;
use thiserror::Error;

use crate::config::{ModelConfig, RecomputePolicy};
use crate::lut::{IrradianceTable, LutError};
use crate::quantity::Loadable;
use crate::utils::format_clock;

pub mod euphotic;
pub mod output;
pub mod photosynthesis;
pub mod scratch;
pub mod water_column;

pub use scratch::Scratch;
pub use water_column::WaterColumn;

use photosynthesis::{
    MOL_PHOTONS_PER_JOULE_NM, a_chl_max_from_chl, absorption, phi_mu_max_from_chl,
    photoinhibition, scalar_factor, scattering,
};

/// Minute used when a single representative time of day is needed.
pub const NOON: u32 = 720;

#[derive(Error, Debug)]
pub enum ProductionError {
    #[error("could not allocate working space for {depths} depths x {wavelengths} wavelengths")]
    Allocation { depths: usize, wavelengths: usize },

    #[error(transparent)]
    Lut(#[from] LutError),

    #[error("could not write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write {}: {source}", .path.display())]
    Tiff {
        path: PathBuf,
        #[source]
        source: tiff::TiffError,
    },
}

/// Result of a full calculation.
#[derive(Debug, Clone)]
pub struct Production {
    /// Daily production, mg C m⁻² d⁻¹.
    pub total: f32,
    /// Production accumulated at each depth step over the day.
    pub pp_depth: Vec<f32>,
}

/// Chlorophyll-dependent parameters in force at one depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    pub a_chl_max: f32,
    pub phi_mu_max: f32,
}

pub struct Engine<'a> {
    config: &'a ModelConfig,
    column: &'a WaterColumn,
    scratch: Scratch,
    table: Option<IrradianceTable>,
}

impl<'a> Engine<'a> {
    /// Allocates the working buffers and reads the irradiance table if one is
    /// configured.
    pub fn new(config: &'a ModelConfig, column: &'a WaterColumn) -> Result<Self, ProductionError> {
        let scratch = Scratch::allocate(config.depth.count(), config.wavelength.count())?;
        let table = config
            .hydrolight_lut
            .as_ref()
            .map(|path| IrradianceTable::from_file(path, config.wavelength.count()))
            .transpose()?;

        Ok(Self {
            config,
            column,
            scratch,
            table,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        self.config
    }

    pub fn column(&self) -> &WaterColumn {
        self.column
    }

    /// Irradiance ratio grid as left by the last euphotic depth search.
    pub fn ratio(&self) -> &Array2<f32> {
        &self.scratch.ratio
    }

    pub fn pp_depth(&self) -> &[f32] {
        &self.scratch.pp_depth
    }

    pub fn into_production(self, total: f32) -> Production {
        Production {
            total,
            pp_depth: self.scratch.pp_depth,
        }
    }

    pub fn log_parameters(&self) {
        let config = self.config;
        let first = self.column.ed.first_minute();
        let last = self.column.ed.last_minute();

        info!("KPUR(20)= {} micro Einsteins m^-2 s^-1", config.kpur);
        info!(
            "begin= {} end= {} time_step= {} mins",
            format_clock(config.start_time.unwrap_or(first)),
            format_clock(config.end_time.unwrap_or(last)),
            config.time_step
        );
        info!(
            "wavelength= {}..{} nm step {} nm",
            config.wavelength.min, config.wavelength.max, config.wavelength.step
        );
        info!(
            "depth= {}..{} m step {} m",
            config.depth.min, config.depth.max, config.depth.step
        );
        info!("phi_mu_max= {} ({})", config.phi_mu_max, config.phi_mu_max_recalc);
        info!("A_chl_max= {} ({})", config.a_chl_max, config.a_chl_max_recalc);
        match config.chl {
            Some(csat) => info!("Chl(Z)= Csat={} mg Chl m^-3", csat),
            None => info!("Chl(Z)= {}", config.chl_recalc),
        }
        if let Some(path) = &config.hydrolight_lut {
            info!("Euphotic depth from {}", path.display());
        }
        if self.column.ab.is_loaded() {
            info!("Scalar irradiance from loaded b/a");
        }
    }

    /// Integrates production over the day and returns the total.
    pub fn run(&mut self) -> f32 {
        let config = self.config;
        let seconds = config.time_step as f32 * 60.0;
        let mut total = 0.0;

        let minutes = config.minutes(self.column.ed.first_minute(), self.column.ed.last_minute());

        if config.recompute_irr {
            for minute in minutes {
                let ze = self.euphotic_depth(minute);
                total += self.integrate_over_depth(minute, ze) * seconds;
            }
        } else {
            let ze = self.euphotic_depth(NOON);
            for minute in minutes {
                total += self.integrate_over_depth(minute, ze) * seconds;
            }
        }

        total
    }

    /// Fills the ratio grid for `minute` and returns the euphotic depth.
    pub fn euphotic_depth(&mut self, minute: u32) -> u32 {
        match &self.table {
            Some(table) => euphotic::from_table(&mut self.scratch.ratio, table, self.config),
            None => euphotic::computed(&mut self.scratch.ratio, self.column, self.config, minute),
        }
    }

    fn integrate_over_depth(&mut self, minute: u32, ze: u32) -> f32 {
        let config = self.config;
        let seconds = config.time_step as f32 * 60.0;
        let step = config.depth.step as f32;
        let mean_chl = self.mean_chl(minute, config.depth.min, ze);
        let surface_chl = self.chl(minute, 0);

        info!("{} Euphotic depth = {}m", format_clock(minute), ze);

        let mut total = 0.0;
        for (index, depth) in config.depth.values().enumerate() {
            if depth > ze {
                break;
            }
            let rates = self.rates(surface_chl, self.chl(minute, depth));
            let temp = self.integrate_over_wavelength(minute, depth, mean_chl, rates) * step;
            self.scratch.pp_depth[index] += temp * seconds;
            total += temp;
        }

        total
    }

    fn integrate_over_wavelength(&self, minute: u32, depth: u32, mean_chl: f32, rates: Rates) -> f32 {
        let pur_total = self.pur_total(minute, depth, mean_chl);
        let x = pur_total / self.kpur(minute, depth);

        (12.0 * rates.phi_mu_max)
            * (rates.a_chl_max * self.chl(minute, depth) * pur_total)
            * photoinhibition(x, self.column.beta.at(minute, depth as f32))
    }

    /// Parameters in force at one depth under the configured policies.
    pub fn rates(&self, surface_chl: f32, depth_chl: f32) -> Rates {
        let config = self.config;
        Rates {
            a_chl_max: config.a_chl_max_recalc.resolve(
                config.a_chl_max,
                surface_chl,
                depth_chl,
                a_chl_max_from_chl,
            ),
            phi_mu_max: config.phi_mu_max_recalc.resolve(
                config.phi_mu_max,
                surface_chl,
                depth_chl,
                phi_mu_max_from_chl,
            ),
        }
    }

    /// Chlorophyll used by the rate formula; surface value unless the
    /// chlorophyll policy follows depth.
    pub fn chl(&self, minute: u32, depth: u32) -> f32 {
        match self.config.chl_recalc {
            RecomputePolicy::FromDepth => self.column.chl.at(minute, depth as f32),
            _ => self.column.chl.at(minute, 0.0),
        }
    }

    /// Mean of [`Engine::chl`] sampled every depth step in `[z0, z1]`.
    pub fn mean_chl(&self, minute: u32, z0: u32, z1: u32) -> f32 {
        let step = self.config.depth.step as usize;
        let (sum, samples) = (z0..=z1)
            .step_by(step)
            .fold((0.0, 0), |(sum, n), z| (sum + self.chl(minute, z), n + 1));

        if samples == 0 {
            self.chl(minute, z0)
        } else {
            sum / samples as f32
        }
    }

    /// KPUR at temperature, E m⁻² s⁻¹.
    pub fn kpur(&self, minute: u32, depth: u32) -> f32 {
        photosynthesis::kpur(self.config.kpur, self.column.st.at(minute, depth as f32))
    }

    /// Downwelling irradiance at depth from the ratio grid.
    pub fn ed_at_depth(&self, wavelength: u32, depth: u32, minute: u32) -> f32 {
        let i = self.config.depth.index_of(depth);
        let j = self.config.wavelength.index_of(wavelength);
        self.scratch.ratio[[i, j]] * self.column.ed.ed(minute, wavelength as f32)
    }

    /// Photosynthetically available scalar irradiance per nm, mol photons m⁻² s⁻¹ nm⁻¹.
    pub fn par(&self, wavelength: u32, depth: u32, minute: u32, mean_chl: f32) -> f32 {
        let column = self.column;
        let l = wavelength as f32;
        let mu0 = column.ed.mu0(minute, l);

        let b_over_a = if column.ab.is_loaded() {
            column.ab.at(depth as f32, l)
        } else {
            scattering(column.bw.at(l), l, mean_chl)
                / absorption(column.aw.at(l), column.achl.at(l), l, mean_chl)
        };

        self.ed_at_depth(wavelength, depth, minute) * scalar_factor(mu0, b_over_a) * l * MOL_PHOTONS_PER_JOULE_NM
    }

    pub fn pur(&self, wavelength: u32, depth: u32, minute: u32, mean_chl: f32) -> f32 {
        self.par(wavelength, depth, minute, mean_chl) * self.column.achl.at(wavelength as f32)
    }

    /// PUR summed over the wavelength grid.
    pub fn pur_total(&self, minute: u32, depth: u32, mean_chl: f32) -> f32 {
        let sum: f32 = self
            .config
            .wavelength
            .values()
            .map(|l| self.pur(l, depth, minute, mean_chl))
            .sum();
        sum * self.config.wavelength.step as f32
    }
}

/// Runs the whole calculation and writes the configured outputs.
pub fn calculate(config: &ModelConfig, column: &WaterColumn) -> Result<Production, ProductionError> {
    let mut engine = Engine::new(config, column)?;
    engine.log_parameters();

    let total = engine.run();
    output::write_all(&mut engine)?;

    Ok(engine.into_production(total))
}
