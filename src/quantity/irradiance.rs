use std::path::Path;

use super::{LoadError, LoadState, Loadable, Quantity};
use crate::interpolation::Axis2D;
use crate::readers::{Field, read_records};

const LAYOUT: [Field; 4] = [Field::Time, Field::Number, Field::Number, Field::Number];

/// Surface downwelling irradiance `Ed` and its mean cosine `mu0`, both as a
/// function of time of day and wavelength.
///
/// Records are `HH:MM wavelength ed mu0`. The span of loaded times sets the
/// default integration period.
#[derive(Debug, Clone)]
pub struct Irradiance {
    ed: Quantity<Axis2D>,
    mu0: Quantity<Axis2D>,
    mu0_conversion: f32,
    span: Option<(u32, u32)>,
}

impl Default for Irradiance {
    fn default() -> Self {
        Self {
            ed: Quantity::new("ed", 0.0),
            mu0: Quantity::new("mu0", 1.0),
            mu0_conversion: 1.0,
            span: None,
        }
    }
}

impl Irradiance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conversion applied to the `mu0` column on the next load.
    pub fn set_mu0_conversion(&mut self, conversion: f32) {
        self.mu0_conversion = conversion;
    }

    pub fn ed(&self, minute: u32, wavelength: f32) -> f32 {
        self.ed.value((minute as f32, wavelength))
    }

    pub fn mu0(&self, minute: u32, wavelength: f32) -> f32 {
        self.mu0.value((minute as f32, wavelength))
    }

    pub fn insert(&mut self, minute: u32, wavelength: f32, ed: f32, mu0: f32) {
        self.ed.insert((minute as f32, wavelength), ed);
        self.mu0.insert((minute as f32, wavelength), mu0);
        self.span = Some(match self.span {
            Some((first, last)) => (first.min(minute), last.max(minute)),
            None => (minute, minute),
        });
    }

    /// Earliest loaded minute, or 0 while empty.
    pub fn first_minute(&self) -> u32 {
        self.span.map_or(0, |(first, _)| first)
    }

    /// Latest loaded minute, or 0 while empty.
    pub fn last_minute(&self) -> u32 {
        self.span.map_or(0, |(_, last)| last)
    }

    pub fn quantity(&self) -> &Quantity<Axis2D> {
        &self.ed
    }
}

impl Loadable for Irradiance {
    fn name(&self) -> &'static str {
        self.ed.name()
    }

    fn load(&mut self, path: &Path, conversion: f32) -> Result<usize, LoadError> {
        self.ed.begin_load()?;

        let mu0_conversion = self.mu0_conversion;
        let result = read_records(path, &LAYOUT, |r| {
            self.insert(r[0] as u32, r[1], r[2] * conversion, r[3] * mu0_conversion);
        });

        self.mu0.mark(path, result.is_ok());
        self.ed.finish_load(path, result)
    }

    fn clear(&mut self) {
        self.ed.clear();
        self.mu0.clear();
        self.span = None;
    }

    fn is_loaded(&self) -> bool {
        self.ed.is_loaded()
    }

    fn state(&self) -> &LoadState {
        self.ed.state()
    }
}
