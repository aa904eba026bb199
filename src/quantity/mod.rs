//! Physical fields backed by the sparse axes.
//!
//! A [`Quantity`] owns one axis and the value returned while that axis is
//! empty. The typed wrappers in the submodules fix the axis shape, the record
//! layout of the input file and the default for each field.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::interpolation::SparseAxis;
use crate::readers::{Field, read_records};

pub mod aph;
pub mod irradiance;
pub mod optics;
pub mod profile;
pub mod spectral;

pub use crate::readers::LoadError;
pub use aph::PhytoplanktonAbsorption;
pub use irradiance::Irradiance;
pub use optics::{ChlAttenuation, DepthSpectralQuantity};
pub use profile::ProfileQuantity;
pub use spectral::SpectralQuantity;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Empty,
    Loaded { source: PathBuf, records: usize },
    /// The source was rejected part way; `records` samples were kept.
    Failed { source: PathBuf, records: usize },
}

/// Operations shared by every quantity that can be filled from a file.
pub trait Loadable {
    fn name(&self) -> &'static str;

    /// Loads `path`, multiplying each value by `conversion`.
    ///
    /// Refuses with [`LoadError::AlreadyLoaded`] while data is present.
    fn load(&mut self, path: &Path, conversion: f32) -> Result<usize, LoadError>;

    fn clear(&mut self);

    fn is_loaded(&self) -> bool;

    fn state(&self) -> &LoadState;

    /// Conversion applied when the configuration does not give one.
    fn default_conversion(&self) -> f32 {
        1.0
    }
}

#[derive(Debug, Clone)]
pub struct Quantity<A: SparseAxis> {
    name: &'static str,
    axis: A,
    default: f32,
    state: LoadState,
}

impl<A: SparseAxis> Quantity<A> {
    pub fn new(name: &'static str, default: f32) -> Self {
        Self {
            name,
            axis: A::default(),
            default,
            state: LoadState::Empty,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn default_value(&self) -> f32 {
        self.default
    }

    pub fn set_default(&mut self, default: f32) {
        self.default = default;
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn axis(&self) -> &A {
        &self.axis
    }

    pub fn len(&self) -> usize {
        self.axis.len()
    }

    pub fn is_loaded(&self) -> bool {
        !self.axis.is_empty()
    }

    /// Interpolated value, or the default while nothing is stored.
    pub fn value(&self, at: A::Point) -> f32 {
        self.axis.lookup(at, self.default)
    }

    pub fn insert(&mut self, at: A::Point, value: f32) {
        self.axis.insert(at, value);
    }

    /// Drops all samples. Calling it on an empty quantity does nothing.
    pub fn clear(&mut self) {
        self.axis.clear();
        self.state = LoadState::Empty;
    }

    pub(crate) fn begin_load(&self) -> Result<(), LoadError> {
        if self.is_loaded() {
            return Err(LoadError::AlreadyLoaded { name: self.name });
        }
        Ok(())
    }

    pub(crate) fn mark(&mut self, path: &Path, succeeded: bool) {
        let source = path.to_path_buf();
        let records = self.axis.len();
        self.state = if succeeded {
            LoadState::Loaded { source, records }
        } else {
            LoadState::Failed { source, records }
        };
    }

    pub(crate) fn finish_load(
        &mut self,
        path: &Path,
        result: Result<usize, LoadError>,
    ) -> Result<usize, LoadError> {
        self.mark(path, result.is_ok());
        match &result {
            Ok(records) => debug!("{}: {} records from {}", self.name, records, path.display()),
            Err(e) => warn!("{}: kept {} samples after error: {}", self.name, self.len(), e),
        }
        result
    }

    /// Loads a one-record-per-line file. `record` maps the parsed fields and
    /// the conversion factor to a point and a value.
    pub fn load_records<F>(
        &mut self,
        path: &Path,
        layout: &[Field],
        conversion: f32,
        record: F,
    ) -> Result<usize, LoadError>
    where
        F: Fn(&[f32], f32) -> (A::Point, f32),
    {
        self.begin_load()?;

        let axis = &mut self.axis;
        let result = read_records(path, layout, |fields| {
            let (at, value) = record(fields, conversion);
            axis.insert(at, value);
        });

        self.finish_load(path, result)
    }
}

impl<A: SparseAxis + fmt::Display> fmt::Display for Quantity<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} (default {})", self.name, self.default)?;
        write!(f, "{}", self.axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::{Axis1D, Axis2D};
    use std::fs;
    use tempfile::tempdir;

    fn wavelength_value(fields: &[f32], conversion: f32) -> (f32, f32) {
        (fields[0], fields[1] * conversion)
    }

    #[test]
    fn test_value_defaults_when_empty() {
        let quantity: Quantity<Axis2D> = Quantity::new("chl", 1.0);
        assert_eq!(quantity.value((720.0, 50.0)), 1.0);
        assert_eq!(quantity.state(), &LoadState::Empty);
    }

    #[test]
    fn test_load_applies_conversion() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aw.txt");
        fs::write(&path, "400 0.5\n500 1.5\n").unwrap();

        let mut quantity: Quantity<Axis1D> = Quantity::new("aw", 0.001);
        let records = quantity
            .load_records(&path, &[Field::Number; 2], 100.0, wavelength_value)
            .unwrap();

        assert_eq!(records, 2);
        assert!((quantity.value(450.0) - 100.0).abs() < 1e-3);
        assert_eq!(
            quantity.state(),
            &LoadState::Loaded {
                source: path.clone(),
                records: 2
            }
        );
    }

    #[test]
    fn test_partial_load_keeps_earlier_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kw.txt");
        fs::write(&path, "400 0.1\n410 0.2\n420 0.3\nbad line here\n430 0.4\n").unwrap();

        let mut quantity: Quantity<Axis1D> = Quantity::new("kw", 0.01);
        let result = quantity.load_records(&path, &[Field::Number; 2], 1.0, wavelength_value);

        assert!(matches!(result, Err(LoadError::Format { .. })));
        assert_eq!(quantity.len(), 3);
        assert_eq!(
            quantity.state(),
            &LoadState::Failed {
                source: path.clone(),
                records: 3
            }
        );
        // Partial data is still considered loaded
        assert!(quantity.is_loaded());
    }

    #[test]
    fn test_second_load_is_refused() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        fs::write(&first, "400 1.0\n").unwrap();
        fs::write(&second, "400 2.0\n500 3.0\n").unwrap();

        let mut quantity: Quantity<Axis1D> = Quantity::new("bw", 0.01);
        quantity
            .load_records(&first, &[Field::Number; 2], 1.0, wavelength_value)
            .unwrap();
        let result = quantity.load_records(&second, &[Field::Number; 2], 1.0, wavelength_value);

        assert!(matches!(result, Err(LoadError::AlreadyLoaded { name: "bw" })));
        assert_eq!(quantity.len(), 1);
        assert_eq!(quantity.value(400.0), 1.0);
    }

    #[test]
    fn test_clear_then_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("achl.txt");
        fs::write(&path, "400 0.03\n").unwrap();

        let mut quantity: Quantity<Axis1D> = Quantity::new("achl", 0.54);
        quantity.clear();
        quantity.clear();
        assert_eq!(quantity.state(), &LoadState::Empty);

        quantity
            .load_records(&path, &[Field::Number; 2], 1.0, wavelength_value)
            .unwrap();
        quantity.clear();
        assert!(!quantity.is_loaded());
        assert_eq!(quantity.value(400.0), 0.54);

        assert!(
            quantity
                .load_records(&path, &[Field::Number; 2], 1.0, wavelength_value)
                .is_ok()
        );
    }

    #[test]
    fn test_missing_file_leaves_quantity_empty() {
        let dir = tempdir().unwrap();
        let mut quantity: Quantity<Axis1D> = Quantity::new("kw", 0.01);
        let result = quantity.load_records(
            &dir.path().join("none.txt"),
            &[Field::Number; 2],
            1.0,
            wavelength_value,
        );

        assert!(matches!(result, Err(LoadError::Source { .. })));
        assert!(!quantity.is_loaded());
    }
}
