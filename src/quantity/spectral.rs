use std::path::Path;

use super::{LoadError, LoadState, Loadable, Quantity};
use crate::interpolation::Axis1D;
use crate::readers::Field;

const LAYOUT: [Field; 2] = [Field::Number, Field::Number];

/// A value per wavelength, read from `wavelength value` records.
#[derive(Debug, Clone)]
pub struct SpectralQuantity {
    quantity: Quantity<Axis1D>,
    conversion: f32,
}

impl SpectralQuantity {
    pub fn new(name: &'static str, default: f32, conversion: f32) -> Self {
        Self {
            quantity: Quantity::new(name, default),
            conversion,
        }
    }

    /// Pure-water attenuation `kw`.
    pub fn water_attenuation() -> Self {
        Self::new("kw", 0.01, 1.0)
    }

    /// Pure-water absorption `aw`; files are usually in cm⁻¹.
    pub fn water_absorption() -> Self {
        Self::new("aw", 0.001, 100.0)
    }

    /// Pure-water scattering `bw`.
    pub fn water_scattering() -> Self {
        Self::new("bw", 0.01, 1.0)
    }

    /// Chlorophyll-specific absorption `achl`.
    pub fn specific_absorption() -> Self {
        Self::new("achl", 0.54, 1.0)
    }

    pub fn at(&self, wavelength: f32) -> f32 {
        self.quantity.value(wavelength)
    }

    pub fn insert(&mut self, wavelength: f32, value: f32) {
        self.quantity.insert(wavelength, value);
    }

    pub fn set_default(&mut self, default: f32) {
        self.quantity.set_default(default);
    }

    pub fn quantity(&self) -> &Quantity<Axis1D> {
        &self.quantity
    }

    /// Hands out the underlying quantity to loaders that fill several
    /// spectra from one file.
    pub(crate) fn quantity_mut(&mut self) -> &mut Quantity<Axis1D> {
        &mut self.quantity
    }
}

impl Loadable for SpectralQuantity {
    fn name(&self) -> &'static str {
        self.quantity.name()
    }

    fn load(&mut self, path: &Path, conversion: f32) -> Result<usize, LoadError> {
        self.quantity
            .load_records(path, &LAYOUT, conversion, |r, c| (r[0], r[1] * c))
    }

    fn clear(&mut self) {
        self.quantity.clear();
    }

    fn is_loaded(&self) -> bool {
        self.quantity.is_loaded()
    }

    fn state(&self) -> &LoadState {
        self.quantity.state()
    }

    fn default_conversion(&self) -> f32 {
        self.conversion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        assert_eq!(SpectralQuantity::water_attenuation().at(400.0), 0.01);
        assert_eq!(SpectralQuantity::water_absorption().at(400.0), 0.001);
        assert_eq!(SpectralQuantity::water_scattering().at(400.0), 0.01);
        assert_eq!(SpectralQuantity::specific_absorption().at(400.0), 0.54);
        assert_eq!(SpectralQuantity::water_absorption().default_conversion(), 100.0);
        assert_eq!(SpectralQuantity::water_attenuation().default_conversion(), 1.0);
    }

    #[test]
    fn test_load_and_interpolate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("achl.txt");
        std::fs::write(&path, "400 0.04\n440 0.05\n700 0.01\n").unwrap();

        let mut achl = SpectralQuantity::specific_absorption();
        assert_eq!(achl.load(&path, 1.0).unwrap(), 3);
        assert!((achl.at(420.0) - 0.045).abs() < 1e-6);
        assert_eq!(achl.at(380.0), 0.04);
        assert_eq!(achl.at(750.0), 0.01);
    }
}
