use std::path::Path;

use super::{LoadError, LoadState, Loadable, Quantity};
use crate::interpolation::Axis2D;
use crate::readers::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// `depth wavelength value`
    Value,
    /// `depth wavelength a b`, stored as b/a
    ScatterAbsorbRatio,
}

/// A value varying with depth and wavelength.
#[derive(Debug, Clone)]
pub struct DepthSpectralQuantity {
    quantity: Quantity<Axis2D>,
    layout: Layout,
}

impl DepthSpectralQuantity {
    /// Total diffuse attenuation `K`.
    pub fn attenuation() -> Self {
        Self {
            quantity: Quantity::new("k", 0.01),
            layout: Layout::Value,
        }
    }

    /// Ratio of scattering to absorption `b/a`.
    pub fn scatter_absorb_ratio() -> Self {
        Self {
            quantity: Quantity::new("ab", 0.01),
            layout: Layout::ScatterAbsorbRatio,
        }
    }

    pub fn at(&self, depth: f32, wavelength: f32) -> f32 {
        self.quantity.value((depth, wavelength))
    }

    pub fn insert(&mut self, depth: f32, wavelength: f32, value: f32) {
        self.quantity.insert((depth, wavelength), value);
    }

    pub fn quantity(&self) -> &Quantity<Axis2D> {
        &self.quantity
    }
}

impl Loadable for DepthSpectralQuantity {
    fn name(&self) -> &'static str {
        self.quantity.name()
    }

    fn load(&mut self, path: &Path, conversion: f32) -> Result<usize, LoadError> {
        match self.layout {
            Layout::Value => self.quantity.load_records(
                path,
                &[Field::Number; 3],
                conversion,
                |r, c| ((r[0], r[1]), r[2] * c),
            ),
            Layout::ScatterAbsorbRatio => self.quantity.load_records(
                path,
                &[Field::Number; 4],
                conversion,
                |r, c| ((r[0], r[1]), (r[3] / r[2]) * c),
            ),
        }
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
}

/// Chlorophyll-specific attenuation `Kc`, a function of wavelength and
/// chlorophyll concentration. Records are `wavelength chl kc`.
#[derive(Debug, Clone)]
pub struct ChlAttenuation {
    quantity: Quantity<Axis2D>,
}

impl Default for ChlAttenuation {
    fn default() -> Self {
        Self {
            quantity: Quantity::new("kc", 0.01),
        }
    }
}

impl ChlAttenuation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(&self, chl: f32, wavelength: f32) -> f32 {
        self.quantity.value((wavelength, chl))
    }

    pub fn insert(&mut self, chl: f32, wavelength: f32, value: f32) {
        self.quantity.insert((wavelength, chl), value);
    }

    pub fn quantity(&self) -> &Quantity<Axis2D> {
        &self.quantity
    }
}

impl Loadable for ChlAttenuation {
    fn name(&self) -> &'static str {
        self.quantity.name()
    }

    fn load(&mut self, path: &Path, conversion: f32) -> Result<usize, LoadError> {
        self.quantity
            .load_records(path, &[Field::Number; 3], conversion, |r, c| {
                ((r[0], r[1]), r[2] * c)
            })
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_scatter_absorb_ratio_is_stored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ab.txt");
        std::fs::write(&path, "0 400 0.5 2.0\n0 500 0.25 0.5\n").unwrap();

        let mut ab = DepthSpectralQuantity::scatter_absorb_ratio();
        ab.load(&path, 2.0).unwrap();

        assert!((ab.at(0.0, 400.0) - 8.0).abs() < 1e-6);
        assert!((ab.at(10.0, 500.0) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_attenuation_depth_wavelength() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("k.txt");
        std::fs::write(&path, "0 400 0.1\n10 400 0.3\n").unwrap();

        let mut k = DepthSpectralQuantity::attenuation();
        k.load(&path, 1.0).unwrap();
        assert!((k.at(5.0, 450.0) - 0.2).abs() < 1e-6);
        assert_eq!(DepthSpectralQuantity::attenuation().at(5.0, 450.0), 0.01);
    }

    #[test]
    fn test_kc_argument_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kc.txt");
        // wavelength chl kc
        std::fs::write(&path, "400 0.1 0.02\n400 1.0 0.2\n700 0.1 0.5\n").unwrap();

        let mut kc = ChlAttenuation::new();
        kc.load(&path, 1.0).unwrap();

        assert!((kc.at(0.55, 400.0) - 0.11).abs() < 1e-6);
        assert_eq!(kc.at(1.0, 700.0), 0.5);
    }
}
