use std::path::Path;

use super::{LoadError, LoadState, Loadable, Quantity};
use crate::interpolation::Axis3D;
use crate::readers::{blocks::BlockValue, read_blocks};

/// Phytoplankton absorption over time, depth and wavelength, read from the
/// block layout (see [`read_blocks`]).
#[derive(Debug, Clone)]
pub struct PhytoplanktonAbsorption {
    quantity: Quantity<Axis3D>,
}

impl Default for PhytoplanktonAbsorption {
    fn default() -> Self {
        Self {
            quantity: Quantity::new("aph", 0.01),
        }
    }
}

impl PhytoplanktonAbsorption {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(&self, minute: u32, depth: f32, wavelength: f32) -> f32 {
        self.quantity.value((minute as f32, depth, wavelength))
    }

    pub fn quantity(&self) -> &Quantity<Axis3D> {
        &self.quantity
    }
}

impl Loadable for PhytoplanktonAbsorption {
    fn name(&self) -> &'static str {
        self.quantity.name()
    }

    fn load(&mut self, path: &Path, conversion: f32) -> Result<usize, LoadError> {
        self.quantity.begin_load()?;

        let quantity = &mut self.quantity;
        let result = read_blocks(path, |v: BlockValue| {
            quantity.insert((v.minute, v.depth, v.wavelength), v.value * conversion);
        });

        self.quantity.finish_load(path, result)
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
