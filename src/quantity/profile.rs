use std::path::Path;

use super::{LoadError, LoadState, Loadable, Quantity};
use crate::interpolation::Axis2D;
use crate::readers::Field;

const LAYOUT: [Field; 3] = [Field::Time, Field::Number, Field::Number];

/// Sea temperature used when no temperature file is given, in °C.
pub const SEA_TEMPERATURE_DEFAULT: f32 = 20.0;

/// A value varying with time of day and depth, read from
/// `HH:MM depth value` records.
#[derive(Debug, Clone)]
pub struct ProfileQuantity {
    quantity: Quantity<Axis2D>,
}

impl ProfileQuantity {
    pub fn new(name: &'static str, default: f32) -> Self {
        Self {
            quantity: Quantity::new(name, default),
        }
    }

    pub fn chlorophyll() -> Self {
        Self::new("chl", 1.0)
    }

    /// Photoinhibition parameter.
    pub fn beta() -> Self {
        Self::new("beta", 0.01)
    }

    pub fn sea_temperature() -> Self {
        Self::new("st", SEA_TEMPERATURE_DEFAULT)
    }

    pub fn at(&self, minute: u32, depth: f32) -> f32 {
        self.quantity.value((minute as f32, depth))
    }

    pub fn insert(&mut self, minute: u32, depth: f32, value: f32) {
        self.quantity.insert((minute as f32, depth), value);
    }

    pub fn set_default(&mut self, default: f32) {
        self.quantity.set_default(default);
    }

    pub fn quantity(&self) -> &Quantity<Axis2D> {
        &self.quantity
    }
}

impl Loadable for ProfileQuantity {
    fn name(&self) -> &'static str {
        self.quantity.name()
    }

    fn load(&mut self, path: &Path, conversion: f32) -> Result<usize, LoadError> {
        self.quantity
            .load_records(path, &LAYOUT, conversion, |r, c| ((r[0], r[1]), r[2] * c))
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
