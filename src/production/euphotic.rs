//! Euphotic depth search.
//!
//! Both searches fill the irradiance ratio grid row by row from the surface
//! and stop at the first depth whose mean ratio over all wavelengths falls
//! below the configured threshold.

use log::warn;
use ndarray::{Array2, ArrayView1};

use super::WaterColumn;
use crate::config::ModelConfig;
use crate::lut::IrradianceTable;

fn row_mean(row: ArrayView1<f32>) -> f32 {
    row.sum() / row.len() as f32
}

/// Propagates the surface light down with `exp(-k Δz)` per depth step.
///
/// Returns the deepest configured depth when the threshold is never crossed.
pub fn computed(
    ratio: &mut Array2<f32>,
    column: &WaterColumn,
    config: &ModelConfig,
    minute: u32,
) -> u32 {
    let depth = &config.depth;
    let step = depth.step as f32;

    ratio.row_mut(0).fill(1.0);

    for i in 1..depth.count() {
        let z = depth.at(i);
        for (j, wavelength) in config.wavelength.values().enumerate() {
            let k = column.attenuation(minute, z as f32, wavelength as f32);
            ratio[[i, j]] = ratio[[i - 1, j]] * (-k * step).exp();
        }

        if row_mean(ratio.row(i)) < config.euphotic_ratio {
            return z;
        }
    }

    depth.at(depth.count() - 1)
}

/// Copies rows from a precomputed table, starting at the minimum depth.
///
/// A table that ends before the threshold is crossed yields the depth of its
/// last row, with a warning.
pub fn from_table(ratio: &mut Array2<f32>, table: &IrradianceTable, config: &ModelConfig) -> u32 {
    let depth = &config.depth;

    for i in 0..depth.count() {
        let Some(row) = table.row(i) else {
            warn!(
                "Actual euphotic depth not reached when using hydrolight data from {}",
                table.path().display()
            );
            return depth.at(i.saturating_sub(1));
        };

        ratio.row_mut(i).assign(&ArrayView1::from(row));

        if row_mean(ratio.row(i)) < config.euphotic_ratio {
            return depth.at(i);
        }
    }

    depth.at(depth.count() - 1)
}
