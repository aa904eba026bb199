use ndarray::Array2;

use super::ProductionError;

/// Working buffers of one calculation: the irradiance ratio grid
/// (depth × wavelength) and the production accumulated at each depth.
#[derive(Debug)]
pub struct Scratch {
    pub ratio: Array2<f32>,
    pub pp_depth: Vec<f32>,
}

fn zeroed(len: usize, depths: usize, wavelengths: usize) -> Result<Vec<f32>, ProductionError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| ProductionError::Allocation {
            depths,
            wavelengths,
        })?;
    buffer.resize(len, 0.0);
    Ok(buffer)
}

impl Scratch {
    pub fn allocate(depths: usize, wavelengths: usize) -> Result<Self, ProductionError> {
        let error = || ProductionError::Allocation {
            depths,
            wavelengths,
        };

        let cells = depths.checked_mul(wavelengths).ok_or_else(error)?;
        let ratio = Array2::from_shape_vec((depths, wavelengths), zeroed(cells, depths, wavelengths)?)
            .map_err(|_| error())?;
        let pp_depth = zeroed(depths, depths, wavelengths)?;

        Ok(Self { ratio, pp_depth })
    }
}
