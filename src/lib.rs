//! Spectral primary production (Morel, 1991) and clear-sky PAR, driven by
//! sparse measurements interpolated onto regular depth, wavelength and time
//! grids.

pub mod config;
pub mod interpolation;
pub mod lut;
pub mod par;
pub mod production;
pub mod quantity;
pub mod readers;
pub mod solar;
pub mod utils;
