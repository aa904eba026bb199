use serde::Deserialize;
use std::fmt;

/// When a chlorophyll-derived parameter is refreshed during the depth walk.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecomputePolicy {
    /// Keep the configured constant.
    #[default]
    #[serde(rename(deserialize = "CONSTANT"))]
    Constant,
    /// Derive once per time step from the surface chlorophyll.
    #[serde(rename(deserialize = "SURFACE"))]
    FromSurface,
    /// Derive at every depth from the chlorophyll at that depth.
    #[serde(rename(deserialize = "DEPTH"))]
    FromDepth,
}

impl RecomputePolicy {
    /// Value of the parameter at one depth.
    pub fn resolve(self, constant: f32, surface_chl: f32, depth_chl: f32, derive: fn(f32) -> f32) -> f32 {
        match self {
            RecomputePolicy::Constant => constant,
            RecomputePolicy::FromSurface => derive(surface_chl),
            RecomputePolicy::FromDepth => derive(depth_chl),
        }
    }
}

impl fmt::Display for RecomputePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecomputePolicy::Constant => write!(f, "constant"),
            RecomputePolicy::FromSurface => write!(f, "from Chl(0) (takes surface value)"),
            RecomputePolicy::FromDepth => write!(f, "from Chl(Z) (varies with depth)"),
        }
    }
}
