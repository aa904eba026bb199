use std::fmt;

use super::{Axis2D, Bucket, SparseAxis, bucket_mut, resolve_outer};

/// Ordered list of [`Axis2D`] keyed by an outer position.
#[derive(Debug, Clone, Default)]
pub struct Axis3D {
    buckets: Vec<Bucket<Axis2D>>,
}

impl Axis3D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buckets(&self) -> &[Bucket<Axis2D>] {
        &self.buckets
    }
}

impl SparseAxis for Axis3D {
    type Point = (f32, f32, f32);

    fn insert(&mut self, (x, y, z): (f32, f32, f32), value: f32) {
        bucket_mut(&mut self.buckets, x).insert((y, z), value);
    }

    fn lookup(&self, (x, y, z): (f32, f32, f32), default: f32) -> f32 {
        resolve_outer(&self.buckets, x, default, |axis| {
            axis.lookup((y, z), default)
        })
    }

    fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.axis.len()).sum()
    }

    fn clear(&mut self) {
        self.buckets.clear();
    }
}

impl fmt::Display for Axis3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bucket in &self.buckets {
            writeln!(f, "[{}]", bucket.position)?;
            write!(f, "{}", bucket.axis)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layered() -> Axis3D {
        // value = x + y + z on two outer layers, with a sparse second layer
        let mut axis = Axis3D::new();
        for y in [0.0, 10.0] {
            for z in [400.0, 500.0] {
                axis.insert((0.0, y, z), y + z);
            }
        }
        axis.insert((60.0, 0.0, 400.0), 60.0 + 400.0);
        axis
    }

    #[test]
    fn test_interpolates_between_layers() {
        let axis = layered();
        // x=0 layer: 5 + 450 = 455; x=60 layer has a single sample: 460
        let value = axis.lookup((30.0, 5.0, 450.0), -1.0);
        assert!((value - 457.5).abs() < 1e-3, "got {}", value);
    }

    #[test]
    fn test_outer_boundaries() {
        let axis = layered();
        assert_eq!(
            axis.lookup((-10.0, 5.0, 450.0), -1.0),
            axis.lookup((0.0, 5.0, 450.0), -1.0)
        );
        assert_eq!(axis.lookup((100.0, 5.0, 450.0), -1.0), 460.0);
    }

    #[test]
    fn test_empty_and_clear() {
        let mut axis = layered();
        assert_eq!(axis.len(), 5);
        axis.clear();
        assert_eq!(axis.lookup((0.0, 0.0, 0.0), 0.25), 0.25);
    }
}
