use std::fmt;

use super::{Axis1D, Bucket, SparseAxis, bucket_mut, resolve_outer};

/// Ordered list of [`Axis1D`] keyed by an outer position.
///
/// Each bucket carries its own inner positions, so the grid does not need to be
/// rectangular.
#[derive(Debug, Clone, Default)]
pub struct Axis2D {
    buckets: Vec<Bucket<Axis1D>>,
}

impl Axis2D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buckets(&self) -> &[Bucket<Axis1D>] {
        &self.buckets
    }

    /// Smallest and largest outer positions.
    pub fn outer_range(&self) -> Option<(f32, f32)> {
        Some((self.buckets.first()?.position, self.buckets.last()?.position))
    }
}

impl SparseAxis for Axis2D {
    type Point = (f32, f32);

    fn insert(&mut self, (x, y): (f32, f32), value: f32) {
        bucket_mut(&mut self.buckets, x).insert(y, value);
    }

    fn lookup(&self, (x, y): (f32, f32), default: f32) -> f32 {
        resolve_outer(&self.buckets, x, default, |axis| axis.lookup(y, default))
    }

    fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.axis.len()).sum()
    }

    fn clear(&mut self) {
        self.buckets.clear();
    }
}

impl fmt::Display for Axis2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bucket in &self.buckets {
            writeln!(f, "{}:", bucket.position)?;
            for sample in bucket.axis.samples() {
                writeln!(f, "\t{}\t{}", sample.position, sample.value)?;
            }
        }
        Ok(())
    }
}
