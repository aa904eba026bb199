//! Sparse piecewise-linear interpolation over one, two or three axes.
//!
//! Every level keeps its samples sorted by position with no duplicates.
//! Lookups outside the sampled range never extrapolate along a slope: they
//! take the nearest sample (1D) or the nearest bucket (2D/3D).

pub mod axis1d;
pub mod axis2d;
pub mod axis3d;
pub mod plane;

pub use axis1d::Axis1D;
pub use axis2d::Axis2D;
pub use axis3d::Axis3D;
pub use plane::interpolate_plane;

/// Straight line through `(x1, y1)` and `(x2, y2)` evaluated at `x`.
pub fn linear(x: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    (x - x1) * ((y2 - y1) / (x2 - x1)) + y1
}

/// Common surface of the axis containers so a quantity can own any of them.
pub trait SparseAxis: Default {
    type Point: Copy;

    fn insert(&mut self, at: Self::Point, value: f32);

    fn lookup(&self, at: Self::Point, default: f32) -> f32;

    /// Total number of stored samples across all levels.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

/// An outer position owning a complete lower-dimensional axis.
#[derive(Debug, Clone, Default)]
pub struct Bucket<A> {
    pub position: f32,
    pub axis: A,
}

/// Returns the bucket stored at `position`, creating it in sorted order if needed.
pub(crate) fn bucket_mut<A: Default>(buckets: &mut Vec<Bucket<A>>, position: f32) -> &mut A {
    let idx = buckets.partition_point(|b| b.position < position);
    let exists = buckets.get(idx).is_some_and(|b| b.position == position);
    if !exists {
        buckets.insert(
            idx,
            Bucket {
                position,
                axis: A::default(),
            },
        );
    }
    &mut buckets[idx].axis
}

/// Outer resolution shared by the 2D and 3D axes.
///
/// `inner` evaluates one bucket at the remaining coordinates. Before the first
/// or after the last bucket only that bucket is consulted; between two buckets
/// both are evaluated and the results are joined with [`linear`].
pub(crate) fn resolve_outer<A>(
    buckets: &[Bucket<A>],
    x: f32,
    default: f32,
    inner: impl Fn(&A) -> f32,
) -> f32 {
    let Some(last) = buckets.last() else {
        return default;
    };

    let idx = buckets.partition_point(|b| b.position < x);
    let Some(upper) = buckets.get(idx) else {
        return inner(&last.axis);
    };

    if idx == 0 || upper.position == x {
        return inner(&upper.axis);
    }

    let lower = &buckets[idx - 1];
    linear(
        x,
        lower.position,
        inner(&lower.axis),
        upper.position,
        inner(&upper.axis),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        assert!((linear(15.0, 10.0, 1.0, 20.0, 3.0) - 2.0).abs() < 1e-6);
        assert!((linear(10.0, 10.0, 1.0, 20.0, 3.0) - 1.0).abs() < 1e-6);
        // Decreasing segment
        assert!((linear(2.5, 0.0, 10.0, 5.0, 0.0) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_bucket_mut_keeps_order() {
        let mut buckets: Vec<Bucket<Axis1D>> = Vec::new();
        bucket_mut(&mut buckets, 10.0).insert(0.0, 1.0);
        bucket_mut(&mut buckets, 0.0).insert(0.0, 2.0);
        bucket_mut(&mut buckets, 5.0).insert(0.0, 3.0);
        bucket_mut(&mut buckets, 10.0).insert(1.0, 4.0);

        let positions: Vec<f32> = buckets.iter().map(|b| b.position).collect();
        assert_eq!(positions, vec![0.0, 5.0, 10.0]);
        assert_eq!(buckets[2].axis.len(), 2);
    }

    #[test]
    fn test_resolve_outer_empty() {
        let buckets: Vec<Bucket<Axis1D>> = Vec::new();
        assert_eq!(resolve_outer(&buckets, 3.0, -1.0, |a| a.lookup(0.0, 0.0)), -1.0);
    }
}
