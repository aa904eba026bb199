use std::fmt;

use super::{SparseAxis, linear};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: f32,
    pub value: f32,
}

/// Ordered position→value list with flat extrapolation at both ends.
#[derive(Debug, Clone, Default)]
pub struct Axis1D {
    samples: Vec<Sample>,
}

impl Axis1D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }
}

impl SparseAxis for Axis1D {
    type Point = f32;

    /// Inserts before the first larger position; an equal position is overwritten.
    fn insert(&mut self, position: f32, value: f32) {
        let idx = self.samples.partition_point(|s| s.position < position);
        match self.samples.get_mut(idx) {
            Some(sample) if sample.position == position => sample.value = value,
            _ => self.samples.insert(idx, Sample { position, value }),
        }
    }

    fn lookup(&self, position: f32, default: f32) -> f32 {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return default;
        };

        let idx = self.samples.partition_point(|s| s.position < position);
        let Some(upper) = self.samples.get(idx) else {
            return last.value;
        };

        if upper.position == position {
            return upper.value;
        }
        if idx == 0 {
            return first.value;
        }

        let lower = &self.samples[idx - 1];
        linear(
            position,
            lower.position,
            lower.value,
            upper.position,
            upper.value,
        )
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn clear(&mut self) {
        self.samples.clear();
    }
}

impl fmt::Display for Axis1D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sample in &self.samples {
            writeln!(f, "{}\t{}", sample.position, sample.value)?;
        }
        Ok(())
    }
}
