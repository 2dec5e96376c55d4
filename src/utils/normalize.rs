//! Per-axis linear rescaling into the symmetric plotting cube.

use crate::models::{AxisData, Point};
use crate::utils::color::ColorScale;

/// Edge length of the normalized cube; every axis maps onto `[-SIZE/2, SIZE/2]`.
pub const NORMALIZED_SIZE: f64 = 20.0;
pub const HALF_SIZE: f64 = NORMALIZED_SIZE / 2.0;

/// Observed `[min, max]` of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// NaN samples are ignored when locating the bounds. An empty slice yields
    /// `[+inf, -inf]`, which counts as degenerate.
    pub fn from_values(values: &[f64]) -> Self {
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Self { min, max }
    }

    /// True when the axis has no usable span (no samples, or min == max).
    pub fn is_degenerate(&self) -> bool {
        !(self.max > self.min)
    }

    /// Unit position of `value` within the range. Degenerate ranges place every
    /// value at 0.
    pub fn fraction(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            (value - self.min) / (self.max - self.min)
        }
    }

    /// Map `value` into the cube. Degenerate ranges map every value to the centre.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            self.fraction(value) * NORMALIZED_SIZE - HALF_SIZE
        }
    }
}

/// Normalized points plus the ranges they were derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedData {
    pub points: Vec<Point>,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    pub z_range: AxisRange,
}

impl NormalizedData {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Normalize each axis independently and color every point from its z value.
///
/// Pure: identical input yields bit-identical output.
pub fn normalize(data: &AxisData) -> NormalizedData {
    let x_range = AxisRange::from_values(&data.x.data);
    let y_range = AxisRange::from_values(&data.y.data);
    let z_range = AxisRange::from_values(&data.z.data);
    let scale = ColorScale::new(z_range);

    let points = data
        .rows()
        .map(|(x, y, z)| Point {
            x: x_range.normalize(x),
            y: y_range.normalize(y),
            z: z_range.normalize(z),
            original_x: x,
            original_y: y,
            original_z: z,
            color: scale.color(z),
        })
        .collect();

    NormalizedData {
        points,
        x_range,
        y_range,
        z_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis_data(x: &[f64], y: &[f64], z: &[f64]) -> AxisData {
        let mut data = AxisData::new("x", "y", "z");
        for ((&x, &y), &z) in x.iter().zip(y).zip(z) {
            data.push(x, y, z);
        }
        data
    }

    #[test]
    fn bounds_map_to_cube_faces() {
        let data = axis_data(&[3.0, 10.0, 45.0], &[80.0, 100.0, 120.0], &[-1.5, 0.0, 4.5]);
        let normalized = normalize(&data);

        let xs: Vec<f64> = normalized.points.iter().map(|p| p.x).collect();
        assert_eq!(xs[0], -HALF_SIZE);
        assert_eq!(xs[2], HALF_SIZE);

        for p in &normalized.points {
            for v in [p.x, p.y, p.z] {
                assert!((-HALF_SIZE..=HALF_SIZE).contains(&v), "{} out of cube", v);
            }
        }
        assert_eq!(normalized.points[1].y, 0.0);
        assert_eq!(normalized.points[1].original_y, 100.0);
    }

    #[test]
    fn degenerate_axis_maps_to_centre() {
        let data = axis_data(&[7.0, 7.0], &[100.0, 110.0], &[2.0, 2.0]);
        let normalized = normalize(&data);

        assert!(normalized.x_range.is_degenerate());
        for p in &normalized.points {
            assert_eq!(p.x, 0.0);
            assert_eq!(p.z, 0.0);
            assert!(p.y.is_finite());
        }
    }

    #[test]
    fn empty_input_normalizes_to_nothing() {
        let normalized = normalize(&AxisData::new("x", "y", "z"));
        assert!(normalized.is_empty());
        assert!(normalized.y_range.is_degenerate());
        assert_eq!(normalized.y_range.normalize(95.0), 0.0);
    }

    #[test]
    fn normalization_is_repeatable() {
        let data = axis_data(&[1.0, 2.0, 9.0], &[0.3, -4.0, 12.0], &[0.1, 0.2, 0.7]);
        assert_eq!(normalize(&data), normalize(&data));
    }

    #[test]
    fn nan_samples_stay_visible() {
        let data = axis_data(&[1.0, 2.0, 3.0], &[10.0, 20.0, 30.0], &[0.0, f64::NAN, 1.0]);
        let normalized = normalize(&data);
        assert_eq!(normalized.z_range, AxisRange { min: 0.0, max: 1.0 });
        assert!(normalized.points[1].z.is_nan());
    }
}
