//! Plot-ready data: three parallel axes and the normalized points built from them.

use serde::{Deserialize, Serialize};

/// One named, ordered sequence of samples along a plotted dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub name: String,
    pub data: Vec<f64>,
}

impl Axis {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
        }
    }

    /// Sample-for-sample identity by bit pattern, so NaN samples match themselves.
    pub fn same_samples(&self, other: &Axis) -> bool {
        self.name == other.name
            && self.data.len() == other.data.len()
            && self.data.iter().zip(&other.data).all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

/// The x/y/z axes fed to the 3D view. Sample `i` of each axis describes one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisData {
    pub x: Axis,
    pub y: Axis,
    pub z: Axis,
}

impl AxisData {
    pub fn new(
        x_name: impl Into<String>,
        y_name: impl Into<String>,
        z_name: impl Into<String>,
    ) -> Self {
        Self {
            x: Axis::new(x_name),
            y: Axis::new(y_name),
            z: Axis::new(z_name),
        }
    }

    pub fn push(&mut self, x: f64, y: f64, z: f64) {
        self.x.data.push(x);
        self.y.data.push(y);
        self.z.data.push(z);
    }

    pub fn len(&self) -> usize {
        debug_assert!(
            self.x.data.len() == self.y.data.len() && self.y.data.len() == self.z.data.len(),
            "axes must have equal length"
        );
        self.x.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` holds exactly the same samples, NaN included.
    pub fn same_samples(&self, other: &AxisData) -> bool {
        self.x.same_samples(&other.x)
            && self.y.same_samples(&other.y)
            && self.z.same_samples(&other.z)
    }

    /// Iterate rows as `(x, y, z)` triples.
    pub fn rows(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.x
            .data
            .iter()
            .zip(&self.y.data)
            .zip(&self.z.data)
            .map(|((&x, &y), &z)| (x, y, z))
    }
}

/// Linear RGB triple with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_u8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

/// A sample placed in the normalized cube, keeping its source values for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub original_x: f64,
    pub original_y: f64,
    pub original_z: f64,
    pub color: Rgb,
}
