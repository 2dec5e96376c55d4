//! Scene graph for the options surface: point cloud, axis triad, price grid,
//! the two price-region volumes and the text labels.
//!
//! The scene is a plain value. GPU-side resources (label textures) belong to
//! the view session, which derives them from the sprites here.

use crate::models::{AxisData, OptionType, Rgb};
use crate::utils::{normalize, AxisRange, NormalizedData, HALF_SIZE, NORMALIZED_SIZE};
use crate::viz::label::{TextSprite, AXIS_LABEL_STYLE, PRICE_LABEL_STYLE};
use crate::viz::tooltip::format_tooltip;
use glam::Vec3;
use tracing::debug;

pub const POINT_SIZE: f32 = 0.64;
pub const AXES_LENGTH: f32 = 20.0;
pub const GRID_DIVISIONS: usize = 20;
pub const BOX_OPACITY: f32 = 0.2;
/// Top of the upper price volume; matches the length of the y axis indicator.
pub const BOX_TOP: f32 = AXES_LENGTH;
/// Bottom of the lower price volume; the floor of the normalized cube.
pub const BOX_BOTTOM: f32 = -(HALF_SIZE as f32);

pub const FAVORABLE_COLOR: Rgb = Rgb::from_hex(0x90ee90);
pub const UNFAVORABLE_COLOR: Rgb = Rgb::from_hex(0xffcccb);
pub const BACKGROUND_COLOR: Rgb = Rgb::from_hex(0xffffff);
const GRID_CENTER_COLOR: Rgb = Rgb::from_hex(0x444444);
const GRID_COLOR: Rgb = Rgb::from_hex(0x888888);

const X_LABEL_POSITION: Vec3 = Vec3::new(14.0, 0.0, 0.0);
const Y_LABEL_POSITION: Vec3 = Vec3::new(0.0, 22.0, 0.0);
const Z_LABEL_POSITION: Vec3 = Vec3::new(0.0, 0.0, 12.0);
const PRICE_LABEL_X: f32 = -14.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Rgb>,
    pub size: f32,
}

impl PointCloud {
    pub fn from_normalized(normalized: &NormalizedData) -> Self {
        let positions = normalized
            .points
            .iter()
            .map(|p| Vec3::new(p.x as f32, p.y as f32, p.z as f32))
            .collect();
        let colors = normalized.points.iter().map(|p| p.color).collect();
        Self {
            positions,
            colors,
            size: POINT_SIZE,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Red/green/blue lines along +x/+y/+z from the origin.
pub fn axes_helper(length: f32) -> [LineSegment; 3] {
    [
        LineSegment { start: Vec3::ZERO, end: Vec3::X * length, color: Rgb::new(1.0, 0.0, 0.0) },
        LineSegment { start: Vec3::ZERO, end: Vec3::Y * length, color: Rgb::new(0.0, 1.0, 0.0) },
        LineSegment { start: Vec3::ZERO, end: Vec3::Z * length, color: Rgb::new(0.0, 0.0, 1.0) },
    ]
}

/// Square grid in the xz plane, centred on `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHelper {
    pub size: f32,
    pub divisions: usize,
    pub position: Vec3,
}

impl GridHelper {
    pub fn new(size: f32, divisions: usize) -> Self {
        Self {
            size,
            divisions,
            position: Vec3::ZERO,
        }
    }

    pub fn lines(&self) -> Vec<LineSegment> {
        let half = self.size / 2.0;
        let step = self.size / self.divisions as f32;
        let center = self.divisions / 2;

        (0..=self.divisions)
            .flat_map(|i| {
                let k = -half + i as f32 * step;
                let color = if i == center { GRID_CENTER_COLOR } else { GRID_COLOR };
                [
                    LineSegment {
                        start: self.position + Vec3::new(-half, 0.0, k),
                        end: self.position + Vec3::new(half, 0.0, k),
                        color,
                    },
                    LineSegment {
                        start: self.position + Vec3::new(k, 0.0, -half),
                        end: self.position + Vec3::new(k, 0.0, half),
                        color,
                    },
                ]
            })
            .collect()
    }
}

/// Axis-aligned translucent box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeBox {
    pub center: Vec3,
    pub size: Vec3,
    pub color: Rgb,
    pub opacity: f32,
}

impl VolumeBox {
    /// Box spanning the full cube in x and z, and `[bottom, top]` in y.
    pub fn spanning_y(bottom: f32, top: f32, color: Rgb) -> Self {
        Self {
            center: Vec3::new(0.0, (top + bottom) / 2.0, 0.0),
            size: Vec3::new(NORMALIZED_SIZE as f32, (top - bottom).max(0.0), NORMALIZED_SIZE as f32),
            color,
            opacity: BOX_OPACITY,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.size / 2.0
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.size / 2.0
    }

    /// The six faces as quads with corners in winding order.
    pub fn faces(&self) -> [[Vec3; 4]; 6] {
        let (lo, hi) = (self.min(), self.max());
        let c = |x: bool, y: bool, z: bool| {
            Vec3::new(
                if x { hi.x } else { lo.x },
                if y { hi.y } else { lo.y },
                if z { hi.z } else { lo.z },
            )
        };
        [
            [c(false, false, false), c(true, false, false), c(true, true, false), c(false, true, false)],
            [c(false, false, true), c(true, false, true), c(true, true, true), c(false, true, true)],
            [c(false, false, false), c(false, true, false), c(false, true, true), c(false, false, true)],
            [c(true, false, false), c(true, true, false), c(true, true, true), c(true, false, true)],
            [c(false, false, false), c(true, false, false), c(true, false, true), c(false, false, true)],
            [c(false, true, false), c(true, true, false), c(true, true, true), c(false, true, true)],
        ]
    }
}

/// Colors for the volumes above and below the current price. Puts pay off for
/// strikes above the price, calls for strikes below it.
pub fn price_region_colors(option_type: OptionType) -> (Rgb, Rgb) {
    match option_type {
        OptionType::Put => (FAVORABLE_COLOR, UNFAVORABLE_COLOR),
        OptionType::Call => (UNFAVORABLE_COLOR, FAVORABLE_COLOR),
    }
}

pub fn price_label_text(current_price: f64) -> String {
    format!("Price: ${}", current_price)
}

/// Everything drawn for one plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotScene {
    pub axis_names: [String; 3],
    pub normalized: NormalizedData,
    pub points: PointCloud,
    pub axes: [LineSegment; 3],
    pub grid: GridHelper,
    pub upper_box: VolumeBox,
    pub lower_box: VolumeBox,
    pub axis_labels: [TextSprite; 3],
    pub price_label: TextSprite,
    pub option_type: OptionType,
    pub current_price: f64,
}

impl PlotScene {
    pub fn build(data: &AxisData, option_type: OptionType, current_price: f64) -> Self {
        let normalized = normalize(data);
        let points = PointCloud::from_normalized(&normalized);
        let axis_names = [data.x.name.clone(), data.y.name.clone(), data.z.name.clone()];

        let axis_labels = [
            TextSprite::new(axis_names[0].clone(), AXIS_LABEL_STYLE, X_LABEL_POSITION),
            TextSprite::new(axis_names[1].clone(), AXIS_LABEL_STYLE, Y_LABEL_POSITION),
            TextSprite::new(axis_names[2].clone(), AXIS_LABEL_STYLE, Z_LABEL_POSITION),
        ];

        let (upper_color, lower_color) = price_region_colors(option_type);
        let mut scene = Self {
            axis_names,
            normalized,
            points,
            axes: axes_helper(AXES_LENGTH),
            grid: GridHelper::new(NORMALIZED_SIZE as f32, GRID_DIVISIONS),
            upper_box: VolumeBox::spanning_y(0.0, BOX_TOP, upper_color),
            lower_box: VolumeBox::spanning_y(BOX_BOTTOM, 0.0, lower_color),
            axis_labels,
            price_label: TextSprite::new(String::new(), PRICE_LABEL_STYLE, Vec3::ZERO),
            option_type,
            current_price,
        };
        scene.set_price(current_price);

        debug!(
            "Built scene with {} points ({} side, price {})",
            scene.points.len(),
            option_type,
            current_price
        );
        scene
    }

    pub fn y_range(&self) -> AxisRange {
        self.normalized.y_range
    }

    /// Normalized y of the current price.
    pub fn price_level(&self) -> f32 {
        self.y_range().normalize(self.current_price) as f32
    }

    /// Move the grid, resize the volumes and relabel the price marker without
    /// touching the point cloud.
    pub fn set_price(&mut self, current_price: f64) {
        self.current_price = current_price;
        let level = self.price_level();

        self.grid.position = Vec3::new(0.0, level, 0.0);
        self.upper_box = VolumeBox::spanning_y(level, BOX_TOP, self.upper_box.color);
        self.lower_box = VolumeBox::spanning_y(BOX_BOTTOM, level, self.lower_box.color);
        self.price_label.text = price_label_text(current_price);
        self.price_label.position = Vec3::new(PRICE_LABEL_X, level, 0.0);
    }

    pub fn tooltip_content(&self, index: usize) -> Option<String> {
        self.normalized
            .points
            .get(index)
            .map(|point| format_tooltip(&self.axis_names, point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AxisData {
        let mut data = AxisData::new("Days Til Expiration", "Strike Price", "delta");
        data.push(5.0, 90.0, -0.2);
        data.push(12.0, 100.0, -0.5);
        data.push(30.0, 110.0, -0.8);
        data
    }

    #[test]
    fn price_plane_sits_at_normalized_price() {
        let scene = PlotScene::build(&sample(), OptionType::Put, 100.0);
        assert_eq!(scene.grid.position.y, 0.0);
        assert_eq!(scene.upper_box.min().y, 0.0);
        assert_eq!(scene.upper_box.max().y, BOX_TOP);
        assert_eq!(scene.lower_box.min().y, BOX_BOTTOM);
        assert_eq!(scene.lower_box.max().y, 0.0);
        assert_eq!(scene.price_label.text, "Price: $100");
        assert_eq!(scene.price_label.position, Vec3::new(PRICE_LABEL_X, 0.0, 0.0));
    }

    #[test]
    fn repositioning_keeps_points() {
        let mut scene = PlotScene::build(&sample(), OptionType::Call, 100.0);
        let points = scene.points.clone();
        scene.set_price(105.0);
        assert_eq!(scene.points, points);
        assert_eq!(scene.grid.position.y, 5.0);
        assert_eq!(scene.upper_box.min().y, 5.0);
        assert_eq!(scene.lower_box.max().y, 5.0);
        assert_eq!(scene.price_label.text, "Price: $105");
    }

    #[test]
    fn volume_colors_follow_option_side() {
        let put = PlotScene::build(&sample(), OptionType::Put, 100.0);
        assert_eq!(put.upper_box.color, FAVORABLE_COLOR);
        assert_eq!(put.lower_box.color, UNFAVORABLE_COLOR);

        let call = PlotScene::build(&sample(), OptionType::Call, 100.0);
        assert_eq!(call.upper_box.color, UNFAVORABLE_COLOR);
        assert_eq!(call.lower_box.color, FAVORABLE_COLOR);
    }

    #[test]
    fn labels_sit_past_positive_axis_ends() {
        let scene = PlotScene::build(&sample(), OptionType::Put, 100.0);
        assert_eq!(scene.axis_labels[0].text, "Days Til Expiration");
        assert!(scene.axis_labels[0].position.x > HALF_SIZE as f32);
        assert!(scene.axis_labels[1].position.y > AXES_LENGTH);
        assert!(scene.axis_labels[2].position.z > HALF_SIZE as f32);
    }

    #[test]
    fn grid_has_two_lines_per_division_edge() {
        let grid = GridHelper::new(20.0, 20);
        let lines = grid.lines();
        assert_eq!(lines.len(), 42);
        assert!(lines.iter().all(|l| l.start.y == 0.0 && l.end.y == 0.0));
    }

    #[test]
    fn empty_data_builds_empty_cloud() {
        let scene = PlotScene::build(&AxisData::new("x", "y", "z"), OptionType::Put, 95.0);
        assert!(scene.points.is_empty());
        assert_eq!(scene.grid.position.y, 0.0);
        assert_eq!(scene.tooltip_content(0), None);
    }
}
