//! Software projection of a `PlotScene` onto an egui painter.
//!
//! Draw order is: background, translucent volumes (far faces first), lines,
//! points (far first), then label sprites.

use crate::models::Rgb;
use crate::viz::camera::{PerspectiveCamera, Projected};
use crate::viz::scene::{LineSegment, PlotScene, VolumeBox, BACKGROUND_COLOR};
use crate::viz::session::LabelTexture;
use egui::{pos2, Color32, Painter, Pos2, Rect, Shape, Stroke};
use glam::{Vec2, Vec3};
use std::cmp::Ordering;

const LINE_WIDTH: f32 = 1.0;
const MIN_POINT_RADIUS: f32 = 1.0;

pub fn color32(color: Rgb) -> Color32 {
    let [r, g, b] = color.to_u8();
    Color32::from_rgb(r, g, b)
}

pub fn color32_alpha(color: Rgb, opacity: f32) -> Color32 {
    let [r, g, b] = color.to_u8();
    Color32::from_rgba_unmultiplied(r, g, b, (opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Projects world positions into one painter rect.
struct Projector<'a> {
    camera: &'a PerspectiveCamera,
    rect: Rect,
    size: Vec2,
}

impl<'a> Projector<'a> {
    fn new(camera: &'a PerspectiveCamera, rect: Rect) -> Self {
        Self {
            camera,
            rect,
            size: Vec2::new(rect.width(), rect.height()),
        }
    }

    fn project(&self, world: Vec3) -> Option<(Pos2, f32)> {
        let Projected { screen, depth } = self.camera.project(world, self.size)?;
        Some((pos2(self.rect.min.x + screen.x, self.rect.min.y + screen.y), depth))
    }

    /// Pixels covered by `world_size` units at `depth`.
    fn scale_at(&self, world_size: f32, depth: f32) -> f32 {
        world_size * self.camera.focal_length_px(self.size.y) / depth
    }
}

pub fn paint_scene(
    painter: &Painter,
    rect: Rect,
    camera: &PerspectiveCamera,
    scene: &PlotScene,
    axis_textures: &[Option<LabelTexture>],
    price_texture: Option<&LabelTexture>,
) {
    painter.rect_filled(rect, 0.0, color32(BACKGROUND_COLOR));
    let projector = Projector::new(camera, rect);

    paint_boxes(painter, &projector, &[scene.upper_box, scene.lower_box]);

    let grid_lines = scene.grid.lines();
    for line in grid_lines.iter().chain(scene.axes.iter()) {
        paint_line(painter, &projector, line);
    }

    paint_points(painter, &projector, scene);

    for (sprite, texture) in scene.axis_labels.iter().zip(axis_textures) {
        if let Some(texture) = texture {
            paint_sprite(painter, &projector, sprite.position, sprite.world_height, texture);
        }
    }
    if let Some(texture) = price_texture {
        paint_sprite(
            painter,
            &projector,
            scene.price_label.position,
            scene.price_label.world_height,
            texture,
        );
    }
}

fn paint_boxes(painter: &Painter, projector: &Projector<'_>, boxes: &[VolumeBox]) {
    let mut faces: Vec<(f32, Vec<Pos2>, Color32)> = Vec::new();

    for volume in boxes {
        if volume.size.y <= 0.0 {
            continue;
        }
        let fill = color32_alpha(volume.color, volume.opacity);
        for face in volume.faces() {
            let projected: Option<Vec<(Pos2, f32)>> =
                face.iter().map(|&corner| projector.project(corner)).collect();
            let Some(projected) = projected else {
                continue;
            };
            let depth = projected.iter().map(|(_, d)| *d).sum::<f32>() / projected.len() as f32;
            faces.push((depth, projected.into_iter().map(|(p, _)| p).collect(), fill));
        }
    }

    faces.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    for (_, corners, fill) in faces {
        painter.add(Shape::convex_polygon(corners, fill, Stroke::NONE));
    }
}

fn paint_line(painter: &Painter, projector: &Projector<'_>, line: &LineSegment) {
    if let (Some((a, _)), Some((b, _))) = (projector.project(line.start), projector.project(line.end)) {
        painter.line_segment([a, b], Stroke::new(LINE_WIDTH, color32(line.color)));
    }
}

fn paint_points(painter: &Painter, projector: &Projector<'_>, scene: &PlotScene) {
    let cloud = &scene.points;
    let mut projected: Vec<(Pos2, f32, Color32)> = cloud
        .positions
        .iter()
        .zip(&cloud.colors)
        .filter_map(|(&position, &color)| {
            projector
                .project(position)
                .map(|(screen, depth)| (screen, depth, color32(color)))
        })
        .collect();

    projected.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    for (screen, depth, color) in projected {
        let radius = (projector.scale_at(cloud.size, depth) / 2.0).max(MIN_POINT_RADIUS);
        painter.circle_filled(screen, radius, color);
    }
}

fn paint_sprite(
    painter: &Painter,
    projector: &Projector<'_>,
    position: Vec3,
    world_height: f32,
    texture: &LabelTexture,
) {
    let Some((center, depth)) = projector.project(position) else {
        return;
    };
    let height = projector.scale_at(world_height, depth);
    let width = height * texture.aspect;
    let rect = Rect::from_center_size(center, egui::vec2(width, height));
    let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
    painter.image(texture.handle.id(), rect, uv, Color32::WHITE);
}
