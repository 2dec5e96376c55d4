use crate::viz::camera::PerspectiveCamera;
use glam::{Vec2, Vec3};
use std::cmp::Ordering;

/// Maximum distance between the pick ray and a point for it to count as hit.
pub const DEFAULT_POINT_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Parameter of the point on the ray closest to `point`, clamped to the origin.
    pub fn closest_t(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.direction).max(0.0)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    pub fn distance_sq_to_point(&self, point: Vec3) -> f32 {
        (self.at(self.closest_t(point)) - point).length_squared()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointIntersection {
    pub index: usize,
    /// Distance from the ray origin to the closest approach.
    pub distance: f32,
    pub distance_to_ray: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Raycaster {
    pub ray: Ray,
    pub near: f32,
    pub far: f32,
    pub point_threshold: f32,
}

impl Raycaster {
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            near: 0.0,
            far: f32::INFINITY,
            point_threshold: DEFAULT_POINT_THRESHOLD,
        }
    }

    /// Ray from the camera through `ndc` (x right, y up, both in `[-1, 1]`).
    pub fn from_camera(ndc: Vec2, camera: &PerspectiveCamera) -> Self {
        let through = camera.unproject(Vec3::new(ndc.x, ndc.y, 0.5));
        let mut caster = Self::new(Ray::new(camera.position, through - camera.position));
        caster.near = camera.near;
        caster.far = camera.far;
        caster
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.point_threshold = threshold;
        self
    }

    /// All points within the threshold of the ray, nearest to the origin first.
    pub fn intersect_points(&self, positions: &[Vec3]) -> Vec<PointIntersection> {
        let threshold_sq = self.point_threshold * self.point_threshold;

        let mut hits: Vec<PointIntersection> = positions
            .iter()
            .enumerate()
            .filter_map(|(index, &point)| {
                let distance_sq = self.ray.distance_sq_to_point(point);
                if distance_sq >= threshold_sq {
                    return None;
                }
                let distance = self.ray.closest_t(point);
                if distance < self.near || distance > self.far {
                    return None;
                }
                Some(PointIntersection {
                    index,
                    distance,
                    distance_to_ray: distance_sq.sqrt(),
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        hits
    }

    pub fn nearest_point(&self, positions: &[Vec3]) -> Option<PointIntersection> {
        self.intersect_points(positions).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_only_points_within_threshold() {
        let caster = Raycaster::new(Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z));
        let points = [
            Vec3::new(0.05, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 20.0),
        ];
        let hits = caster.intersect_points(&points);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 0);
        assert!((hits[0].distance - 10.0).abs() < 1e-5);
    }

    #[test]
    fn nearest_hit_wins() {
        let caster = Raycaster::new(Ray::new(Vec3::ZERO, Vec3::X)).with_threshold(0.2);
        let points = [Vec3::new(8.0, 0.1, 0.0), Vec3::new(3.0, 0.0, 0.1)];
        assert_eq!(caster.nearest_point(&points).map(|h| h.index), Some(1));
    }

    #[test]
    fn centre_ray_hits_camera_target() {
        let camera = PerspectiveCamera::new(1.5);
        let caster = Raycaster::from_camera(Vec2::ZERO, &camera);
        let hit = caster.nearest_point(&[Vec3::new(5.0, 5.0, 5.0), Vec3::ZERO]);
        assert_eq!(hit.map(|h| h.index), Some(1));
    }
}
