//! Orbit-style camera controls: rotate around, pan, and dolly toward a target.
//!
//! Input handlers only accumulate deltas; `update` applies them to the camera
//! once per frame, optionally damped so motion eases out over several frames.

use crate::viz::camera::PerspectiveCamera;
use glam::{Vec2, Vec3};
use std::f32::consts::PI;

const EPS: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: true,
            damping_factor: 0.1,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 1.0,
            max_distance: 500.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    /// Drag in surface pixels; a drag across the full height turns one revolution.
    pub fn rotate(&mut self, drag: Vec2, surface_height: f32) {
        if surface_height <= 0.0 {
            return;
        }
        let full_turn = 2.0 * PI / surface_height * self.rotate_speed;
        self.theta_delta -= drag.x * full_turn;
        self.phi_delta -= drag.y * full_turn;
    }

    /// Screen-space pan, scaled so the target moves with the pointer.
    pub fn pan(&mut self, drag: Vec2, surface_height: f32, camera: &PerspectiveCamera) {
        if surface_height <= 0.0 {
            return;
        }
        let offset = camera.position - self.target;
        let target_distance = offset.length() * (0.5 * camera.fov_y_degrees.to_radians()).tan();
        let forward = (self.target - camera.position).normalize_or_zero();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward);

        let dx = 2.0 * drag.x * target_distance / surface_height * self.pan_speed;
        let dy = 2.0 * drag.y * target_distance / surface_height * self.pan_speed;
        self.pan_offset += -right * dx + up * dy;
    }

    /// Positive `scroll` (wheel away from the user) moves the camera closer.
    pub fn dolly(&mut self, scroll: f32) {
        if scroll == 0.0 {
            return;
        }
        let step = 0.95f32.powf(self.zoom_speed * scroll.abs() / 50.0);
        if scroll > 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    /// Apply pending motion to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;
        let mut radius = offset.length();
        let (mut theta, mut phi) = if radius > EPS {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, 0.5 * PI)
        };

        let step = if self.enable_damping { self.damping_factor } else { 1.0 };
        theta += self.theta_delta * step;
        phi += self.phi_delta * step;
        phi = phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);

        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let previous_target = self.target;
        self.target += self.pan_offset * step;

        let sin_phi_radius = phi.sin() * radius;
        let new_offset = Vec3::new(
            sin_phi_radius * theta.sin(),
            phi.cos() * radius,
            sin_phi_radius * theta.cos(),
        );

        let previous_position = camera.position;
        camera.position = self.target + new_offset;
        camera.look_at(self.target);

        if self.enable_damping {
            self.theta_delta *= 1.0 - self.damping_factor;
            self.phi_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        (camera.position - previous_position).length_squared() > EPS
            || (self.target - previous_target).length_squared() > EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn undamped() -> OrbitControls {
        OrbitControls {
            enable_damping: false,
            ..Default::default()
        }
    }

    #[test]
    fn idle_update_keeps_camera_still() {
        let mut camera = PerspectiveCamera::new(1.0);
        let start = camera.position;
        let mut controls = undamped();
        assert!(!controls.update(&mut camera));
        assert!((camera.position - start).length() < 1e-3);
    }

    #[test]
    fn rotation_preserves_distance_to_target() {
        let mut camera = PerspectiveCamera::new(1.0);
        let distance = camera.position.length();
        let mut controls = undamped();
        controls.rotate(Vec2::new(120.0, 40.0), 600.0);
        assert!(controls.update(&mut camera));
        assert!((camera.position.length() - distance).abs() < 1e-3);
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn dolly_in_moves_closer() {
        let mut camera = PerspectiveCamera::new(1.0);
        let distance = camera.position.length();
        let mut controls = undamped();
        controls.dolly(100.0);
        controls.update(&mut camera);
        assert!(camera.position.length() < distance);
    }

    #[test]
    fn pan_moves_target() {
        let mut camera = PerspectiveCamera::new(1.0);
        let mut controls = undamped();
        controls.pan(Vec2::new(50.0, 0.0), 600.0, &camera);
        controls.update(&mut camera);
        assert!(controls.target.length() > 0.1);
        assert_eq!(camera.target, controls.target);
    }

    #[test]
    fn damping_spreads_motion_over_frames() {
        let mut camera = PerspectiveCamera::new(1.0);
        let mut controls = OrbitControls::default();
        controls.rotate(Vec2::new(200.0, 0.0), 600.0);
        assert!(controls.update(&mut camera));
        // Remaining delta keeps the camera moving on the next frame
        assert!(controls.update(&mut camera));
    }
}
