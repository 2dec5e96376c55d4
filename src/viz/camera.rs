use glam::{Mat4, Vec2, Vec3, Vec4};

pub const DEFAULT_FOV_DEGREES: f32 = 72.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 1000.0;
pub const DEFAULT_POSITION: Vec3 = Vec3::new(24.0, 8.0, 16.0);

/// A world point after projection onto the render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Position in surface pixels, origin top-left.
    pub screen: Vec2,
    /// Distance in front of the camera along its view axis.
    pub depth: f32,
}

/// Right-handed perspective camera, y up.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: DEFAULT_POSITION,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees: DEFAULT_FOV_DEGREES,
            aspect,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Pixels per world unit at one unit of depth, for a surface `height` pixels tall.
    pub fn focal_length_px(&self, height: f32) -> f32 {
        0.5 * height / (0.5 * self.fov_y_degrees.to_radians()).tan()
    }

    /// Project a world point onto a `size` pixel surface. `None` when the point
    /// is behind the camera or outside the clip depth range.
    pub fn project(&self, world: Vec3, size: Vec2) -> Option<Projected> {
        let clip = self.view_projection() * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= self.near {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }
        Some(Projected {
            screen: ndc_to_screen(Vec2::new(ndc.x, ndc.y), size),
            depth: clip.w,
        })
    }

    /// World position of a normalized-device-coordinate point (`z` in `[-1, 1]`).
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.view_projection().inverse().project_point3(ndc)
    }
}

/// Map a surface pixel position (origin top-left) to NDC in `[-1, 1]`, y up.
pub fn screen_to_ndc(screen: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(
        screen.x / size.x * 2.0 - 1.0,
        -(screen.y / size.y) * 2.0 + 1.0,
    )
}

pub fn ndc_to_screen(ndc: Vec2, size: Vec2) -> Vec2 {
    Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_surface_centre() {
        let camera = PerspectiveCamera::new(4.0 / 3.0);
        let size = Vec2::new(800.0, 600.0);
        let projected = camera.project(Vec3::ZERO, size).unwrap();
        assert!((projected.screen - Vec2::new(400.0, 300.0)).length() < 1e-3);
        assert!((projected.depth - DEFAULT_POSITION.length()).abs() < 1e-3);
    }

    #[test]
    fn points_behind_camera_are_culled() {
        let camera = PerspectiveCamera::new(1.0);
        let behind = DEFAULT_POSITION * 2.0;
        assert!(camera.project(behind, Vec2::new(100.0, 100.0)).is_none());
    }

    #[test]
    fn ndc_round_trip() {
        let size = Vec2::new(640.0, 480.0);
        let screen = Vec2::new(160.0, 360.0);
        let ndc = screen_to_ndc(screen, size);
        assert_eq!(ndc, Vec2::new(-0.5, -0.5));
        assert_eq!(ndc_to_screen(ndc, size), screen);
    }
}
