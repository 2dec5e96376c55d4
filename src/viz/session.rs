//! The view session: camera, controls, current scene and its GPU textures.
//!
//! A session is created when the 3D view is mounted and dropped when it is
//! closed. Installing a new scene releases the previous scene's textures first.

use crate::error::Result;
use crate::models::{AxisData, OptionType};
use crate::viz::camera::{screen_to_ndc, PerspectiveCamera};
use crate::viz::controls::OrbitControls;
use crate::viz::label::{LabelCanvas, TextSprite};
use crate::viz::raycast::{Raycaster, DEFAULT_POINT_THRESHOLD};
use crate::viz::render::paint_scene;
use crate::viz::scene::PlotScene;
use crate::viz::tooltip::Tooltip;
use egui::{ColorImage, PointerButton, Sense, TextureHandle, TextureOptions};
use glam::{Vec2, Vec3};
use tracing::{debug, info, warn};

/// A label bitmap uploaded to the renderer. Dropping it frees the texture.
pub struct LabelTexture {
    pub handle: TextureHandle,
    pub aspect: f32,
}

impl LabelTexture {
    pub fn upload(
        ctx: &egui::Context,
        name: &str,
        sprite: &TextSprite,
        pixel_ratio: f32,
    ) -> Result<Self> {
        let canvas = LabelCanvas::render(sprite, pixel_ratio)?;
        let image = ColorImage::from_rgba_unmultiplied(
            [canvas.width as usize, canvas.height as usize],
            &canvas.rgba,
        );
        let handle = ctx.load_texture(name, image, TextureOptions::LINEAR);
        Ok(Self {
            handle,
            aspect: canvas.aspect(),
        })
    }

    /// Labels that fail to rasterize are left out of the view rather than failing it.
    fn upload_or_skip(
        ctx: &egui::Context,
        name: &str,
        sprite: &TextSprite,
        pixel_ratio: f32,
    ) -> Option<Self> {
        match Self::upload(ctx, name, sprite, pixel_ratio) {
            Ok(texture) => Some(texture),
            Err(e) => {
                warn!("Skipping label '{}': {}", sprite.text, e);
                None
            }
        }
    }
}

/// Scene plus the renderer resources allocated for it.
pub struct SceneHandle {
    pub scene: PlotScene,
    pub axis_textures: Vec<Option<LabelTexture>>,
    pub price_texture: Option<LabelTexture>,
}

impl SceneHandle {
    /// Scene without any uploaded textures.
    pub fn new(scene: PlotScene) -> Self {
        Self {
            scene,
            axis_textures: Vec::new(),
            price_texture: None,
        }
    }

    pub fn upload_labels(&mut self, ctx: &egui::Context, pixel_ratio: f32) {
        self.axis_textures = self
            .scene
            .axis_labels
            .iter()
            .enumerate()
            .map(|(i, sprite)| {
                let name = format!("axis-label-{}", i);
                LabelTexture::upload_or_skip(ctx, &name, sprite, pixel_ratio)
            })
            .collect();
        self.upload_price_label(ctx, pixel_ratio);
    }

    fn upload_price_label(&mut self, ctx: &egui::Context, pixel_ratio: f32) {
        // Drop the old texture before allocating the replacement
        self.price_texture = None;
        self.price_texture =
            LabelTexture::upload_or_skip(ctx, "price-label", &self.scene.price_label, pixel_ratio);
    }

    pub fn texture_count(&self) -> usize {
        self.axis_textures.iter().flatten().count() + usize::from(self.price_texture.is_some())
    }

    /// Free every texture owned by this scene. Returns how many were released.
    pub fn release(&mut self) -> usize {
        let released = self.texture_count();
        self.axis_textures.clear();
        self.price_texture = None;
        released
    }
}

/// What `sync` had to do to bring the view up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneUpdate {
    Unchanged,
    /// Only the price changed: grid, volumes and price label moved.
    Repositioned,
    /// Data, option side or pixel density changed: scene rebuilt.
    Rebuilt,
}

#[derive(Debug, Clone)]
struct SceneInputs {
    data: AxisData,
    option_type: OptionType,
    current_price: f64,
    pixel_ratio: f32,
}

pub struct ViewSession {
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub tooltip: Tooltip,
    pub point_threshold: f32,
    scene: Option<SceneHandle>,
    inputs: Option<SceneInputs>,
    surface_size: Vec2,
}

impl Default for ViewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewSession {
    pub fn new() -> Self {
        let camera = PerspectiveCamera::new(1.0);
        let controls = OrbitControls::new(Vec3::ZERO);
        info!("3D view session created");
        Self {
            camera,
            controls,
            tooltip: Tooltip::hidden(),
            point_threshold: DEFAULT_POINT_THRESHOLD,
            scene: None,
            inputs: None,
            surface_size: Vec2::ONE,
        }
    }

    pub fn scene(&self) -> Option<&PlotScene> {
        self.scene.as_ref().map(|handle| &handle.scene)
    }

    /// Decide how much of the scene must change for these inputs.
    pub fn plan_update(
        &self,
        data: &AxisData,
        option_type: OptionType,
        current_price: f64,
        pixel_ratio: f32,
    ) -> SceneUpdate {
        match &self.inputs {
            None => SceneUpdate::Rebuilt,
            Some(prev) => {
                // Compared by bit pattern so NaN samples and prices count as unchanged
                if !prev.data.same_samples(data)
                    || prev.option_type != option_type
                    || prev.pixel_ratio != pixel_ratio
                {
                    SceneUpdate::Rebuilt
                } else if prev.current_price.to_bits() != current_price.to_bits() {
                    SceneUpdate::Repositioned
                } else {
                    SceneUpdate::Unchanged
                }
            }
        }
    }

    /// Replace the current scene, releasing the old one's resources first.
    pub fn install(&mut self, handle: SceneHandle) {
        self.release_scene();
        self.tooltip = Tooltip::hidden();
        self.scene = Some(handle);
    }

    fn release_scene(&mut self) {
        if let Some(mut old) = self.scene.take() {
            let released = old.release();
            debug!("Released {} label textures from previous scene", released);
        }
    }

    /// Bring the scene in line with the latest plot inputs.
    pub fn sync(
        &mut self,
        ctx: &egui::Context,
        data: &AxisData,
        option_type: OptionType,
        current_price: f64,
    ) -> SceneUpdate {
        let pixel_ratio = ctx.pixels_per_point();
        let update = self.plan_update(data, option_type, current_price, pixel_ratio);

        match update {
            SceneUpdate::Rebuilt => {
                let scene = PlotScene::build(data, option_type, current_price);
                let mut handle = SceneHandle::new(scene);
                handle.upload_labels(ctx, pixel_ratio);
                self.install(handle);
            }
            SceneUpdate::Repositioned => {
                if let Some(handle) = self.scene.as_mut() {
                    handle.scene.set_price(current_price);
                    handle.upload_price_label(ctx, pixel_ratio);
                }
            }
            SceneUpdate::Unchanged => {}
        }

        if update != SceneUpdate::Unchanged {
            self.inputs = Some(SceneInputs {
                data: data.clone(),
                option_type,
                current_price,
                pixel_ratio,
            });
        }
        update
    }

    pub fn set_surface_size(&mut self, size: Vec2) {
        if size.x > 0.0 && size.y > 0.0 {
            self.surface_size = size;
            self.camera.set_aspect(size.x, size.y);
        }
    }

    /// Hit-test the pointer (surface pixels, origin top-left) against the point
    /// cloud and update the tooltip.
    pub fn on_pointer_move(&mut self, pointer: Vec2) -> &Tooltip {
        self.tooltip = self.hit_test(pointer);
        &self.tooltip
    }

    pub fn on_pointer_leave(&mut self) {
        self.tooltip = Tooltip::hidden();
    }

    fn hit_test(&self, pointer: Vec2) -> Tooltip {
        let Some(handle) = &self.scene else {
            return Tooltip::hidden();
        };
        let ndc = screen_to_ndc(pointer, self.surface_size);
        let caster = Raycaster::from_camera(ndc, &self.camera).with_threshold(self.point_threshold);

        caster
            .nearest_point(&handle.scene.points.positions)
            .and_then(|hit| handle.scene.tooltip_content(hit.index))
            .map(|content| Tooltip::shown(pointer, content))
            .unwrap_or_else(Tooltip::hidden)
    }

    /// One display frame: apply input, advance the controls, redraw, hit-test,
    /// and schedule the next frame.
    pub fn show(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        self.set_surface_size(Vec2::new(rect.width(), rect.height()));

        let drag = response.drag_delta();
        let drag = Vec2::new(drag.x, drag.y);
        if response.dragged_by(PointerButton::Primary) {
            self.controls.rotate(drag, self.surface_size.y);
        } else if response.dragged_by(PointerButton::Secondary)
            || response.dragged_by(PointerButton::Middle)
        {
            self.controls.pan(drag, self.surface_size.y, &self.camera);
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            self.controls.dolly(scroll);
        }

        self.controls.update(&mut self.camera);

        if let Some(handle) = &self.scene {
            paint_scene(
                &painter,
                rect,
                &self.camera,
                &handle.scene,
                &handle.axis_textures,
                handle.price_texture.as_ref(),
            );
        }

        match response.hover_pos() {
            Some(pos) => {
                self.on_pointer_move(Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y));
            }
            None => self.on_pointer_leave(),
        }

        if self.tooltip.visible {
            let origin = self.tooltip.box_origin();
            egui::Area::new(egui::Id::new("surface-tooltip"))
                .order(egui::Order::Tooltip)
                .interactable(false)
                .fixed_pos(egui::pos2(rect.min.x + origin.x, rect.min.y + origin.y))
                .show(ui.ctx(), |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(&self.tooltip.content);
                    });
                });
        }

        ui.ctx().request_repaint();
    }
}

impl Drop for ViewSession {
    fn drop(&mut self) {
        self.release_scene();
        info!("3D view session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AxisData {
        let mut data = AxisData::new("Days Til Expiration", "Strike Price", "markPrice");
        data.push(7.0, 95.0, 1.2);
        data.push(14.0, 105.0, 3.4);
        data
    }

    #[test]
    fn first_sync_rebuilds_then_price_repositions() {
        let ctx = egui::Context::default();
        let mut session = ViewSession::new();
        let data = sample();

        assert_eq!(session.sync(&ctx, &data, OptionType::Put, 100.0), SceneUpdate::Rebuilt);
        assert_eq!(session.sync(&ctx, &data, OptionType::Put, 100.0), SceneUpdate::Unchanged);
        assert_eq!(session.sync(&ctx, &data, OptionType::Put, 105.0), SceneUpdate::Repositioned);
        assert_eq!(session.scene().unwrap().grid.position.y, 10.0);
        assert_eq!(session.sync(&ctx, &data, OptionType::Call, 105.0), SceneUpdate::Rebuilt);
    }

    #[test]
    fn nan_samples_and_price_do_not_rebuild_each_frame() {
        let ctx = egui::Context::default();
        let mut session = ViewSession::new();
        let mut data = AxisData::new("Days Til Expiration", "Strike Price", "markPrice");
        data.push(7.0, 95.0, 1.2);
        data.push(14.0, 105.0, f64::NAN);

        assert_eq!(session.sync(&ctx, &data, OptionType::Put, 100.0), SceneUpdate::Rebuilt);
        assert_eq!(session.sync(&ctx, &data, OptionType::Put, 100.0), SceneUpdate::Unchanged);
        let same = data.clone();
        assert_eq!(session.sync(&ctx, &same, OptionType::Put, 100.0), SceneUpdate::Unchanged);

        assert_eq!(session.sync(&ctx, &data, OptionType::Put, f64::NAN), SceneUpdate::Repositioned);
        assert_eq!(session.sync(&ctx, &data, OptionType::Put, f64::NAN), SceneUpdate::Unchanged);

        data.z.data[1] = 2.0;
        assert_eq!(session.sync(&ctx, &data, OptionType::Put, f64::NAN), SceneUpdate::Rebuilt);
    }

    #[test]
    fn installing_a_scene_releases_the_previous_one() {
        let mut session = ViewSession::new();
        session.install(SceneHandle::new(PlotScene::build(&sample(), OptionType::Put, 100.0)));
        session.tooltip = Tooltip::shown(Vec2::ONE, "stale".to_string());
        session.install(SceneHandle::new(PlotScene::build(&sample(), OptionType::Call, 100.0)));
        assert!(!session.tooltip.visible);
        assert_eq!(session.scene().unwrap().option_type, OptionType::Call);
    }

    #[test]
    fn release_empties_texture_slots() {
        let mut handle = SceneHandle::new(PlotScene::build(&sample(), OptionType::Put, 100.0));
        handle.axis_textures = vec![None, None, None];
        assert_eq!(handle.release(), 0);
        assert!(handle.axis_textures.is_empty());
    }

    #[test]
    fn pointer_without_scene_hides_tooltip() {
        let mut session = ViewSession::new();
        assert!(!session.on_pointer_move(Vec2::new(10.0, 10.0)).visible);
    }
}
