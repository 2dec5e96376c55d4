//! Text sprites: labels rasterized into a bitmap sized to the measured text.
//!
//! The backing bitmap is `ceil(text_width + 2 * padding)` by a fixed height in
//! logical pixels, multiplied by the device pixel ratio so labels stay sharp on
//! high-density displays. Text is drawn white-on-black and the coverage becomes
//! the alpha channel of the label color.

use crate::error::{OptionsError, Result};
use glam::Vec3;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};

/// Horizontal padding on each side of the text, logical pixels.
pub const LABEL_PADDING: f64 = 20.0;
/// Height of every label bitmap, logical pixels.
pub const LABEL_CANVAS_HEIGHT: u32 = 150;
/// Height of a label sprite in world units; width follows the bitmap aspect.
pub const LABEL_WORLD_HEIGHT: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub font_px: f64,
    pub bold: bool,
    /// Straight (non-premultiplied) RGBA.
    pub color: [u8; 4],
}

pub const AXIS_LABEL_STYLE: LabelStyle = LabelStyle {
    font_px: 32.0,
    bold: false,
    color: [0, 0, 0, 242],
};

pub const PRICE_LABEL_STYLE: LabelStyle = LabelStyle {
    font_px: 48.0,
    bold: true,
    color: [255, 165, 0, 242],
};

impl LabelStyle {
    fn font(&self, pixel_ratio: f64) -> FontDesc<'static> {
        let style = if self.bold { FontStyle::Bold } else { FontStyle::Normal };
        FontDesc::new(FontFamily::SansSerif, self.font_px * pixel_ratio, style)
    }

    /// Rendered width of `text` in logical pixels.
    pub fn measure(&self, text: &str) -> Result<f64> {
        let (width, _) = self.font(1.0).box_size(text).map_err(|e| {
            OptionsError::RenderError(format!("Failed to measure '{}': {:?}", text, e))
        })?;
        Ok(width as f64)
    }
}

/// A camera-facing text label anchored at a world position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSprite {
    pub text: String,
    pub style: LabelStyle,
    pub position: Vec3,
    pub world_height: f32,
}

impl TextSprite {
    pub fn new(text: impl Into<String>, style: LabelStyle, position: Vec3) -> Self {
        Self {
            text: text.into(),
            style,
            position,
            world_height: LABEL_WORLD_HEIGHT,
        }
    }
}

/// Logical bitmap size for text `text_width` pixels wide.
pub fn logical_canvas_size(text_width: f64) -> (u32, u32) {
    ((text_width + LABEL_PADDING * 2.0).ceil() as u32, LABEL_CANVAS_HEIGHT)
}

/// Physical bitmap size for a logical size at `pixel_ratio`.
pub fn backing_canvas_size(logical: (u32, u32), pixel_ratio: f32) -> (u32, u32) {
    let ratio = if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
    (
        ((logical.0 as f32 * ratio).ceil() as u32).max(1),
        ((logical.1 as f32 * ratio).ceil() as u32).max(1),
    )
}

/// RGBA bitmap backing one label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCanvas {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
    pub rgba: Vec<u8>,
}

impl LabelCanvas {
    pub fn render(sprite: &TextSprite, pixel_ratio: f32) -> Result<Self> {
        let text_width = sprite.style.measure(&sprite.text)?;
        let (width, height) = backing_canvas_size(logical_canvas_size(text_width), pixel_ratio);

        let mut rgb = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut rgb, (width, height)).into_drawing_area();
            root.fill(&BLACK)
                .map_err(|e| OptionsError::RenderError(e.to_string()))?;

            let style = TextStyle::from(sprite.style.font(pixel_ratio as f64))
                .color(&WHITE)
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw_text(&sprite.text, &style, (width as i32 / 2, height as i32 / 2))
                .map_err(|e| OptionsError::RenderError(e.to_string()))?;
            root.present()
                .map_err(|e| OptionsError::RenderError(e.to_string()))?;
        }

        let [r, g, b, a] = sprite.style.color;
        let rgba = rgb
            .chunks_exact(3)
            .flat_map(|px| {
                let coverage = px[0].max(px[1]).max(px[2]) as u32;
                [r, g, b, (coverage * a as u32 / 255) as u8]
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixel_ratio,
            rgba,
        })
    }

    /// Width over height; independent of the pixel ratio up to rounding.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
