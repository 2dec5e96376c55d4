use crate::models::Rgb;
use crate::utils::normalize::AxisRange;

/// Hue assigned to the smallest metric value; the largest gets hue 0 (red).
pub const HUE_AT_MIN: f64 = 0.7;

/// Standard HSL to RGB conversion. `h` is a fraction of a full turn and wraps;
/// `s` and `l` are clamped to `[0, 1]`.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return Rgb::new(l as f32, l as f32, l as f32);
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb::new(
        hue_to_channel(p, q, h + 1.0 / 3.0) as f32,
        hue_to_channel(p, q, h) as f32,
        hue_to_channel(p, q, h - 1.0 / 3.0) as f32,
    )
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * 6.0 * (2.0 / 3.0 - t);
    }
    p
}

/// Blue-to-red gradient over the z-axis range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    range: AxisRange,
}

impl ColorScale {
    pub fn new(range: AxisRange) -> Self {
        Self { range }
    }

    /// `0.7 - 0.7 * t` where `t` is the value's position in the range. Not clamped.
    pub fn hue(&self, value: f64) -> f64 {
        HUE_AT_MIN - HUE_AT_MIN * self.range.fraction(value)
    }

    pub fn color(&self, value: f64) -> Rgb {
        hsl_to_rgb(self.hue(value), 1.0, 0.5)
    }
}
