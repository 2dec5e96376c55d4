//! Number formatting for the price shown in the 3D view.

/// Round to `significant_digits` significant figures.
pub fn round_to_significant_digits(num: f64, significant_digits: i32) -> f64 {
    if num == 0.0 || !num.is_finite() {
        return num;
    }
    let digits = num.abs().log10().floor() as i32 + 1;
    let shift = significant_digits - digits;
    if shift >= 0 {
        let factor = 10f64.powi(shift);
        (num * factor).round() / factor
    } else {
        let factor = 10f64.powi(-shift);
        (num / factor).round() * factor
    }
}
