//! Chart colors: the YlGnBu heatmap ramp and evenly spaced series hues.
//!
//! Colors are plain `[u8; 3]` so both egui and plotters can consume them.

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

pub type Rgb = [u8; 3];

/// Cell color for NaN correlations.
pub const MISSING: Rgb = [200, 200, 200];

// YlGnBu, light to dark
const YLGNBU: [Rgb; 9] = [
    [255, 255, 217],
    [237, 248, 177],
    [199, 233, 180],
    [127, 205, 187],
    [65, 182, 196],
    [29, 145, 192],
    [34, 94, 168],
    [37, 52, 148],
    [8, 29, 88],
];

fn to_linear(c: Rgb) -> LinSrgb<f32> {
    Srgb::new(c[0], c[1], c[2]).into_format::<f32>().into_linear()
}

fn from_linear(c: LinSrgb<f32>) -> Rgb {
    from_srgb(Srgb::from_linear(c))
}

fn from_srgb(c: Srgb<f32>) -> Rgb {
    let c: Srgb<u8> = c.into_format();
    [c.red, c.green, c.blue]
}

/// Sample the YlGnBu ramp at `t` in `[0, 1]`.
pub fn ylgnbu(t: f64) -> Rgb {
    if t.is_nan() {
        return MISSING;
    }
    let scaled = t.clamp(0.0, 1.0) * (YLGNBU.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    let upper = (lower + 1).min(YLGNBU.len() - 1);
    let frac = (scaled - lower as f64) as f32;
    from_linear(to_linear(YLGNBU[lower]).mix(to_linear(YLGNBU[upper]), frac))
}

/// Heatmap cell color for `value` scaled to `range`.
pub fn heat_color(value: f64, range: Option<(f64, f64)>) -> Rgb {
    ylgnbu(heat_position(value, range))
}

/// Position of `value` on the ramp. A flat range maps to the middle.
pub fn heat_position(value: f64, range: Option<(f64, f64)>) -> f64 {
    match range {
        _ if value.is_nan() => f64::NAN,
        Some((lo, hi)) if hi > lo => (value - lo) / (hi - lo),
        _ => 0.5,
    }
}

/// Annotation text color that stays readable on a ramp cell.
pub fn annotation_color(position: f64) -> Rgb {
    if position > 0.6 {
        [255, 255, 255]
    } else {
        [0, 0, 0]
    }
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn series_palette(n: usize) -> Vec<Rgb> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0 + 210.0;
            let rgb: Srgb = Hsl::new(hue, 0.65, 0.5).into_color();
            from_srgb(rgb)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(a: Rgb, b: Rgb) -> bool {
        a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 1)
    }

    #[test]
    fn ramp_endpoints() {
        assert!(near(ylgnbu(0.0), YLGNBU[0]));
        assert!(near(ylgnbu(1.0), YLGNBU[8]));
        assert!(near(ylgnbu(7.0), YLGNBU[8]));
        assert_eq!(ylgnbu(f64::NAN), MISSING);
    }

    #[test]
    fn ramp_darkens() {
        let light = ylgnbu(0.1);
        let dark = ylgnbu(0.9);
        let sum = |c: Rgb| c.iter().map(|&v| v as u32).sum::<u32>();
        assert!(sum(light) > sum(dark));
    }

    #[test]
    fn heat_position_scales_to_range() {
        assert_eq!(heat_position(0.0, Some((-1.0, 1.0))), 0.5);
        assert_eq!(heat_position(1.0, Some((-1.0, 1.0))), 1.0);
        assert_eq!(heat_position(0.3, Some((1.0, 1.0))), 0.5);
        assert!(heat_position(f64::NAN, Some((0.0, 1.0))).is_nan());
    }

    #[test]
    fn palette_has_distinct_colors() {
        let colors = series_palette(4);
        assert_eq!(colors.len(), 4);
        for (i, a) in colors.iter().enumerate() {
            assert!(colors[i + 1..].iter().all(|b| b != a));
        }
    }
}
