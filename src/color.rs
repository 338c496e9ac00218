use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Diverging color scale for demand/supply ratios
// ---------------------------------------------------------------------------

/// Fill color when a ratio sequence has no spread (all values equal).
/// Matches `Color32::GRAY`.
pub const NEUTRAL_FILL: &str = "#a0a0a0";

/// Hue endpoints of the diverging ramp: cool blue for the lowest ratio
/// through to red for the highest.
const RAMP_LOW_HUE: f32 = 210.0;
const RAMP_HIGH_HUE: f32 = 0.0;

/// Map ratio values to hex fill colors (`#rrggbb`).
///
/// Each value is normalized to `[0, 1]` with `(v - min) / (max - min)` and
/// run through the diverging ramp. If every value is equal there is nothing
/// to normalize against, so every output is [`NEUTRAL_FILL`]. Empty input
/// maps to empty output.
pub fn ratio_fill_colors(values: &[f64]) -> Vec<String> {
    if values.is_empty() {
        return Vec::new();
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range.abs() < f64::EPSILON {
        return vec![NEUTRAL_FILL.to_string(); values.len()];
    }
    values
        .iter()
        .map(|&v| ramp_hex((v - min) / range))
        .collect()
}

/// Color at normalized position `t` on the diverging ramp, as a hex triplet.
fn ramp_hex(t: f64) -> String {
    let t = t.clamp(0.0, 1.0) as f32;
    let hue = RAMP_LOW_HUE + t * (RAMP_HIGH_HUE - RAMP_LOW_HUE);
    let rgb: Srgb = Hsl::new(hue, 0.72, 0.52).into_color();
    format!(
        "#{:02x}{:02x}{:02x}",
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8
    )
}

/// Parse a `#rrggbb` hex triplet back into a [`Color32`] for rendering.
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

// ---------------------------------------------------------------------------
// Heat-intensity gradient with historical-volume clamping
// ---------------------------------------------------------------------------

/// An ordered mapping from stop position in `[0, 1]` to color, used to
/// render heat samples.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatGradient {
    stops: Vec<(f64, Color32)>,
}

impl HeatGradient {
    /// The full cold-to-hot gradient: navy through cyan and lime up to red.
    pub fn base() -> Self {
        HeatGradient {
            stops: vec![
                (0.0, Color32::from_rgb(0, 0, 128)),
                (0.2, Color32::from_rgb(0, 0, 255)),
                (0.4, Color32::from_rgb(0, 255, 255)),
                (0.6, Color32::from_rgb(0, 255, 0)),
                (0.8, Color32::from_rgb(255, 255, 0)),
                (1.0, Color32::from_rgb(255, 0, 0)),
            ],
        }
    }

    /// Truncate the gradient for a quiet period.
    ///
    /// When `unit_ratio < 1`, only stops with position `<= unit_ratio`
    /// survive, so the hottest reachable color is the one at the largest
    /// retained stop. At or above 1 the gradient is unchanged.
    pub fn clamp_to(&self, unit_ratio: f64) -> HeatGradient {
        if unit_ratio >= 1.0 {
            return self.clone();
        }
        HeatGradient {
            stops: self
                .stops
                .iter()
                .copied()
                .filter(|&(pos, _)| pos <= unit_ratio)
                .collect(),
        }
    }

    /// The largest stop position, which doubles as the maximum intensity
    /// value heat samples are normalized against.
    pub fn max_stop(&self) -> f64 {
        self.stops.last().map_or(0.0, |&(pos, _)| pos)
    }

    /// The retained stops, in position order.
    pub fn stops(&self) -> &[(f64, Color32)] {
        &self.stops
    }

    /// Color at intensity `t`, linearly interpolated between the two
    /// surrounding stops and saturating past either end. A gradient with no
    /// stops falls back to gray.
    pub fn color_at(&self, t: f64) -> Color32 {
        let Some(&(first_pos, first_color)) = self.stops.first() else {
            return Color32::GRAY;
        };
        if t <= first_pos {
            return first_color;
        }
        let &(last_pos, last_color) = self.stops.last().unwrap_or(&(first_pos, first_color));
        if t >= last_pos {
            return last_color;
        }
        for pair in self.stops.windows(2) {
            let (lo_pos, lo_color) = pair[0];
            let (hi_pos, hi_color) = pair[1];
            if t <= hi_pos {
                let span = hi_pos - lo_pos;
                let frac = if span > 0.0 { (t - lo_pos) / span } else { 1.0 };
                return lerp_color(lo_color, hi_color, frac as f32);
            }
        }
        last_color
    }
}

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let channel = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgb(
        channel(a.r(), b.r()),
        channel(a.g(), b.g()),
        channel(a.b(), b.b()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_hex_triplet(s: &str) -> bool {
        s.len() == 7
            && s.starts_with('#')
            && s[1..].chars().all(|c| c.is_ascii_hexdigit())
    }

    #[test]
    fn one_color_per_value_and_all_valid_hex() {
        let colors = ratio_fill_colors(&[0.5, 1.0, 2.33, 0.9]);
        assert_eq!(colors.len(), 4);
        for c in &colors {
            assert!(is_hex_triplet(c), "not a hex triplet: {c}");
        }
    }

    #[test]
    fn empty_input_maps_to_empty_output() {
        assert!(ratio_fill_colors(&[]).is_empty());
    }

    #[test]
    fn equal_values_all_get_the_neutral_fallback() {
        let colors = ratio_fill_colors(&[1.0, 1.0, 1.0]);
        assert_eq!(colors, vec![NEUTRAL_FILL; 3]);

        let colors = ratio_fill_colors(&[2.5]);
        assert_eq!(colors, vec![NEUTRAL_FILL]);
    }

    #[test]
    fn extremes_land_on_the_ramp_endpoints() {
        let colors = ratio_fill_colors(&[0.2, 1.1, 3.0]);
        assert_eq!(colors[0], ramp_hex(0.0));
        assert_eq!(colors[2], ramp_hex(1.0));
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn hex_parsing_round_trips() {
        assert_eq!(parse_hex("#ff0080"), Some(Color32::from_rgb(255, 0, 128)));
        assert_eq!(parse_hex(NEUTRAL_FILL), Some(Color32::GRAY));
        assert_eq!(parse_hex("ff0080"), None);
        assert_eq!(parse_hex("#ff008"), None);
        assert_eq!(parse_hex("#ff00gg"), None);
    }

    #[test]
    fn clamp_keeps_only_stops_at_or_below_the_ratio() {
        let clamped = HeatGradient::base().clamp_to(0.5);
        let positions: Vec<f64> = clamped.stops().iter().map(|&(p, _)| p).collect();
        assert_eq!(positions, vec![0.0, 0.2, 0.4]);
        assert_eq!(clamped.max_stop(), 0.4);
    }

    #[test]
    fn clamp_boundary_is_inclusive() {
        let clamped = HeatGradient::base().clamp_to(0.4);
        assert_eq!(clamped.max_stop(), 0.4);
        assert_eq!(clamped.stops().len(), 3);
    }

    #[test]
    fn ratios_at_or_above_one_leave_the_gradient_alone() {
        let base = HeatGradient::base();
        assert_eq!(base.clamp_to(1.0), base);
        assert_eq!(base.clamp_to(7.5), base);
        assert_eq!(base.max_stop(), 1.0);
    }

    #[test]
    fn color_at_interpolates_and_saturates() {
        let g = HeatGradient::base();
        assert_eq!(g.color_at(0.0), Color32::from_rgb(0, 0, 128));
        assert_eq!(g.color_at(1.0), Color32::from_rgb(255, 0, 0));
        // Below and above the stop range saturate to the end colors.
        assert_eq!(g.color_at(-0.5), Color32::from_rgb(0, 0, 128));
        assert_eq!(g.color_at(2.0), Color32::from_rgb(255, 0, 0));
        // Halfway between the 0.2 and 0.4 stops.
        assert_eq!(g.color_at(0.3), Color32::from_rgb(0, 128, 255));
    }

    #[test]
    fn an_emptied_gradient_still_yields_a_color() {
        let g = HeatGradient { stops: Vec::new() };
        assert_eq!(g.color_at(0.5), Color32::GRAY);
        assert_eq!(g.max_stop(), 0.0);
    }
}
