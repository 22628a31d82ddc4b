//! Fixed per-pitch-type color tables for the maps.
//!
//! The tables are immutable configuration owned by the renderer: a color
//! ramp per pitch type for density fills and a point color per pitch type
//! for scatter fallbacks and mean markers, each with a defined fallback for
//! unrecognized labels.

use plotters::style::RGBColor;

/// Two-stop linear color ramp for density fills.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRamp {
    pub low: RGBColor,
    pub high: RGBColor,
}

impl ColorRamp {
    pub const fn new(low: RGBColor, high: RGBColor) -> Self {
        ColorRamp { low, high }
    }

    /// Sample the ramp at `t` in [0, 1]; out-of-range values clamp.
    pub fn sample(&self, t: f64) -> RGBColor {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| -> u8 { (a as f64 + (b as f64 - a as f64) * t).round() as u8 };
        RGBColor(
            lerp(self.low.0, self.high.0),
            lerp(self.low.1, self.high.1),
            lerp(self.low.2, self.high.2),
        )
    }
}

/// Per-pitch-type colors with fallbacks for unrecognized labels.
#[derive(Debug, Clone)]
pub struct PitchPalette {
    ramps: Vec<(&'static str, ColorRamp)>,
    point_colors: Vec<(&'static str, RGBColor)>,
    fallback_ramp: ColorRamp,
    fallback_point: RGBColor,
}

impl Default for PitchPalette {
    fn default() -> Self {
        PitchPalette {
            ramps: vec![
                // Light tint to saturated hue, one family per pitch type.
                ("Fastball", ColorRamp::new(RGBColor(254, 224, 210), RGBColor(203, 24, 29))),
                ("Curveball", ColorRamp::new(RGBColor(222, 235, 247), RGBColor(33, 113, 181))),
                ("Slider", ColorRamp::new(RGBColor(229, 245, 224), RGBColor(35, 139, 69))),
                ("Changeup", ColorRamp::new(RGBColor(254, 230, 206), RGBColor(241, 105, 19))),
                ("Splitter", ColorRamp::new(RGBColor(239, 237, 245), RGBColor(106, 81, 163))),
                ("Knuckleball", ColorRamp::new(RGBColor(255, 247, 188), RGBColor(204, 76, 2))),
            ],
            point_colors: vec![
                ("Fastball", RGBColor(0xFF, 0x00, 0x00)),
                ("Curveball", RGBColor(0x00, 0x00, 0xFF)),
                ("Slider", RGBColor(0x00, 0xAA, 0x00)),
                ("Changeup", RGBColor(0xFF, 0x88, 0x00)),
                ("Splitter", RGBColor(0xAA, 0x00, 0xAA)),
                ("Knuckleball", RGBColor(0xCC, 0x88, 0x00)),
            ],
            // Viridis-like ramp for pitch types without a dedicated family.
            fallback_ramp: ColorRamp::new(RGBColor(68, 1, 84), RGBColor(253, 231, 37)),
            fallback_point: RGBColor(0x00, 0x00, 0x00),
        }
    }
}

impl PitchPalette {
    /// Density ramp for a pitch type; unrecognized labels get the fallback.
    pub fn ramp(&self, pitch_type: &str) -> ColorRamp {
        self.ramps
            .iter()
            .find(|(name, _)| *name == pitch_type)
            .map(|(_, ramp)| *ramp)
            .unwrap_or(self.fallback_ramp)
    }

    /// Marker color for a pitch type; unrecognized labels get the fallback.
    pub fn point_color(&self, pitch_type: &str) -> RGBColor {
        self.point_colors
            .iter()
            .find(|(name, _)| *name == pitch_type)
            .map(|(_, color)| *color)
            .unwrap_or(self.fallback_point)
    }

    /// Labels with a dedicated ramp, in table order.
    pub fn known_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.ramps.iter().map(|(name, _)| *name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types_have_dedicated_colors() {
        let palette = PitchPalette::default();
        assert_eq!(palette.known_types().count(), 6);
        assert_eq!(palette.point_color("Fastball"), RGBColor(255, 0, 0));
        assert_eq!(palette.ramp("Slider").high, RGBColor(35, 139, 69));
    }

    #[test]
    fn test_unrecognized_type_gets_fallback() {
        let palette = PitchPalette::default();
        assert_eq!(palette.point_color("Eephus"), RGBColor(0, 0, 0));
        assert_eq!(palette.ramp("Eephus"), palette.ramp("Gyroball"));
        assert_ne!(palette.ramp("Eephus"), palette.ramp("Fastball"));
    }

    #[test]
    fn test_ramp_sampling_endpoints_and_clamp() {
        let ramp = ColorRamp::new(RGBColor(0, 0, 0), RGBColor(100, 200, 50));
        assert_eq!(ramp.sample(0.0), RGBColor(0, 0, 0));
        assert_eq!(ramp.sample(1.0), RGBColor(100, 200, 50));
        assert_eq!(ramp.sample(0.5), RGBColor(50, 100, 25));
        assert_eq!(ramp.sample(-1.0), ramp.sample(0.0));
        assert_eq!(ramp.sample(2.0), ramp.sample(1.0));
    }
}
