//! Report configuration and environment variable handling.

use std::env;

/// Rendering and estimation settings for one report run.
///
/// The contour threshold is the iso-proportion level below which density is
/// not drawn; callers tune it per request (the report endpoint uses 0.75).
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Density contour threshold, in (0, 1).
    pub contour_threshold: f64,
    /// Heat map canvas size in pixels (whole two-panel figure).
    pub heat_map_size: (u32, u32),
    /// Break map canvas size in pixels.
    pub break_map_size: (u32, u32),
    /// KDE evaluation grid resolution (cells along x and y).
    pub kde_grid: (usize, usize),
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            contour_threshold: 0.75,
            heat_map_size: (1280, 640),
            break_map_size: (760, 760),
            kde_grid: (120, 120),
        }
    }
}

impl ReportConfig {
    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `REPORT_CONTOUR_THRESHOLD` (optional, default: 0.75): density contour level, in (0, 1)
    /// - `REPORT_HEAT_MAP_SIZE` (optional, default: 1280x640): heat map canvas, `WIDTHxHEIGHT`
    /// - `REPORT_BREAK_MAP_SIZE` (optional, default: 760x760): break map canvas, `WIDTHxHEIGHT`
    /// - `REPORT_KDE_GRID` (optional, default: 120x120): KDE grid resolution, `NXxNY`
    ///
    /// # Errors
    /// Returns an error if a variable is set but malformed, or the threshold
    /// is outside (0, 1).
    pub fn from_env() -> Result<Self, String> {
        let defaults = ReportConfig::default();

        let contour_threshold = match env::var("REPORT_CONTOUR_THRESHOLD") {
            Ok(raw) => raw
                .parse::<f64>()
                .map_err(|_| "REPORT_CONTOUR_THRESHOLD must be a number".to_string())?,
            Err(_) => defaults.contour_threshold,
        };

        let heat_map_size = match env::var("REPORT_HEAT_MAP_SIZE") {
            Ok(raw) => parse_size(&raw, "REPORT_HEAT_MAP_SIZE")?,
            Err(_) => defaults.heat_map_size,
        };
        let break_map_size = match env::var("REPORT_BREAK_MAP_SIZE") {
            Ok(raw) => parse_size(&raw, "REPORT_BREAK_MAP_SIZE")?,
            Err(_) => defaults.break_map_size,
        };
        let kde_grid = match env::var("REPORT_KDE_GRID") {
            Ok(raw) => {
                let (nx, ny) = parse_size(&raw, "REPORT_KDE_GRID")?;
                (nx as usize, ny as usize)
            }
            Err(_) => defaults.kde_grid,
        };

        let config = ReportConfig {
            contour_threshold,
            heat_map_size,
            break_map_size,
            kde_grid,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges. Called by `from_env`; callers constructing a
    /// config by hand should call it too.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.contour_threshold > 0.0 && self.contour_threshold < 1.0) {
            return Err(format!(
                "contour threshold must be in (0, 1), got {}",
                self.contour_threshold
            ));
        }
        if self.heat_map_size.0 == 0 || self.heat_map_size.1 == 0 {
            return Err("heat map size must be non-zero".to_string());
        }
        if self.break_map_size.0 == 0 || self.break_map_size.1 == 0 {
            return Err("break map size must be non-zero".to_string());
        }
        if self.kde_grid.0 < 2 || self.kde_grid.1 < 2 {
            return Err("KDE grid must be at least 2x2".to_string());
        }
        Ok(())
    }
}

fn parse_size(raw: &str, var: &str) -> Result<(u32, u32), String> {
    let mut parts = raw.splitn(2, 'x');
    let width = parts
        .next()
        .and_then(|p| p.trim().parse::<u32>().ok())
        .ok_or_else(|| format!("{} must look like WIDTHxHEIGHT", var))?;
    let height = parts
        .next()
        .and_then(|p| p.trim().parse::<u32>().ok())
        .ok_or_else(|| format!("{} must look like WIDTHxHEIGHT", var))?;
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ReportConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.contour_threshold - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_bounds_rejected() {
        let mut config = ReportConfig::default();
        config.contour_threshold = 0.0;
        assert!(config.validate().is_err());
        config.contour_threshold = 1.0;
        assert!(config.validate().is_err());
        config.contour_threshold = 0.5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1280x640", "X").unwrap(), (1280, 640));
        assert_eq!(parse_size("760 x 760", "X").unwrap(), (760, 760));
        assert!(parse_size("wide", "X").is_err());
        assert!(parse_size("1280", "X").is_err());
    }
}
