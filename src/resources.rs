//! Host-provided display configuration consumed when instantiating drawables.

/// Density of the baseline (mdpi) screen.
pub const DENSITY_DEFAULT: u32 = 160;

/// Display density information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    /// Screen density in dots per inch.
    pub density_dpi: u32,
}

impl DisplayMetrics {
    pub fn new(density_dpi: u32) -> Self {
        Self { density_dpi }
    }

    /// Scale factor relative to [`DENSITY_DEFAULT`].
    pub fn density(&self) -> f32 {
        density_scale(self.density_dpi)
    }
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            density_dpi: DENSITY_DEFAULT,
        }
    }
}

/// Convert a dpi value into a scale factor.
pub fn density_scale(density_dpi: u32) -> f32 {
    density_dpi as f32 / DENSITY_DEFAULT as f32
}

/// Resources handed to [`ConstantState::new_drawable_with_resources`].
///
/// [`ConstantState::new_drawable_with_resources`]: crate::ConstantState::new_drawable_with_resources
#[derive(Debug, Clone, Default)]
pub struct Resources {
    display_metrics: DisplayMetrics,
}

impl Resources {
    pub fn new(display_metrics: DisplayMetrics) -> Self {
        Self { display_metrics }
    }

    pub fn with_density_dpi(density_dpi: u32) -> Self {
        Self::new(DisplayMetrics::new(density_dpi))
    }

    pub fn display_metrics(&self) -> &DisplayMetrics {
        &self.display_metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_scale() {
        assert_eq!(DisplayMetrics::default().density(), 1.0);
        assert_eq!(Resources::with_density_dpi(320).display_metrics().density(), 2.0);
        assert_eq!(density_scale(240), 1.5);
    }
}
