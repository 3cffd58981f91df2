//! Chart configuration shared across visualization modules

use plotters::prelude::*;

/// Configuration for customizing charts
///
/// # Fields
///
/// - `width`, `height`: Dimensions in pixels
/// - `title`: Title drawn above the whole figure (empty for none)
/// - `series_colors`: Optional colors, one per dataset
/// - `background`: Background color
/// - `marker_size`: Scatter marker radius in pixels
/// - `show_grid`: Whether to draw mesh lines
///
/// # Example
///
/// ```rust,ignore
/// use deinit_analysis::output::visualization::ChartConfig;
/// use plotters::prelude::*;
///
/// let mut config = ChartConfig::versus_values("async tree");
/// config.series_colors = Some(vec![BLUE, RED, GREEN]);
/// config.width = 1600;
/// ```
#[derive(Clone)]
pub struct ChartConfig {
    /// Image width in pixels (default: 1000)
    pub width: u32,

    /// Image height in pixels (default: 1000)
    pub height: u32,

    /// Figure title (default: empty)
    pub title: String,

    /// Optional colors for the dataset series
    ///
    /// If None, uses the default palette: [BLUE, RED, GREEN, MAGENTA, CYAN, ...]
    pub series_colors: Option<Vec<RGBColor>>,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Marker radius in pixels (default: 3)
    pub marker_size: u32,

    /// Show mesh lines (default: true)
    pub show_grid: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            title: String::new(),
            series_colors: None,
            background: WHITE,
            marker_size: 3,
            show_grid: true,
        }
    }
}

/// Helper trait to accept both `String` and `None` for optional titles
pub trait IntoOptionalTitle {
    fn into_optional_title(self) -> Option<String>;
}

impl IntoOptionalTitle for &str {
    fn into_optional_title(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoOptionalTitle for String {
    fn into_optional_title(self) -> Option<String> {
        Some(self)
    }
}

impl<T: IntoOptionalTitle> IntoOptionalTitle for Option<T> {
    fn into_optional_title(self) -> Option<String> {
        self.and_then(|t| t.into_optional_title())
    }
}

/// Constant for no title
pub const NO_TITLE: Option<&str> = None;

impl ChartConfig {
    /// Config for the per-object cost versus task-local values figure
    pub fn versus_values(title: impl IntoOptionalTitle) -> Self {
        Self {
            title: title.into_optional_title().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Config for the total cost versus objects figure
    pub fn versus_objects(title: impl IntoOptionalTitle) -> Self {
        Self {
            title: title.into_optional_title().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Config for the relative error of a fit
    ///
    /// Defaults to a wide, short figure since it has one panel per phase.
    pub fn relative_error(title: impl IntoOptionalTitle) -> Self {
        Self {
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "Relative error of fit".to_string()),
            width: 1200,
            height: 900,
            marker_size: 2,
            ..Self::default()
        }
    }

    /// Config with custom series colors
    pub fn series_colors(colors: Vec<RGBColor>) -> Self {
        Self {
            series_colors: Some(colors),
            ..Self::default()
        }
    }

    /// Get color for series at index i
    ///
    /// Uses custom colors if provided, otherwise falls back to default palette
    pub(crate) fn get_series_color(&self, series_index: usize) -> RGBColor {
        if let Some(ref colors) = self.series_colors
            && series_index < colors.len()
        {
            return colors[series_index];
        }

        let default_colors = [
            BLUE,
            RED,
            GREEN,
            MAGENTA,
            CYAN,
            BLACK,
            RGBColor(255, 165, 0),  // Orange
            RGBColor(128, 0, 128),  // Purple
        ];

        default_colors[series_index % default_colors.len()]
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_config_default() {
        let config = ChartConfig::default();
        assert_eq!(config.width, 1000);
        assert_eq!(config.height, 1000);
        assert!(config.title.is_empty());
        assert!(config.show_grid);
    }

    #[test]
    fn test_versus_values_with_title() {
        let config = ChartConfig::versus_values("async tree");
        assert_eq!(config.title, "async tree");

        let config = ChartConfig::versus_values(format!("async {}", "array"));
        assert_eq!(config.title, "async array");
    }

    #[test]
    fn test_relative_error_default_title() {
        let config = ChartConfig::relative_error(NO_TITLE);
        assert_eq!(config.title, "Relative error of fit");
    }

    #[test]
    fn test_get_series_color_default_palette() {
        let config = ChartConfig::default();
        assert_eq!(config.get_series_color(0), BLUE);
        assert_eq!(config.get_series_color(1), RED);
        assert_eq!(config.get_series_color(8), BLUE); // Wraparound
    }

    #[test]
    fn test_get_series_color_custom_then_fallback() {
        let config = ChartConfig::series_colors(vec![GREEN]);
        assert_eq!(config.get_series_color(0), GREEN);
        assert_eq!(config.get_series_color(1), RED);
    }
}
