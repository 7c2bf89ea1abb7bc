// ---------------------------------------------------------------------------
// Dashboard tunables
// ---------------------------------------------------------------------------

/// Fixed parameters of the dashboard. There is no config file; the
/// defaults are the whole configuration surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Rows shown in the selected-columns preview.
    pub preview_rows: usize,
    /// Equal-width bins used by the histogram chart.
    pub histogram_bins: usize,
    /// Whisker reach of the boxplot, in multiples of the IQR.
    pub whisker_factor: f64,
    /// Width / height ratio of every chart.
    pub chart_aspect: f32,
    /// Height of the scrollable full-dataset preview.
    pub data_preview_height: f32,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            histogram_bins: 20,
            whisker_factor: 1.5,
            chart_aspect: 1.5,
            data_preview_height: 260.0,
            window_size: [1200.0, 900.0],
            min_window_size: [600.0, 400.0],
        }
    }
}
