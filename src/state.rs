use std::collections::BTreeMap;

use crate::chart::{AxisSelection, Chart, ChartKind, build_chart};
use crate::config::DashboardConfig;
use crate::data::loader::LoadError;
use crate::data::model::Dataset;
use crate::data::profile::Profile;
use crate::data::select::{self, ColumnSelection, Preview};

// ---------------------------------------------------------------------------
// Status messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    fn new(level: StatusLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

pub const UPLOAD_PROMPT: &str = "Please upload a CSV or Excel file to get started";
pub const NO_SELECTION_NOTE: &str = "No columns selected. Showing full dataset";
pub const NO_NUMERIC_WARNING: &str = "No numerical columns available.";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Profile of `dataset`. The dataset is immutable, so this is
    /// recomputed exactly when the dataset is replaced.
    pub profile: Option<Profile>,

    /// Columns picked for the selected-columns view, in pick order.
    pub column_selection: ColumnSelection,

    /// Chart axes; `None` when the dataset has no numeric column.
    pub axes: Option<AxisSelection>,

    /// Figures produced by chart triggers, at most one per kind.
    pub charts: BTreeMap<ChartKind, Chart>,

    /// Status / error message shown in the UI.
    pub status: Option<StatusMessage>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            profile: None,
            column_selection: ColumnSelection::new(),
            axes: None,
            charts: BTreeMap::new(),
            status: None,
        }
    }

    /// Apply the outcome of a load. Any previous dataset is discarded.
    pub fn apply_load(&mut self, result: Result<Dataset, LoadError>) {
        match result {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows x {} columns from {}",
                    dataset.n_rows(),
                    dataset.n_columns(),
                    dataset.source.as_deref().unwrap_or("<memory>")
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                let message = user_message(&e);
                log::error!("Failed to load file: {:#}", anyhow::Error::new(e));
                self.clear_dataset();
                self.status = Some(StatusMessage::new(StatusLevel::Error, message));
            }
        }
    }

    /// Ingest a newly loaded dataset, reset selections and charts.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.profile = Some(Profile::of(&dataset));
        self.column_selection.clear();
        self.axes = AxisSelection::reconcile(None, &dataset.numeric_columns());
        self.charts.clear();
        self.dataset = Some(dataset);
        self.status = Some(StatusMessage::new(
            StatusLevel::Success,
            "File uploaded successfully!",
        ));
    }

    fn clear_dataset(&mut self) {
        self.dataset = None;
        self.profile = None;
        self.column_selection.clear();
        self.axes = None;
        self.charts.clear();
    }

    /// Status line to show: the last message, or the upload prompt.
    pub fn status_line(&self) -> StatusMessage {
        self.status
            .clone()
            .unwrap_or_else(|| StatusMessage::new(StatusLevel::Info, UPLOAD_PROMPT))
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(Dataset::numeric_columns)
            .unwrap_or_default()
    }

    /// Head of the selected columns (or of everything).
    pub fn preview(&self) -> Option<Preview> {
        let dataset = self.dataset.as_ref()?;
        Some(select::select_preview(
            dataset,
            &self.column_selection,
            self.config.preview_rows,
        ))
    }

    /// Toggle a column in the selection. Existing figures are discarded.
    pub fn toggle_column(&mut self, column: &str) {
        select::toggle_column(&mut self.column_selection, column);
        self.charts.clear();
    }

    pub fn set_x_axis(&mut self, column: &str) {
        self.set_axis(column, |axes| &mut axes.x);
    }

    pub fn set_y_axis(&mut self, column: &str) {
        self.set_axis(column, |axes| &mut axes.y);
    }

    /// Change one axis; only numeric columns are accepted. Existing
    /// figures are discarded when the selection actually changes.
    fn set_axis(&mut self, column: &str, pick: impl Fn(&mut AxisSelection) -> &mut String) {
        if !self.numeric_columns().iter().any(|c| c == column) {
            return;
        }
        let Some(axes) = self.axes.as_mut() else {
            return;
        };
        let slot = pick(axes);
        if slot.as_str() != column {
            *slot = column.to_string();
            self.charts.clear();
        }
    }

    /// Build the figure for `kind` from the current axes, replacing only
    /// that kind's previous figure.
    pub fn request_chart(&mut self, kind: ChartKind) {
        let (Some(dataset), Some(axes)) = (&self.dataset, &self.axes) else {
            return;
        };
        match build_chart(dataset, kind, axes, &self.config) {
            Ok(chart) => {
                self.charts.insert(kind, chart);
            }
            Err(e) => {
                log::error!("Failed to build {} chart: {e:#}", kind.label());
                self.status = Some(StatusMessage::new(
                    StatusLevel::Error,
                    format!("Could not draw {}: {e}", kind.label()),
                ));
            }
        }
    }
}

/// Message shown inline for a failed load; details go to the log only.
pub fn user_message(error: &LoadError) -> String {
    match error {
        LoadError::UnsupportedFormat { extension } if extension.is_empty() => {
            "Unsupported file type. Please upload a CSV or an Excel file.".to_string()
        }
        LoadError::UnsupportedFormat { extension } => {
            format!("Unsupported file type .{extension}. Please upload a CSV or an Excel file.")
        }
        LoadError::Parse { .. } | LoadError::Io { .. } => {
            "Could not read Excel/CSV file. Please check the file format.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;

    fn loaded(csv: &str) -> AppState {
        let mut state = AppState::default();
        state.apply_load(load_bytes("d.csv", csv.as_bytes()));
        state
    }

    #[test]
    fn starts_with_upload_prompt() {
        let state = AppState::default();
        assert_eq!(state.status_line().level, StatusLevel::Info);
        assert_eq!(state.status_line().text, UPLOAD_PROMPT);
        assert!(state.preview().is_none());
    }

    #[test]
    fn successful_load_resets_everything() {
        let mut state = loaded("a,b,c\n1,x,5\n2,y,6\n");
        state.toggle_column("b");
        state.request_chart(ChartKind::Line);
        assert_eq!(state.charts.len(), 1);

        state.apply_load(load_bytes("e.csv", b"c,d\n1,2\n"));
        assert!(state.column_selection.is_empty());
        assert!(state.charts.is_empty());
        assert_eq!(
            state.axes,
            Some(AxisSelection {
                x: "c".into(),
                y: "c".into()
            })
        );
        assert_eq!(state.status_line().level, StatusLevel::Success);
    }

    #[test]
    fn failed_load_discards_dataset_and_reports_error() {
        let mut state = loaded("a\n1\n");
        state.apply_load(load_bytes("d.txt", b"a\n1\n"));
        assert!(state.dataset.is_none());
        assert!(state.profile.is_none());
        let status = state.status_line();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.text.contains(".txt"));

        state.apply_load(load_bytes("broken.xlsx", b"nope"));
        assert_eq!(
            state.status_line().text,
            "Could not read Excel/CSV file. Please check the file format."
        );
    }

    #[test]
    fn no_numeric_columns_means_no_axes() {
        let mut state = loaded("b\nx\ny\n");
        assert!(state.axes.is_none());
        assert!(state.numeric_columns().is_empty());
        state.request_chart(ChartKind::Histogram);
        assert!(state.charts.is_empty());
    }

    #[test]
    fn chart_slots_are_independent() {
        let mut state = loaded("a,c\n1,5\n2,6\n3,9\n");
        state.request_chart(ChartKind::Histogram);
        state.request_chart(ChartKind::Boxplot);
        assert_eq!(state.charts.len(), 2);

        state.request_chart(ChartKind::Histogram);
        assert_eq!(state.charts.len(), 2);
        assert_eq!(state.charts[&ChartKind::Histogram].title, "Histogram of a");
    }

    #[test]
    fn axis_changes_discard_figures_and_reject_non_numeric() {
        let mut state = loaded("a,b,c\n1,x,5\n2,y,6\n");
        state.request_chart(ChartKind::Scatter);
        state.set_y_axis("b");
        assert_eq!(state.axes.as_ref().map(|a| a.y.as_str()), Some("a"));
        assert_eq!(state.charts.len(), 1);

        state.set_y_axis("c");
        assert!(state.charts.is_empty());
        state.request_chart(ChartKind::Scatter);
        assert_eq!(
            state.charts[&ChartKind::Scatter].title,
            "Scatter Graph of a vs c"
        );
    }

    #[test]
    fn preview_follows_selection() {
        let mut state = loaded("a,b\n1,x\n2,y\n3,z\n4,w\n5,v\n6,u\n");
        let all = state.preview().expect("dataset loaded");
        assert!(all.showing_all);
        assert_eq!(all.rows.len(), 5);

        state.toggle_column("b");
        let picked = state.preview().expect("dataset loaded");
        assert_eq!(picked.columns, vec!["b"]);
    }
}
