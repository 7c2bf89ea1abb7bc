use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::chart::ChartKind;
use crate::color::{ChartPalette, status_color};
use crate::data::loader::{ACCEPTED_EXTENSIONS, load_bytes, load_file};
use crate::data::model::Dataset;
use crate::data::profile::{Profile, StatsTable};
use crate::state::{
    AppState, NO_NUMERIC_WARNING, NO_SELECTION_NOTE, StatusLevel, StatusMessage,
};
use crate::ui::{plot, table};

/// Widget interactions collected while drawing, applied once the frame's
/// read-only pass over the state is done.
enum UiAction {
    ToggleColumn(String),
    SetX(String),
    SetY(String),
    Chart(ChartKind),
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{}: {} rows × {} columns",
                ds.source.as_deref().unwrap_or("dataset"),
                ds.n_rows(),
                ds.n_columns()
            ));
        }
    });
}

// ---------------------------------------------------------------------------
// File input: dialog and drag & drop
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload a CSV or an Excel file")
        .add_filter("Supported files", ACCEPTED_EXTENSIONS)
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx", "xls"])
        .pick_file();

    if let Some(path) = file {
        state.apply_load(load_file(&path));
    }
}

/// Load a file dropped onto the window. Only the last one counts, the
/// dashboard holds a single dataset.
pub fn handle_dropped_files(ctx: &egui::Context, state: &mut AppState) {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    let Some(file) = dropped.last() else {
        return;
    };
    let result = match (&file.bytes, &file.path) {
        (Some(bytes), _) => load_bytes(&file.name, bytes),
        (None, Some(path)) => load_file(path),
        (None, None) => return,
    };
    state.apply_load(result);
}

// ---------------------------------------------------------------------------
// Central dashboard
// ---------------------------------------------------------------------------

fn status_line(ui: &mut Ui, message: &StatusMessage) {
    ui.label(RichText::new(&message.text).color(status_color(message.level)));
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.heading(title);
}

/// Render every dashboard section top to bottom, then apply the
/// interactions made during this frame.
pub fn dashboard(ui: &mut Ui, state: &mut AppState, palette: &ChartPalette) {
    ui.heading("Analyze your data");
    ui.label("Upload a CSV or an Excel file (File → Open…, or drop it here) to explore your data interactively");
    status_line(ui, &state.status_line());
    ui.separator();

    let mut actions = Vec::new();
    {
        let view: &AppState = state;
        if let (Some(dataset), Some(profile)) = (&view.dataset, &view.profile) {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    overview_sections(ui, view, dataset, profile);
                    selection_section(ui, view, dataset, &mut actions);
                    visualization_section(ui, view, dataset, palette, &mut actions);
                });
        }
    }

    for action in actions {
        match action {
            UiAction::ToggleColumn(column) => state.toggle_column(&column),
            UiAction::SetX(column) => state.set_x_axis(&column),
            UiAction::SetY(column) => state.set_y_axis(&column),
            UiAction::Chart(kind) => state.request_chart(kind),
        }
    }
}

fn stats_or_note(ui: &mut Ui, id: &str, stats: &StatsTable) {
    if stats.is_empty() {
        ui.label(RichText::new("No columns of this kind.").italics());
    } else {
        table::stats_table(ui, id, stats);
    }
}

fn overview_sections(ui: &mut Ui, state: &AppState, dataset: &Dataset, profile: &Profile) {
    section(ui, "Preview of Data");
    table::dataset_table(ui, dataset, state.config.data_preview_height);

    section(ui, "Data Overview");
    ui.label(format!("Number of Rows: {}", profile.rows));
    ui.label(format!("Number of Columns: {}", profile.columns));
    ui.label(format!("Number of Missing Values: {}", profile.missing));
    ui.label(format!("Number of Duplicate Records: {}", profile.duplicates));

    section(ui, "Complete Summary of Dataset");
    ui.label(RichText::new(&profile.info).monospace());

    section(ui, "Numerical Features Summary");
    stats_or_note(ui, "numeric_stats", &profile.numeric_table());

    section(ui, "Statistical Summary for Non-Numerical Features");
    stats_or_note(ui, "categorical_stats", &profile.categorical_table());
}

fn selection_section(
    ui: &mut Ui,
    state: &AppState,
    dataset: &Dataset,
    actions: &mut Vec<UiAction>,
) {
    section(ui, "Select Desired Columns for Analysis");
    ui.label("Choose Columns");
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for name in dataset.column_names() {
            let mut checked = state.column_selection.contains(&name);
            if ui.checkbox(&mut checked, &name).changed() {
                actions.push(UiAction::ToggleColumn(name));
            }
        }
    });

    let Some(preview) = state.preview() else {
        return;
    };
    if preview.showing_all {
        status_line(
            ui,
            &StatusMessage {
                level: StatusLevel::Info,
                text: NO_SELECTION_NOTE.to_string(),
            },
        );
    }
    table::preview_table(ui, "selected_preview", &preview);
}

/// Returns the option the user picked this frame, if any.
fn axis_picker(ui: &mut Ui, id: &str, label: &str, current: &str, options: &[String]) -> Option<String> {
    let mut picked = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                for option in options {
                    if ui.selectable_label(option == current, option).clicked() {
                        picked = Some(option.clone());
                    }
                }
            });
    });
    picked
}

fn visualization_section(
    ui: &mut Ui,
    state: &AppState,
    dataset: &Dataset,
    palette: &ChartPalette,
    actions: &mut Vec<UiAction>,
) {
    section(ui, "Data Visualization");

    let numeric = dataset.numeric_columns();
    let Some(axes) = state.axes.as_ref().filter(|_| !numeric.is_empty()) else {
        status_line(
            ui,
            &StatusMessage {
                level: StatusLevel::Warning,
                text: NO_NUMERIC_WARNING.to_string(),
            },
        );
        return;
    };

    ui.label("Select Columns for Data Visualization");
    if let Some(x) = axis_picker(ui, "x_axis", "Choose X-axis column", &axes.x, &numeric) {
        actions.push(UiAction::SetX(x));
    }
    if let Some(y) = axis_picker(ui, "y_axis", "Choose Y-axis column", &axes.y, &numeric) {
        actions.push(UiAction::SetY(y));
    }

    egui::Grid::new("chart_buttons")
        .num_columns(2)
        .spacing([40.0, 8.0])
        .show(ui, |ui: &mut Ui| {
            for (i, kind) in ChartKind::ALL.iter().enumerate() {
                if ui.button(kind.label()).clicked() {
                    actions.push(UiAction::Chart(*kind));
                }
                if i % 2 == 1 {
                    ui.end_row();
                }
            }
        });

    for chart in state.charts.values() {
        plot::chart(ui, chart, palette, state.config.chart_aspect);
    }
}
