use std::hash::Hash;

use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Dataset;
use crate::data::profile::StatsTable;
use crate::data::select::Preview;

// ---------------------------------------------------------------------------
// Generic text table
// ---------------------------------------------------------------------------

/// Virtualised, striped table; only visible rows are laid out.
/// `cell(row, column)` yields the text of one cell.
pub fn text_table(
    ui: &mut Ui,
    id: impl Hash,
    headers: &[String],
    n_rows: usize,
    max_height: f32,
    cell: impl Fn(usize, usize) -> String,
) {
    if headers.is_empty() {
        return;
    }
    let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;

    ui.push_id(id, |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(Column::auto().at_least(60.0).clip(true), headers.len())
                .min_scrolled_height(0.0)
                .max_scroll_height(max_height)
                .header(20.0, |mut header| {
                    for name in headers {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(text_height, n_rows, |mut row| {
                        let r = row.index();
                        for c in 0..headers.len() {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell(r, c));
                            });
                        }
                    });
                });
        });
    });
}

fn with_index_header(columns: &[String]) -> Vec<String> {
    std::iter::once(String::new())
        .chain(columns.iter().cloned())
        .collect()
}

// ---------------------------------------------------------------------------
// Concrete tables
// ---------------------------------------------------------------------------

/// Every row of the dataset, prefixed with the row index.
pub fn dataset_table(ui: &mut Ui, dataset: &Dataset, max_height: f32) {
    text_table(
        ui,
        "dataset_table",
        &with_index_header(&dataset.column_names()),
        dataset.n_rows(),
        max_height,
        |row, col| match col {
            0 => row.to_string(),
            c => dataset.columns[c - 1].values[row].to_string(),
        },
    );
}

pub fn preview_table(ui: &mut Ui, id: &str, preview: &Preview) {
    text_table(
        ui,
        id,
        &with_index_header(&preview.columns),
        preview.rows.len(),
        f32::INFINITY,
        |row, col| match col {
            0 => row.to_string(),
            c => preview.rows[row][c - 1].to_string(),
        },
    );
}

/// One row per statistic, labelled in the first column.
pub fn stats_table(ui: &mut Ui, id: &str, table: &StatsTable) {
    text_table(
        ui,
        id,
        &with_index_header(&table.columns),
        table.statistics.len(),
        f32::INFINITY,
        |row, col| match col {
            0 => table.statistics[row].to_string(),
            c => table.cells[row][c - 1].clone(),
        },
    );
}
