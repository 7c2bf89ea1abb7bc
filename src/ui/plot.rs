use eframe::egui::{RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Line, MarkerShape, Plot, Points};

use crate::chart::{Chart, ChartData};
use crate::color::ChartPalette;

// ---------------------------------------------------------------------------
// Static chart figure
// ---------------------------------------------------------------------------

/// Render one prepared chart as a fixed figure (no pan, zoom or drag).
pub fn chart(ui: &mut Ui, chart: &Chart, palette: &ChartPalette, aspect: f32) {
    ui.add_space(8.0);
    ui.strong(chart.kind.label());
    ui.label(RichText::new(&chart.title).heading());

    if chart.is_empty() {
        ui.label("No data to plot");
        return;
    }

    let color = palette.color_for(chart.kind);
    let edge = Stroke::new(1.0, palette.edge);

    Plot::new(("chart", chart.kind))
        .view_aspect(aspect)
        .x_axis_label(chart.x_label.clone())
        .y_axis_label(chart.y_label.clone())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| match &chart.data {
            ChartData::Line(segments) => {
                for segment in segments {
                    plot_ui.line(Line::new(segment.clone()).color(color).width(1.5));
                }
            }
            ChartData::Scatter(points) => {
                plot_ui.points(
                    Points::new(points.clone())
                        .color(color)
                        .radius(3.0)
                        .shape(MarkerShape::Circle),
                );
            }
            ChartData::Histogram(Some(histogram)) => {
                let width = histogram.bin_width();
                let bars: Vec<Bar> = histogram
                    .bars()
                    .map(|(center, count)| {
                        Bar::new(center, count as f64)
                            .width(width)
                            .fill(color)
                            .stroke(edge)
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars));
            }
            ChartData::Boxplot(Some(summary)) => {
                let spread = BoxSpread::new(
                    summary.lower_whisker,
                    summary.q1,
                    summary.median,
                    summary.q3,
                    summary.upper_whisker,
                );
                plot_ui.box_plot(BoxPlot::new(vec![
                    BoxElem::new(1.0, spread)
                        .box_width(0.5)
                        .whisker_width(0.25)
                        .fill(color.linear_multiply(0.4))
                        .stroke(Stroke::new(1.5, palette.edge)),
                ]));
                if !summary.outliers.is_empty() {
                    let outliers: Vec<[f64; 2]> =
                        summary.outliers.iter().map(|&v| [1.0, v]).collect();
                    plot_ui.points(
                        Points::new(outliers)
                            .color(palette.edge)
                            .radius(3.0)
                            .shape(MarkerShape::Circle),
                    );
                }
            }
            ChartData::Histogram(None) | ChartData::Boxplot(None) => {}
        });
}
