//! Chart preparation: everything a figure needs, computed from the dataset
//! and the current axis selection. Drawing lives in [`crate::ui::plot`].

use anyhow::{Context, Result, bail};

use crate::config::DashboardConfig;
use crate::data::model::{Column, Dataset};
use crate::data::profile::{quantile, sorted_values};

// ---------------------------------------------------------------------------
// Chart kinds and axis selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartKind {
    Line,
    Scatter,
    Histogram,
    Boxplot,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Line,
        ChartKind::Scatter,
        ChartKind::Histogram,
        ChartKind::Boxplot,
    ];

    /// Button and section label.
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "Line Graph",
            ChartKind::Scatter => "Scatter Graph",
            ChartKind::Histogram => "Histogram",
            ChartKind::Boxplot => "Boxplot",
        }
    }

    /// Histogram and boxplot only look at the x column.
    pub fn uses_y(self) -> bool {
        matches!(self, ChartKind::Line | ChartKind::Scatter)
    }

    pub fn title(self, axes: &AxisSelection) -> String {
        if self.uses_y() {
            format!("{} of {} vs {}", self.label(), axes.x, axes.y)
        } else {
            format!("{} of {}", self.label(), axes.x)
        }
    }
}

/// The (x, y) pair of numeric columns the charts are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSelection {
    pub x: String,
    pub y: String,
}

impl AxisSelection {
    /// Keep each axis while it is still a numeric column, otherwise fall
    /// back to the first numeric column. `None` when there is none.
    pub fn reconcile(current: Option<&AxisSelection>, numeric: &[String]) -> Option<Self> {
        let first = numeric.first()?;
        let keep = |name: Option<&String>| {
            name.filter(|n| numeric.contains(*n))
                .unwrap_or(first)
                .clone()
        };
        Some(AxisSelection {
            x: keep(current.map(|a| &a.x)),
            y: keep(current.map(|a| &a.y)),
        })
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// `None` when there is nothing to bin.
    pub fn compute(values: &[f64], bins: usize) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return None;
        }
        let (mut lo, mut hi) = finite
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        // Scale before subtracting so ranges near f64::MAX stay finite.
        let n = bins as f64;
        let span_over_n = hi / n - lo / n;
        let mut edges: Vec<f64> = (0..=bins)
            .map(|i| lo + span_over_n * i as f64)
            .collect();
        edges[bins] = hi;

        let mut counts = vec![0usize; bins];
        for v in finite {
            let mut idx = (((v / n - lo / n) / span_over_n * n) as usize).min(bins - 1);
            // The estimate can land one bin off; settle it against the edges.
            if v < edges[idx] && idx > 0 {
                idx -= 1;
            } else if idx < bins - 1 && v >= edges[idx + 1] {
                idx += 1;
            }
            counts[idx] += 1;
        }

        Some(Histogram { edges, counts })
    }

    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if !self.counts.is_empty() => {
                let n = self.counts.len() as f64;
                hi / n - lo / n
            }
            _ => 0.0,
        }
    }

    /// Bin centres paired with their counts.
    pub fn bars(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| ((w[0] + w[1]) / 2.0, c))
    }
}

// ---------------------------------------------------------------------------
// Boxplot
// ---------------------------------------------------------------------------

/// Five-number box with whiskers at the most extreme data inside the fences.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// `None` when there are no values.
    pub fn compute(values: &[f64], whisker_factor: f64) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let lower_fence = q1 - whisker_factor * iqr;
        let upper_fence = q3 + whisker_factor * iqr;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= lower_fence)
            .unwrap_or(q1)
            .min(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= upper_fence)
            .unwrap_or(q3)
            .max(q3);

        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < lower_whisker || v > upper_whisker)
            .collect();

        Some(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

// ---------------------------------------------------------------------------
// Chart – one prepared figure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    /// Connected runs of (x, y); a missing value ends a run.
    Line(Vec<Vec<[f64; 2]>>),
    Scatter(Vec<[f64; 2]>),
    Histogram(Option<Histogram>),
    Boxplot(Option<BoxSummary>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub data: ChartData,
}

impl Chart {
    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match &self.data {
            ChartData::Line(segments) => segments.iter().all(Vec::is_empty),
            ChartData::Scatter(points) => points.is_empty(),
            ChartData::Histogram(h) => h.is_none(),
            ChartData::Boxplot(b) => b.is_none(),
        }
    }
}

fn numeric_column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Column> {
    let column = dataset
        .column(name)
        .with_context(|| format!("no column named '{name}'"))?;
    if !column.dtype.is_numeric() {
        bail!("column '{name}' is not numeric");
    }
    Ok(column)
}

fn paired_rows<'a>(x: &'a Column, y: &'a Column) -> impl Iterator<Item = Option<[f64; 2]>> + 'a {
    (0..x.len()).map(move |row| Some([x.f64_at(row)?, y.f64_at(row)?]))
}

/// Prepare one chart from the current axes. Fails only if an axis does not
/// name a numeric column of `dataset`.
pub fn build_chart(
    dataset: &Dataset,
    kind: ChartKind,
    axes: &AxisSelection,
    config: &DashboardConfig,
) -> Result<Chart> {
    let x = numeric_column(dataset, &axes.x)?;

    let (x_label, y_label, data) = match kind {
        ChartKind::Line => {
            let y = numeric_column(dataset, &axes.y)?;
            let mut segments: Vec<Vec<[f64; 2]>> = Vec::new();
            let mut current = Vec::new();
            for point in paired_rows(x, y) {
                match point {
                    Some(p) => current.push(p),
                    None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                    None => {}
                }
            }
            if !current.is_empty() {
                segments.push(current);
            }
            (axes.x.clone(), axes.y.clone(), ChartData::Line(segments))
        }
        ChartKind::Scatter => {
            let y = numeric_column(dataset, &axes.y)?;
            let points = paired_rows(x, y).flatten().collect();
            (axes.x.clone(), axes.y.clone(), ChartData::Scatter(points))
        }
        ChartKind::Histogram => {
            let histogram = Histogram::compute(&x.present_f64(), config.histogram_bins);
            (axes.x.clone(), "Count".to_string(), ChartData::Histogram(histogram))
        }
        ChartKind::Boxplot => {
            let summary = BoxSummary::compute(&sorted_values(x), config.whisker_factor);
            (String::new(), axes.x.clone(), ChartData::Boxplot(summary))
        }
    };

    log::debug!("built {:?} chart for {:?}", kind, axes);
    Ok(Chart {
        kind,
        title: kind.title(axes),
        x_label,
        y_label,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;

    fn axes(x: &str, y: &str) -> AxisSelection {
        AxisSelection {
            x: x.into(),
            y: y.into(),
        }
    }

    fn scenario() -> Result<Dataset> {
        Ok(load_bytes("s.csv", b"a,b,c\n1,x,10\n2,y,20\n3,x,\n2,x,40\n")?)
    }

    #[test]
    fn titles_name_the_axes() {
        let ax = axes("a", "c");
        assert_eq!(ChartKind::Line.title(&ax), "Line Graph of a vs c");
        assert_eq!(ChartKind::Scatter.title(&ax), "Scatter Graph of a vs c");
        assert_eq!(ChartKind::Histogram.title(&ax), "Histogram of a");
        assert_eq!(ChartKind::Boxplot.title(&ax), "Boxplot of a");
    }

    #[test]
    fn histogram_of_scenario_has_twenty_bins() -> Result<()> {
        let ds = scenario()?;
        let chart = build_chart(&ds, ChartKind::Histogram, &axes("a", "a"), &DashboardConfig::default())?;
        let ChartData::Histogram(Some(h)) = &chart.data else {
            panic!("expected a histogram, got {:?}", chart.data);
        };
        assert_eq!(h.counts.len(), 20);
        assert_eq!(h.edges.len(), 21);
        assert_eq!(h.edges[0], 1.0);
        assert_eq!(h.edges[20], 3.0);
        assert_eq!(h.counts.iter().sum::<usize>(), 4);
        assert_eq!(h.counts[0], 1);
        assert_eq!(h.counts[10], 2);
        assert_eq!(h.counts[19], 1);
        assert!((h.bin_width() - 0.1).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn histogram_excludes_missing_and_handles_constant_input() -> Result<()> {
        let ds = scenario()?;
        let chart = build_chart(&ds, ChartKind::Histogram, &axes("c", "a"), &DashboardConfig::default())?;
        let ChartData::Histogram(Some(h)) = &chart.data else {
            panic!("expected a histogram");
        };
        assert_eq!(h.counts.iter().sum::<usize>(), 3);

        let constant = Histogram::compute(&[2.0, 2.0, 2.0], 20).expect("non-empty input");
        assert_eq!(constant.edges[0], 1.5);
        assert_eq!(constant.edges[20], 2.5);
        assert_eq!(constant.counts.iter().sum::<usize>(), 3);
        assert_eq!(constant.counts, counts_from_edges(&[2.0, 2.0, 2.0], &constant.edges));
        assert!(Histogram::compute(&[], 20).is_none());
        Ok(())
    }

    /// Reference binning straight from the edges: the last edge at or
    /// below the value, with the final bin closed on the right.
    fn counts_from_edges(values: &[f64], edges: &[f64]) -> Vec<usize> {
        let bins = edges.len() - 1;
        let mut counts = vec![0; bins];
        for &v in values {
            let idx = edges[..bins].iter().rposition(|&e| e <= v).unwrap_or(0);
            counts[idx] += 1;
        }
        counts
    }

    #[test]
    fn values_on_an_edge_fall_in_the_bin_that_edge_opens() {
        let values: Vec<f64> = (0..=4).map(|i| i as f64 * 0.1).collect();
        let h = Histogram::compute(&values, 20).expect("non-empty input");
        assert_eq!(h.counts, counts_from_edges(&values, &h.edges));
        assert_eq!(h.counts.iter().sum::<usize>(), 5);

        for n in 1..200 {
            let values: Vec<f64> = (0..=n).map(|i| i as f64 * 0.1).collect();
            let h = Histogram::compute(&values, 20).expect("non-empty input");
            assert_eq!(h.counts, counts_from_edges(&values, &h.edges), "n = {n}");
        }
    }

    #[test]
    fn extreme_range_keeps_edges_finite() {
        let h = Histogram::compute(&[-1.7e308, 1.7e308], 20).expect("non-empty input");
        assert!(h.edges.iter().all(|e| e.is_finite()));
        assert!(h.edges.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(h.edges[0], -1.7e308);
        assert_eq!(h.edges[20], 1.7e308);
        assert_eq!(h.counts[0], 1);
        assert_eq!(h.counts[19], 1);
        assert_eq!(h.counts.iter().sum::<usize>(), 2);
        assert!(h.bin_width().is_finite());
    }

    #[test]
    fn line_breaks_at_missing_values_and_scatter_skips_them() -> Result<()> {
        let ds = scenario()?;
        let config = DashboardConfig::default();
        let line = build_chart(&ds, ChartKind::Line, &axes("a", "c"), &config)?;
        assert_eq!(
            line.data,
            ChartData::Line(vec![vec![[1.0, 10.0], [2.0, 20.0]], vec![[2.0, 40.0]]])
        );
        assert_eq!(line.x_label, "a");
        assert_eq!(line.y_label, "c");

        let scatter = build_chart(&ds, ChartKind::Scatter, &axes("a", "c"), &config)?;
        assert_eq!(
            scatter.data,
            ChartData::Scatter(vec![[1.0, 10.0], [2.0, 20.0], [2.0, 40.0]])
        );
        Ok(())
    }

    #[test]
    fn boxplot_whiskers_and_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = BoxSummary::compute(&values, 1.5).expect("non-empty input");
        assert_eq!(summary.median, 3.5);
        assert_eq!(summary.q1, 2.25);
        assert_eq!(summary.q3, 4.75);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 5.0);
        assert_eq!(summary.outliers, vec![100.0]);
        assert!(BoxSummary::compute(&[], 1.5).is_none());
    }

    #[test]
    fn rejects_non_numeric_axes() -> Result<()> {
        let ds = scenario()?;
        let err = build_chart(&ds, ChartKind::Boxplot, &axes("b", "a"), &DashboardConfig::default());
        assert!(err.is_err());
        Ok(())
    }

    #[test]
    fn reconcile_keeps_valid_axes_and_resets_stale_ones() {
        let numeric = vec!["a".to_string(), "c".to_string()];
        assert_eq!(AxisSelection::reconcile(None, &numeric), Some(axes("a", "a")));
        assert_eq!(
            AxisSelection::reconcile(Some(&axes("c", "gone")), &numeric),
            Some(axes("c", "a"))
        );
        assert_eq!(AxisSelection::reconcile(Some(&axes("a", "c")), &[]), None);
    }
}
