use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write as _;

use super::model::{CellValue, Column, Dataset};

// ---------------------------------------------------------------------------
// Quantiles
// ---------------------------------------------------------------------------

/// Quantile `q` (0..=1) of an ascending slice, linear interpolation between
/// the closest ranks. NaN for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let idx = (sorted.len() - 1) as f64 * q;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    if lower == upper || upper >= sorted.len() {
        sorted[lower]
    } else {
        let fraction = idx - lower as f64;
        sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
    }
}

/// Present values of a numeric column, ascending.
pub fn sorted_values(column: &Column) -> Vec<f64> {
    let mut values = column.present_f64();
    values.sort_by(f64::total_cmp);
    values
}

// ---------------------------------------------------------------------------
// Per-column summaries
// ---------------------------------------------------------------------------

/// `count, mean, std, min, 25%, 50%, 75%, max` of one numeric column.
/// Undefined statistics are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericSummary {
    pub fn of(column: &Column) -> Self {
        let sorted = sorted_values(column);
        let count = sorted.len();
        let mean = if count == 0 {
            f64::NAN
        } else {
            sorted.iter().sum::<f64>() / count as f64
        };
        let std = if count < 2 {
            f64::NAN
        } else {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        };
        NumericSummary {
            column: column.name.clone(),
            count,
            mean,
            std,
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }
}

/// `count, unique, top, freq` of one bool/text column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    /// Most frequent present value; ties go to the value seen first.
    pub top: Option<CellValue>,
    pub freq: Option<usize>,
}

impl CategoricalSummary {
    pub fn of(column: &Column) -> Self {
        // value → (occurrences, first row)
        let mut counts: HashMap<&CellValue, (usize, usize)> = HashMap::new();
        for (row, value) in column.values.iter().enumerate() {
            if value.is_null() {
                continue;
            }
            counts.entry(value).or_insert((0, row)).0 += 1;
        }

        let best = counts
            .iter()
            .max_by(|(_, (ca, fa)), (_, (cb, fb))| ca.cmp(cb).then(fb.cmp(fa)))
            .map(|(value, (count, _))| ((*value).clone(), *count));

        CategoricalSummary {
            column: column.name.clone(),
            count: column.non_null_count(),
            unique: counts.len(),
            top: best.as_ref().map(|(v, _)| v.clone()),
            freq: best.map(|(_, c)| c),
        }
    }
}

// ---------------------------------------------------------------------------
// StatsTable – display form of a group of summaries
// ---------------------------------------------------------------------------

/// One row per statistic, one column per dataset field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsTable {
    pub statistics: Vec<&'static str>,
    pub columns: Vec<String>,
    /// `cells[statistic][column]`
    pub cells: Vec<Vec<String>>,
}

impl StatsTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Cell text for a statistic/column pair.
    pub fn get(&self, statistic: &str, column: &str) -> Option<&str> {
        let row = self.statistics.iter().position(|s| *s == statistic)?;
        let col = self.columns.iter().position(|c| c == column)?;
        self.cells.get(row)?.get(col).map(String::as_str)
    }
}

fn format_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.6}")
    }
}

fn build_table<T>(
    statistics: &[&'static str],
    summaries: &[T],
    name: impl Fn(&T) -> String,
    cell: impl Fn(&T, usize) -> String,
) -> StatsTable {
    if summaries.is_empty() {
        return StatsTable::default();
    }
    StatsTable {
        statistics: statistics.to_vec(),
        columns: summaries.iter().map(&name).collect(),
        cells: (0..statistics.len())
            .map(|row| summaries.iter().map(|s| cell(s, row)).collect())
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Profile – everything the overview sections show
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Profile {
    pub rows: usize,
    pub columns: usize,
    /// Number of absent cells over the whole dataset.
    pub missing: usize,
    /// Rows identical to an earlier row.
    pub duplicates: usize,
    /// Structural summary text block.
    pub info: String,
    pub numeric: Vec<NumericSummary>,
    pub categorical: Vec<CategoricalSummary>,
}

impl Profile {
    /// Compute the profile from scratch; nothing is cached between calls.
    pub fn of(dataset: &Dataset) -> Self {
        let missing = dataset
            .columns
            .iter()
            .map(|c| c.len() - c.non_null_count())
            .sum();

        let (numeric_cols, other_cols): (Vec<&Column>, Vec<&Column>) =
            dataset.columns.iter().partition(|c| c.dtype.is_numeric());

        Profile {
            rows: dataset.n_rows(),
            columns: dataset.n_columns(),
            missing,
            duplicates: count_duplicates(dataset),
            info: info_block(dataset),
            numeric: numeric_cols.into_iter().map(NumericSummary::of).collect(),
            categorical: other_cols.into_iter().map(CategoricalSummary::of).collect(),
        }
    }

    pub fn numeric_table(&self) -> StatsTable {
        build_table(
            &["count", "mean", "std", "min", "25%", "50%", "75%", "max"],
            &self.numeric,
            |s| s.column.clone(),
            |s, row| match row {
                0 => s.count.to_string(),
                1 => format_stat(s.mean),
                2 => format_stat(s.std),
                3 => format_stat(s.min),
                4 => format_stat(s.q25),
                5 => format_stat(s.median),
                6 => format_stat(s.q75),
                _ => format_stat(s.max),
            },
        )
    }

    pub fn categorical_table(&self) -> StatsTable {
        build_table(
            &["count", "unique", "top", "freq"],
            &self.categorical,
            |s| s.column.clone(),
            |s, row| match row {
                0 => s.count.to_string(),
                1 => s.unique.to_string(),
                2 => s.top.as_ref().map_or_else(|| "NaN".to_string(), |v| v.to_string()),
                _ => s.freq.map_or_else(|| "NaN".to_string(), |f| f.to_string()),
            },
        )
    }
}

/// Rows whose cells exactly match some earlier row.
pub fn count_duplicates(dataset: &Dataset) -> usize {
    let mut seen: HashSet<Vec<&CellValue>> = HashSet::with_capacity(dataset.n_rows());
    (0..dataset.n_rows())
        .filter(|&row| !seen.insert(dataset.row(row)))
        .count()
}

/// Dataframe-style structural summary: entries, one line per column with
/// its non-null count and dtype, and a dtype tally.
fn info_block(dataset: &Dataset) -> String {
    let rows = dataset.n_rows();
    let mut out = String::new();

    if rows == 0 {
        let _ = writeln!(out, "RangeIndex: 0 entries");
    } else {
        let _ = writeln!(out, "RangeIndex: {rows} entries, 0 to {}", rows - 1);
    }
    let _ = writeln!(out, "Data columns (total {} columns):", dataset.n_columns());

    let idx_w = dataset.n_columns().saturating_sub(1).to_string().len().max(3);
    let name_w = dataset
        .columns
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Column".len());
    let count_w = "Non-Null Count".len();

    let _ = writeln!(
        out,
        " {:<idx_w$} {:<name_w$}  {:<count_w$}  Dtype",
        "#", "Column", "Non-Null Count"
    );
    let _ = writeln!(
        out,
        " {:<idx_w$} {:<name_w$}  {:<count_w$}  -----",
        "-".repeat(3),
        "-".repeat(6),
        "-".repeat(count_w)
    );

    let mut tally: BTreeMap<&'static str, usize> = BTreeMap::new();
    for (i, column) in dataset.columns.iter().enumerate() {
        let non_null = format!("{} non-null", column.non_null_count());
        let _ = writeln!(
            out,
            " {:<idx_w$} {:<name_w$}  {:<count_w$}  {}",
            i, column.name, non_null, column.dtype
        );
        *tally.entry(column.dtype.name()).or_default() += 1;
    }

    let dtypes: Vec<String> = tally.iter().map(|(t, n)| format!("{t}({n})")).collect();
    let _ = write!(out, "dtypes: {}", dtypes.join(", "));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;
    use anyhow::Result;

    fn scenario() -> Result<Dataset> {
        Ok(load_bytes("s.csv", b"a,b\n1,x\n2,y\n3,x\n2,x\n")?)
    }

    #[test]
    fn scenario_profile() -> Result<()> {
        let profile = Profile::of(&scenario()?);
        assert_eq!(profile.rows, 4);
        assert_eq!(profile.columns, 2);
        assert_eq!(profile.missing, 0);
        assert_eq!(profile.duplicates, 0);

        let numeric = profile.numeric_table();
        assert_eq!(numeric.columns, vec!["a"]);
        assert_eq!(numeric.get("count", "a"), Some("4"));
        assert_eq!(numeric.get("mean", "a"), Some("2.000000"));
        assert_eq!(numeric.get("50%", "a"), Some("2.000000"));
        assert_eq!(numeric.get("25%", "a"), Some("1.750000"));
        assert_eq!(numeric.get("75%", "a"), Some("2.250000"));

        let categorical = profile.categorical_table();
        assert_eq!(categorical.columns, vec!["b"]);
        assert_eq!(categorical.get("unique", "b"), Some("2"));
        assert_eq!(categorical.get("top", "b"), Some("x"));
        assert_eq!(categorical.get("freq", "b"), Some("3"));
        Ok(())
    }

    #[test]
    fn counts_missing_and_duplicates() -> Result<()> {
        let ds = load_bytes("d.csv", b"a,b\n1,x\n1,x\n,x\n1,\n1,x\n")?;
        let profile = Profile::of(&ds);
        assert_eq!(profile.missing, 2);
        assert_eq!(profile.duplicates, 2);
        Ok(())
    }

    #[test]
    fn unlisted_nan_spelling_counts_as_missing() -> Result<()> {
        let profile = Profile::of(&load_bytes("n.csv", b"a\n1.5\nNAN\nInf\n")?);
        assert_eq!(profile.missing, 1);
        assert_eq!(profile.numeric_table().get("count", "a"), Some("2"));
        assert_eq!(profile.numeric[0].min, 1.5);
        Ok(())
    }

    #[test]
    fn missing_rows_compare_equal_for_duplicates() -> Result<()> {
        let ds = load_bytes("n.csv", b"a,b\n,\nNA,null\n")?;
        assert_eq!(count_duplicates(&ds), 1);
        Ok(())
    }

    #[test]
    fn empty_subsets_give_empty_tables() -> Result<()> {
        let text_only = Profile::of(&load_bytes("t.csv", b"b\nx\n")?);
        assert!(text_only.numeric_table().is_empty());
        assert!(!text_only.categorical_table().is_empty());

        let numbers_only = Profile::of(&load_bytes("n.csv", b"a\n1\n")?);
        assert!(numbers_only.categorical_table().is_empty());
        Ok(())
    }

    #[test]
    fn single_value_std_is_nan() -> Result<()> {
        let profile = Profile::of(&load_bytes("one.csv", b"a\n5\n")?);
        assert!(profile.numeric[0].std.is_nan());
        assert_eq!(profile.numeric_table().get("std", "a"), Some("NaN"));
        assert_eq!(profile.numeric[0].min, 5.0);
        Ok(())
    }

    #[test]
    fn top_ties_go_to_first_seen_value() -> Result<()> {
        let ds = load_bytes("t.csv", b"b\ny\nx\nx\ny\n")?;
        let summary = CategoricalSummary::of(&ds.columns[0]);
        assert_eq!(summary.top, Some(CellValue::Text("y".into())));
        assert_eq!(summary.freq, Some(2));
        Ok(())
    }

    #[test]
    fn info_block_lists_every_column() -> Result<()> {
        let info = Profile::of(&scenario()?).info;
        assert!(info.contains("RangeIndex: 4 entries, 0 to 3"));
        assert!(info.contains("Data columns (total 2 columns):"));
        assert!(info.lines().any(|l| l.contains(" a ") && l.contains("4 non-null") && l.ends_with("int64")));
        assert!(info.lines().any(|l| l.contains("4 non-null") && l.ends_with("object")));
        assert!(info.ends_with("dtypes: int64(1), object(1)"));
        Ok(())
    }

    #[test]
    fn quantile_interpolates() {
        assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0], 0.5), 2.5);
        assert_eq!(quantile(&[7.0], 0.25), 7.0);
        assert!(quantile(&[], 0.5).is_nan());
    }
}
