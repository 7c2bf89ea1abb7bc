use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the dataset
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common dataframe dtypes.
/// Duplicate detection and frequency counts key on whole cells, so
/// `CellValue` must be `Eq + Ord + Hash` (floats compare by bit pattern).
#[derive(Debug, Clone)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

// -- Manual Eq/Ord/Hash so we can put CellValue in sets and maps --

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // Integral floats keep a trailing ".0" so they read as floats.
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for statistics and plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ColumnType – inferred dtype of a column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnType {
    Integer,
    Float,
    Bool,
    Text,
}

impl ColumnType {
    /// Dataframe-style dtype name shown in the structural summary.
    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Integer => "int64",
            ColumnType::Float => "float64",
            ColumnType::Bool => "bool",
            ColumnType::Text => "object",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Missing-value markers and scalar parsing
// ---------------------------------------------------------------------------

/// Cell texts read as "value absent".
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing_marker(s: &str) -> bool {
    MISSING_MARKERS.contains(&s)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Column – one named, typed column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    /// One value per row.
    pub values: Vec<CellValue>,
}

impl Column {
    /// Infer a column from raw cell texts (CSV input).
    ///
    /// Integers with any missing cell are promoted to floats; text columns
    /// keep the original cell text untouched.
    pub fn from_text(name: String, raw: Vec<String>) -> Self {
        let present: Vec<&str> = raw
            .iter()
            .map(String::as_str)
            .filter(|s| !is_missing_marker(s))
            .collect();
        let has_missing = present.len() < raw.len();

        let dtype = if present.is_empty() {
            ColumnType::Float
        } else if present.iter().all(|s| s.trim().parse::<i64>().is_ok()) {
            if has_missing {
                ColumnType::Float
            } else {
                ColumnType::Integer
            }
        } else if present.iter().all(|s| s.trim().parse::<f64>().is_ok()) {
            ColumnType::Float
        } else if present.iter().all(|s| parse_bool(s).is_some()) {
            ColumnType::Bool
        } else {
            ColumnType::Text
        };

        let values = raw
            .into_iter()
            .map(|s| {
                if is_missing_marker(&s) {
                    return CellValue::Null;
                }
                match dtype {
                    ColumnType::Integer => s
                        .trim()
                        .parse::<i64>()
                        .map_or(CellValue::Null, CellValue::Integer),
                    // "NAN", "nAn" and friends parse but are still missing.
                    ColumnType::Float => s
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|f| !f.is_nan())
                        .map_or(CellValue::Null, CellValue::Float),
                    ColumnType::Bool => parse_bool(&s).map_or(CellValue::Null, CellValue::Bool),
                    ColumnType::Text => CellValue::Text(s),
                }
            })
            .collect();

        Column {
            name,
            dtype,
            values,
        }
    }

    /// Infer a column from already-typed cells (spreadsheet input).
    ///
    /// Mixed columns fall back to text, with every present cell rendered
    /// through its `Display` form.
    pub fn from_cells(name: String, cells: Vec<CellValue>) -> Self {
        let present = || cells.iter().filter(|c| !c.is_null());
        let has_missing = cells.iter().any(CellValue::is_null);

        let dtype = if present().next().is_none() {
            ColumnType::Float
        } else if present().all(|c| matches!(c, CellValue::Integer(_))) {
            if has_missing {
                ColumnType::Float
            } else {
                ColumnType::Integer
            }
        } else if present().all(|c| c.as_f64().is_some()) {
            ColumnType::Float
        } else if present().all(|c| matches!(c, CellValue::Bool(_))) {
            ColumnType::Bool
        } else {
            ColumnType::Text
        };

        let values = cells
            .into_iter()
            .map(|c| match (dtype, c) {
                (_, CellValue::Null) => CellValue::Null,
                (ColumnType::Float, CellValue::Integer(i)) => CellValue::Float(i as f64),
                (ColumnType::Text, c @ CellValue::Text(_)) => c,
                (ColumnType::Text, c) => CellValue::Text(c.to_string()),
                (_, c) => c,
            })
            .collect();

        Column {
            name,
            dtype,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn non_null_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_null()).count()
    }

    /// Numeric value at `row`, `None` when missing or non-numeric.
    pub fn f64_at(&self, row: usize) -> Option<f64> {
        self.values.get(row).and_then(CellValue::as_f64)
    }

    /// All present numeric values in row order.
    pub fn present_f64(&self) -> Vec<f64> {
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table, column-major.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// File name the dataset was loaded from, if any.
    pub source: Option<String>,
    /// Ordered columns; every column has exactly `rows` values.
    pub columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Build a dataset from equally long columns.
    pub fn new(source: Option<String>, columns: Vec<Column>) -> Self {
        let rows = columns.first().map_or(0, Column::len);
        debug_assert!(columns.iter().all(|c| c.len() == rows));
        Dataset {
            source,
            columns,
            rows,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Names of the integer/float columns, in dataset order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.dtype.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }

    /// Cells of one row across all columns.
    pub fn row(&self, index: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.values[index]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn infers_integer_column() {
        let col = Column::from_text("a".into(), text(&["1", "2", " 3"]));
        assert_eq!(col.dtype, ColumnType::Integer);
        assert_eq!(col.values[2], CellValue::Integer(3));
    }

    #[test]
    fn integer_column_with_missing_becomes_float() {
        let col = Column::from_text("a".into(), text(&["1", "", "3"]));
        assert_eq!(col.dtype, ColumnType::Float);
        assert_eq!(col.values[0], CellValue::Float(1.0));
        assert!(col.values[1].is_null());
        assert_eq!(col.non_null_count(), 2);
    }

    #[test]
    fn mixed_column_keeps_original_text() {
        let col = Column::from_text("b".into(), text(&["1.50", "x", "NA"]));
        assert_eq!(col.dtype, ColumnType::Text);
        assert_eq!(col.values[0], CellValue::Text("1.50".into()));
        assert!(col.values[2].is_null());
    }

    #[test]
    fn bool_and_all_missing_columns() {
        let col = Column::from_text("flag".into(), text(&["True", "false", "TRUE"]));
        assert_eq!(col.dtype, ColumnType::Bool);
        assert_eq!(col.values[1], CellValue::Bool(false));

        let empty = Column::from_text("e".into(), text(&["", "nan"]));
        assert_eq!(empty.dtype, ColumnType::Float);
        assert_eq!(empty.non_null_count(), 0);
        assert!(!empty.is_empty());
        assert!(Column::from_text("z".into(), Vec::new()).is_empty());
    }

    #[test]
    fn nan_spellings_outside_the_marker_list_are_missing() {
        let col = Column::from_text("a".into(), text(&["1.5", "NAN", "Inf", "nAn"]));
        assert_eq!(col.dtype, ColumnType::Float);
        assert!(col.values[1].is_null());
        assert!(col.values[3].is_null());
        assert_eq!(col.values[2], CellValue::Float(f64::INFINITY));
        assert_eq!(col.non_null_count(), 2);
        assert_eq!(col.present_f64(), vec![1.5, f64::INFINITY]);
    }

    #[test]
    fn typed_cells_promote_and_fall_back() {
        let ints = Column::from_cells(
            "n".into(),
            vec![CellValue::Integer(1), CellValue::Float(2.5)],
        );
        assert_eq!(ints.dtype, ColumnType::Float);
        assert_eq!(ints.values[0], CellValue::Float(1.0));

        let mixed = Column::from_cells(
            "m".into(),
            vec![CellValue::Integer(7), CellValue::Text("x".into()), CellValue::Null],
        );
        assert_eq!(mixed.dtype, ColumnType::Text);
        assert_eq!(mixed.values[0], CellValue::Text("7".into()));
        assert!(mixed.values[2].is_null());
    }

    #[test]
    fn numeric_columns_follow_dataset_order() {
        let ds = Dataset::new(
            None,
            vec![
                Column::from_text("t".into(), text(&["x"])),
                Column::from_text("f".into(), text(&["1.5"])),
                Column::from_text("i".into(), text(&["4"])),
            ],
        );
        assert_eq!(ds.numeric_columns(), vec!["f".to_string(), "i".to_string()]);
        assert_eq!(ds.n_rows(), 1);
        assert_eq!(ds.n_columns(), 3);
    }

    #[test]
    fn float_cells_hash_and_compare_by_bits() {
        assert_eq!(CellValue::Float(f64::NAN), CellValue::Float(f64::NAN));
        assert_ne!(CellValue::Integer(1), CellValue::Float(1.0));
        assert_eq!(CellValue::Float(3.0).to_string(), "3.0");
    }
}
