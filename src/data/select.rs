use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Column selection: which columns the user wants to look at
// ---------------------------------------------------------------------------

/// Column names in the order the user picked them.
/// An empty selection means "no restriction" (show everything).
pub type ColumnSelection = Vec<String>;

/// Toggle a column in or out of the selection. Newly picked columns go last.
pub fn toggle_column(selection: &mut ColumnSelection, column: &str) {
    if let Some(pos) = selection.iter().position(|c| c == column) {
        selection.remove(pos);
    } else {
        selection.push(column.to_string());
    }
}

/// Leading rows of the dataset restricted to a column selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub columns: Vec<String>,
    /// `rows[row][column]`
    pub rows: Vec<Vec<CellValue>>,
    /// True when the selection was empty and every column is shown.
    pub showing_all: bool,
}

/// First `n` rows of the selected columns, in selection order.
///
/// * Empty selection → all columns, `showing_all` set
/// * Names not present in the dataset are skipped
pub fn select_preview(dataset: &Dataset, selection: &ColumnSelection, n: usize) -> Preview {
    let showing_all = selection.is_empty();
    let columns: Vec<_> = if showing_all {
        dataset.columns.iter().collect()
    } else {
        selection
            .iter()
            .filter_map(|name| dataset.column(name))
            .collect()
    };

    let rows = (0..dataset.n_rows().min(n))
        .map(|row| columns.iter().map(|c| c.values[row].clone()).collect())
        .collect();

    Preview {
        columns: columns.iter().map(|c| c.name.clone()).collect(),
        rows,
        showing_all,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;
    use anyhow::Result;

    fn dataset() -> Result<Dataset> {
        Ok(load_bytes(
            "d.csv",
            b"a,b,c\n1,x,true\n2,y,false\n3,x,true\n4,z,true\n5,x,false\n6,y,true\n",
        )?)
    }

    #[test]
    fn empty_selection_shows_head_of_everything() -> Result<()> {
        let ds = dataset()?;
        let preview = select_preview(&ds, &Vec::new(), 5);
        assert!(preview.showing_all);
        assert_eq!(preview.columns, vec!["a", "b", "c"]);
        assert_eq!(preview.rows.len(), 5);
        assert_eq!(preview.rows[4][0], CellValue::Integer(5));
        Ok(())
    }

    #[test]
    fn selection_keeps_pick_order() -> Result<()> {
        let ds = dataset()?;
        let mut selection = ColumnSelection::new();
        toggle_column(&mut selection, "c");
        toggle_column(&mut selection, "a");
        let preview = select_preview(&ds, &selection, 5);
        assert!(!preview.showing_all);
        assert_eq!(preview.columns, vec!["c", "a"]);
        assert_eq!(
            preview.rows[0],
            vec![CellValue::Bool(true), CellValue::Integer(1)]
        );
        Ok(())
    }

    #[test]
    fn toggling_twice_removes_and_unknown_names_are_skipped() -> Result<()> {
        let ds = dataset()?;
        let mut selection = vec!["b".to_string(), "missing".to_string()];
        toggle_column(&mut selection, "a");
        toggle_column(&mut selection, "a");
        let preview = select_preview(&ds, &selection, 5);
        assert_eq!(preview.columns, vec!["b"]);
        Ok(())
    }

    #[test]
    fn short_dataset_returns_all_rows() -> Result<()> {
        let ds = load_bytes("s.csv", b"a\n1\n2\n")?;
        assert_eq!(select_preview(&ds, &Vec::new(), 5).rows.len(), 2);
        Ok(())
    }
}
