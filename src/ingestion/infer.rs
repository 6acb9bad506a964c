//! Column type inference for uploads that arrive without a schema.
//!
//! Each non-empty cell votes for the narrowest type it parses as; a column takes the
//! narrowest type every vote fits into. A column with no non-empty cells is treated as an
//! all-null numeric column ([`DataType::Float64`]).
//!
//! Blank cells and the usual spreadsheet placeholders for missing data (`NA`, `N/A`,
//! `null`, `NaN`, ...) count as empty and load as nulls.

use crate::types::DataType;

const MISSING_MARKERS: &[&str] = &["na", "n/a", "#n/a", "nan", "-nan", "null", "none"];

/// `true` for blank cells and missing-data placeholders.
pub(crate) fn is_missing(raw: &str) -> bool {
    let s = raw.trim();
    s.is_empty() || MISSING_MARKERS.iter().any(|m| s.eq_ignore_ascii_case(m))
}

/// Type a single raw cell parses as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellType {
    Empty,
    Bool,
    Int,
    Float,
    Text,
}

impl CellType {
    pub(crate) fn of_text(raw: &str) -> Self {
        let s = raw.trim();
        if is_missing(s) {
            Self::Empty
        } else if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") {
            Self::Bool
        } else if s.parse::<i64>().is_ok() {
            Self::Int
        } else if s.parse::<f64>().is_ok() {
            Self::Float
        } else {
            Self::Text
        }
    }
}

/// Accumulates cell votes for one column.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ColumnVotes {
    bools: usize,
    ints: usize,
    floats: usize,
    texts: usize,
}

impl ColumnVotes {
    pub(crate) fn add(&mut self, cell: CellType) {
        match cell {
            CellType::Empty => {}
            CellType::Bool => self.bools += 1,
            CellType::Int => self.ints += 1,
            CellType::Float => self.floats += 1,
            CellType::Text => self.texts += 1,
        }
    }

    pub(crate) fn resolve(&self) -> DataType {
        let numbers = self.ints + self.floats;
        if self.texts > 0 || (self.bools > 0 && numbers > 0) {
            DataType::Utf8
        } else if self.bools > 0 {
            DataType::Bool
        } else if self.floats > 0 || self.ints == 0 {
            DataType::Float64
        } else {
            DataType::Int64
        }
    }
}

/// Column name for a header cell; blank headers get a positional name.
pub(crate) fn header_name(raw: &str, idx: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("column_{}", idx + 1)
    } else {
        trimmed.to_owned()
    }
}

/// Infer one [`DataType`] per column from string cells.
///
/// `rows` may be ragged; missing cells count as empty.
pub fn infer_column_types<'a, R, I>(column_count: usize, rows: R) -> Vec<DataType>
where
    R: IntoIterator<Item = I>,
    I: IntoIterator<Item = &'a str>,
{
    let mut votes = vec![ColumnVotes::default(); column_count];
    for row in rows {
        for (vote, raw) in votes.iter_mut().zip(row) {
            vote.add(CellType::of_text(raw));
        }
    }
    votes.iter().map(ColumnVotes::resolve).collect()
}

#[cfg(test)]
mod tests {
    use super::{header_name, infer_column_types, CellType};
    use crate::types::DataType;

    #[test]
    fn cell_types() {
        assert_eq!(CellType::of_text("  "), CellType::Empty);
        assert_eq!(CellType::of_text("N/A"), CellType::Empty);
        assert_eq!(CellType::of_text("NaN"), CellType::Empty);
        assert_eq!(CellType::of_text("TRUE"), CellType::Bool);
        assert_eq!(CellType::of_text("42"), CellType::Int);
        assert_eq!(CellType::of_text("-4.5"), CellType::Float);
        assert_eq!(CellType::of_text("Ada"), CellType::Text);
    }

    #[test]
    fn columns_widen_to_the_narrowest_common_type() {
        let rows = vec![
            vec!["1", "1", "true", "Ada", ""],
            vec!["2", "2.5", "false", "7", ""],
            vec!["", "3", "", "Grace", ""],
        ];
        let types = infer_column_types(5, rows);
        assert_eq!(
            types,
            vec![
                DataType::Int64,
                DataType::Float64,
                DataType::Bool,
                DataType::Utf8,
                DataType::Float64,
            ]
        );
    }

    #[test]
    fn blank_headers_get_positional_names() {
        assert_eq!(header_name(" score ", 0), "score");
        assert_eq!(header_name("", 2), "column_3");
    }

    #[test]
    fn placeholders_do_not_turn_numbers_into_text() {
        let types = infer_column_types(1, vec![vec!["10"], vec!["n/a"], vec!["5"]]);
        assert_eq!(types, vec![DataType::Int64]);
    }

    #[test]
    fn bools_mixed_with_numbers_become_text() {
        let types = infer_column_types(1, vec![vec!["true"], vec!["1"]]);
        assert_eq!(types, vec![DataType::Utf8]);
    }
}
