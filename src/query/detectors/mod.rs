//! The ordered detector table.
//!
//! Each [`Detector`] pairs a cheap keyword predicate with an executor that extracts
//! parameters, computes over the dataset and builds the answer. An executor returning
//! `Ok(None)` means the parameters could not be extracted and the cascade moves on.

mod aggregate;
mod count;
mod filter;
mod help;

use crate::error::QueryResult;
use crate::types::DataSet;

use super::columns::ColumnClasses;
use super::response::{QueryResponse, RowPreview};
use super::text::QueryText;
use super::InterpreterOptions;

pub(crate) use help::help;

/// Everything an executor may read while answering one question.
pub(crate) struct Ctx<'a> {
    pub text: &'a QueryText,
    pub dataset: &'a DataSet,
    pub classes: &'a ColumnClasses,
    pub options: &'a InterpreterOptions,
}

impl Ctx<'_> {
    pub fn column_name(&self, idx: usize) -> &str {
        &self.dataset.schema.fields[idx].name
    }

    /// Full-row previews of the first matching rows.
    pub fn preview_rows(&self, rows: &[usize]) -> Vec<RowPreview> {
        rows.iter()
            .take(self.options.max_preview_rows)
            .map(|&row| RowPreview::from_row(self.dataset, row))
            .collect()
    }
}

/// One entry of the cascade.
pub(crate) struct Detector {
    pub name: &'static str,
    pub applies: fn(&QueryText) -> bool,
    pub run: for<'a> fn(&Ctx<'a>) -> QueryResult<Option<QueryResponse>>,
}

/// Detectors in priority order; the first one that answers wins.
///
/// Help is not listed: it answers whenever every entry here declines.
pub(crate) const DETECTORS: &[Detector] = &[
    Detector {
        name: "row_count",
        applies: count::mentions_row_count,
        run: count::row_count,
    },
    Detector {
        name: "conditional_filter",
        applies: filter::mentions_where,
        run: filter::conditional_filter,
    },
    Detector {
        name: "prefix_filter",
        applies: filter::mentions_prefix,
        run: filter::prefix_filter,
    },
    Detector {
        name: "substring_filter",
        applies: filter::mentions_substring,
        run: filter::substring_filter,
    },
    Detector {
        name: "sum",
        applies: aggregate::mentions_sum,
        run: aggregate::sum,
    },
    Detector {
        name: "average",
        applies: aggregate::mentions_average,
        run: aggregate::average,
    },
    Detector {
        name: "max",
        applies: aggregate::mentions_max,
        run: aggregate::max,
    },
    Detector {
        name: "min",
        applies: aggregate::mentions_min,
        run: aggregate::min,
    },
    Detector {
        name: "count_value",
        applies: count::mentions_count,
        run: count::count_value,
    },
];

/// Name reported for answers produced by the help fallback.
pub(crate) const HELP: &str = "help";

/// Detector names in the order they are tried, ending with the help fallback.
pub fn detector_order() -> Vec<&'static str> {
    DETECTORS
        .iter()
        .map(|d| d.name)
        .chain(std::iter::once(HELP))
        .collect()
}

/// "1 row" / "3 rows".
pub(crate) fn rows_phrase(n: usize) -> String {
    if n == 1 {
        "1 row".to_string()
    } else {
        format!("{n} rows")
    }
}

#[cfg(test)]
mod tests {
    use super::{detector_order, rows_phrase};

    #[test]
    fn order_is_fixed() {
        assert_eq!(
            detector_order(),
            vec![
                "row_count",
                "conditional_filter",
                "prefix_filter",
                "substring_filter",
                "sum",
                "average",
                "max",
                "min",
                "count_value",
                "help",
            ]
        );
    }

    #[test]
    fn rows_phrase_pluralizes() {
        assert_eq!(rows_phrase(1), "1 row");
        assert_eq!(rows_phrase(0), "0 rows");
    }
}
