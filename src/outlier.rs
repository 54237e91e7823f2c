//! Outlier filtering on a numeric column.

use serde_derive::Serialize;

use crate::error::Result;
use crate::stats::univariate::outliers::tukey::{self, Fences, LabelCounts};
use crate::stats::univariate::Sample;
use crate::table::Table;

/// The records of a table that lie within Tukey's fences of one column
#[derive(Debug)]
pub struct Filtered {
    /// The retained records
    pub table: Table,
    /// Summary of what the filter did
    pub outcome: Outcome,
}

/// What the outlier filter computed and removed
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Outcome {
    /// The filtered column
    pub column: String,
    /// Quartiles and fences of the column before filtering
    pub fences: Fences<f64>,
    /// Classification of the values before filtering
    pub counts: LabelCounts,
    /// Records before filtering
    pub before: usize,
    /// Records after filtering
    pub after: usize,
}

impl Outcome {
    /// Number of records removed
    pub fn removed(&self) -> usize {
        self.before - self.after
    }
}

/// Keeps the records whose `column` value lies in the closed `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]`
/// interval
///
/// Quartiles use linear interpolation over the present values of the column. Records with a
/// missing value in `column` are dropped. If the interquartile range is zero, only the records
/// equal to `Q1 == Q3` are kept. An empty column yields `NaN` fences and an empty table.
pub fn filter(table: &Table, column: &str) -> Result<Filtered> {
    let cells = table.numeric(column)?;
    let values: Vec<f64> = cells.iter().filter_map(|&x| x).collect();

    let (fences, counts) = match Sample::new(&values) {
        Some(sample) => {
            let labeled = tukey::classify(sample);
            (labeled.fences(), labeled.count())
        }
        None => (Fences::undefined(), LabelCounts::default()),
    };

    if fences.is_degenerate() {
        warn!(
            "The interquartile range of {:?} is zero; only records equal to {} are kept",
            column, fences.q1
        );
    }

    let mask: Vec<bool> = cells
        .iter()
        .map(|cell| cell.map_or(false, |x| fences.contains(x)))
        .collect();
    let filtered = table.select_rows(&mask);

    info!(
        "Fences of {:?}: [{}, {}], kept {} of {} records",
        column,
        fences.lower,
        fences.upper,
        filtered.len(),
        table.len()
    );

    Ok(Filtered {
        outcome: Outcome {
            column: column.to_owned(),
            fences,
            counts,
            before: table.len(),
            after: filtered.len(),
        },
        table: filtered,
    })
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use quickcheck::{quickcheck, TestResult};

    use super::filter;
    use crate::error::Error;
    use crate::table::{Column, Table};

    fn scores(values: &[f64]) -> Table {
        Table::from_columns(vec![(
            "NU_NOTA_CH",
            Column::Numeric(values.iter().map(|&x| Some(x)).collect()),
        )])
    }

    #[test]
    fn removes_the_extreme_score() {
        let table = scores(&[10.0, 12.0, 14.0, 15.0, 18.0, 20.0, 21.0, 100.0]);
        let filtered = filter(&table, "NU_NOTA_CH").unwrap();
        let fences = filtered.outcome.fences;

        assert_relative_eq!(fences.q1, 13.5);
        assert_relative_eq!(fences.q3, 20.25);
        assert_relative_eq!(fences.iqr, 6.75);
        assert_relative_eq!(fences.lower, 3.375);
        assert_relative_eq!(fences.upper, 30.375);
        assert_eq!(
            filtered.table.numeric("NU_NOTA_CH").unwrap(),
            &[
                Some(10.0),
                Some(12.0),
                Some(14.0),
                Some(15.0),
                Some(18.0),
                Some(20.0),
                Some(21.0)
            ]
        );
        assert_eq!(filtered.outcome.removed(), 1);
    }

    #[test]
    fn record_order_does_not_change_the_result() {
        let a = scores(&[100.0, 21.0, 10.0, 18.0, 12.0, 20.0, 15.0, 14.0]);
        let b = scores(&[10.0, 12.0, 14.0, 15.0, 18.0, 20.0, 21.0, 100.0]);

        let fa = filter(&a, "NU_NOTA_CH").unwrap().outcome;
        let fb = filter(&b, "NU_NOTA_CH").unwrap().outcome;

        assert_eq!(fa.fences, fb.fences);
        assert_eq!(fa.after, fb.after);
    }

    #[test]
    fn zero_iqr_keeps_only_the_mode() {
        let table = scores(&[500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 480.0, 510.0]);
        let filtered = filter(&table, "NU_NOTA_CH").unwrap();

        assert!(filtered.outcome.fences.is_degenerate());
        assert_eq!(filtered.table.len(), 6);
    }

    #[test]
    fn empty_table() {
        let filtered = filter(&scores(&[]), "NU_NOTA_CH").unwrap();

        assert!(filtered.table.is_empty());
        assert!(filtered.outcome.fences.lower.is_nan());
        assert_eq!(filtered.outcome.removed(), 0);
    }

    #[test]
    fn missing_scores_are_dropped() {
        let table = Table::from_columns(vec![(
            "NU_NOTA_CH",
            Column::Numeric(vec![Some(1.0), None, Some(2.0), Some(3.0)]),
        )]);

        assert_eq!(filter(&table, "NU_NOTA_CH").unwrap().table.len(), 3);
    }

    #[test]
    fn text_column_is_rejected() {
        let table = Table::from_columns(vec![("x", Column::Text(vec![Some("1".to_owned())]))]);

        assert!(matches!(
            filter(&table, "x"),
            Err(Error::ColumnType { .. })
        ));
    }

    quickcheck! {
        fn filter_narrows_monotonically(values: Vec<u16>) -> TestResult {
            if values.is_empty() {
                return TestResult::discard();
            }
            let values: Vec<f64> = values.into_iter().map(f64::from).collect();
            let table = scores(&values);
            let filtered = filter(&table, "NU_NOTA_CH").unwrap();
            let fences = filtered.outcome.fences;

            TestResult::from_bool(
                filtered.table.len() <= table.len()
                    && filtered
                        .table
                        .numeric("NU_NOTA_CH")
                        .unwrap()
                        .iter()
                        .all(|x| x.map_or(false, |x| x >= fences.lower && x <= fences.upper)),
            )
        }
    }
}
