//! Correlation between two numeric columns of a table.

use std::fmt;

use serde_derive::Serialize;

use crate::error::Result;
use crate::stats::bivariate::correlation::{self, Coefficient};
use crate::stats::bivariate::Data;
use crate::table::Table;

/// Correlation coefficient
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Method {
    /// Linear correlation, for naturally continuous columns
    Pearson,
    /// Rank correlation, for columns derived from ordinal categories
    Spearman,
}

impl Method {
    /// Picks Spearman when either column is ordinal, Pearson otherwise
    pub fn for_columns(a_is_ordinal: bool, b_is_ordinal: bool) -> Method {
        if a_is_ordinal || b_is_ordinal {
            Method::Spearman
        } else {
            Method::Pearson
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Pearson => f.pad("Pearson"),
            Method::Spearman => f.pad("Spearman"),
        }
    }
}

/// A correlation coefficient between two columns and its two-sided p-value
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Correlation {
    /// The coefficient used
    pub method: Method,
    /// The correlated columns
    pub columns: (String, String),
    /// In `[-1, 1]`, `NaN` when undefined
    pub coefficient: f64,
    /// In `[0, 1]`, `NaN` when undefined
    pub p_value: f64,
    /// Number of records with a value in both columns
    pub n: usize,
}

/// Correlates two numeric columns
///
/// Records missing a value in either column are left out of this computation only. Fewer than
/// two complete records, or a constant column, yield a `NaN` coefficient and p-value.
pub fn correlate(table: &Table, a: &str, b: &str, method: Method) -> Result<Correlation> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = table
        .numeric(a)?
        .iter()
        .zip(table.numeric(b)?)
        .filter_map(|pair| match pair {
            (&Some(x), &Some(y)) => Some((x, y)),
            _ => None,
        })
        .unzip();

    let coefficient = match Data::new(&xs, &ys) {
        Some(data) => match method {
            Method::Pearson => correlation::pearson(data),
            Method::Spearman => correlation::spearman(data),
        },
        // Numeric columns never hold `NaN`, so this only happens on foreign data
        None => Coefficient {
            r: f64::NAN,
            p_value: f64::NAN,
            n: xs.len(),
        },
    };

    if coefficient.r.is_nan() {
        warn!(
            "{} correlation between {:?} and {:?} is undefined over {} records",
            method, a, b, coefficient.n
        );
    }

    Ok(Correlation {
        method,
        columns: (a.to_owned(), b.to_owned()),
        coefficient: coefficient.r,
        p_value: coefficient.p_value,
        n: coefficient.n,
    })
}
