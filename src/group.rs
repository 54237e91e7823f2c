//! Grouped descriptive statistics.
//!
//! [`group_by`] splits the values of a numeric column by the categories of another column and
//! summarizes each part. Categories are kept in the order they are first encountered; this is
//! the order ties are broken in when ranking.

use std::cmp::Ordering;
use std::collections::HashMap;

use itertools::Itertools;
use serde_derive::Serialize;

use crate::error::{Error, Result};
use crate::stats::univariate::Sample;
use crate::table::{Column, Table};

/// Describe-style summary of a set of values
///
/// Every statistic of an empty set is `NaN`; so is the standard deviation of a single value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Summary {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (`N - 1` denominator)
    pub std_dev: f64,
    /// Smallest value
    pub min: f64,
    /// 25th percentile
    pub p25: f64,
    /// 50th percentile
    pub median: f64,
    /// 75th percentile
    pub p75: f64,
    /// Biggest value
    pub max: f64,
}

impl Summary {
    /// Summarizes `values`, which must not contain `NaN`
    pub fn of(values: &[f64]) -> Summary {
        match Sample::new(values) {
            Some(sample) => {
                let mean = sample.mean();
                let percentiles = sample.percentiles();
                let (p25, median, p75) = percentiles.quartiles();
                let (min, max) = percentiles.extremes();

                Summary {
                    count: sample.len(),
                    mean,
                    std_dev: sample.std_dev(Some(mean)),
                    min,
                    p25,
                    median,
                    p75,
                    max,
                }
            }
            None => Summary::empty(),
        }
    }

    /// Summarizes the present cells of a numeric column
    pub fn of_column(table: &Table, column: &str) -> Result<Summary> {
        let values: Vec<f64> = table.numeric(column)?.iter().filter_map(|&x| x).collect();

        Ok(Summary::of(&values))
    }

    fn empty() -> Summary {
        Summary {
            count: 0,
            mean: f64::NAN,
            std_dev: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }

    /// Returns the requested statistic
    pub fn get(&self, statistic: Statistic) -> f64 {
        match statistic {
            Statistic::Mean => self.mean,
            Statistic::StdDev => self.std_dev,
        }
    }
}

/// The summary of one category
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupStats {
    /// The category, as a label or a rendered code
    pub key: String,
    /// Summary of the values of this category
    pub summary: Summary,
}

/// Per-category summaries of a numeric column
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupedStats {
    /// Column holding the categories
    pub key: String,
    /// Summarized numeric column
    pub target: String,
    /// One entry per category, in order of first appearance
    pub groups: Vec<GroupStats>,
}

/// Statistics categories can be ranked by
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Statistic {
    /// The mean of the category
    Mean,
    /// The sample standard deviation of the category
    StdDev,
}

impl Statistic {
    /// Human readable name
    pub fn as_str(self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::StdDev => "standard deviation",
        }
    }
}

/// Which end of a ranking to keep
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Direction {
    /// Biggest values first
    Top,
    /// Smallest values first
    Bottom,
}

/// The `k` categories with the biggest or smallest value of a statistic
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ranking {
    /// Ranked statistic
    pub statistic: Statistic,
    /// Ranking direction
    pub direction: Direction,
    /// `(category, value)` pairs, best first
    pub entries: Vec<(String, f64)>,
}

impl Ranking {
    /// Title used in reports, e.g. "Top 10 by mean"
    pub fn title(&self) -> String {
        let direction = match self.direction {
            Direction::Top => "Top",
            Direction::Bottom => "Bottom",
        };

        format!(
            "{} {} by {}",
            direction,
            self.entries.len(),
            self.statistic.as_str()
        )
    }
}

impl GroupedStats {
    /// Number of values summarized across every category
    pub fn total_count(&self) -> usize {
        self.groups.iter().map(|group| group.summary.count).sum()
    }

    /// Looks a category up
    pub fn get(&self, key: &str) -> Option<&GroupStats> {
        self.groups.iter().find(|group| group.key == key)
    }

    /// Ranks the categories by `statistic`
    ///
    /// Categories where the statistic is `NaN` are left out. Ties keep the order in which the
    /// categories were first encountered.
    pub fn rank(&self, statistic: Statistic, direction: Direction, k: usize) -> Ranking {
        let entries = self
            .groups
            .iter()
            .map(|group| (group.key.clone(), group.summary.get(statistic)))
            .filter(|(_, value)| !value.is_nan())
            .sorted_by(|(_, a), (_, b)| {
                let order = a.partial_cmp(b).unwrap_or(Ordering::Equal);
                match direction {
                    Direction::Top => order.reverse(),
                    Direction::Bottom => order,
                }
            })
            .take(k)
            .collect();

        Ranking {
            statistic,
            direction,
            entries,
        }
    }
}

/// Summarizes the `target` numeric column per category of the `key` column
///
/// The `key` column may hold text or numeric codes. Records with a missing key or a missing
/// target value are not counted in any category.
pub fn group_by(table: &Table, key: &str, target: &str) -> Result<GroupedStats> {
    let groups = partition(table, key, target)?
        .into_iter()
        .map(|(key, values)| GroupStats {
            key,
            summary: Summary::of(&values),
        })
        .collect();

    Ok(GroupedStats {
        key: key.to_owned(),
        target: target.to_owned(),
        groups,
    })
}

/// Values of `target` per category of `key`, categories in order of first appearance
pub(crate) fn partition(table: &Table, key: &str, target: &str) -> Result<Vec<(String, Vec<f64>)>> {
    let keys = table.column(key)?;
    let values = table.numeric(target)?;

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for (i, value) in values.iter().enumerate() {
        let (k, x) = match (keys.key(i), value) {
            (Some(k), &Some(x)) => (k, x),
            _ => continue,
        };

        let slot = match index.get(k.as_ref()) {
            Some(&slot) => slot,
            None => {
                index.insert(k.clone().into_owned(), groups.len());
                groups.push((k.into_owned(), Vec::new()));
                groups.len() - 1
            }
        };
        groups[slot].1.push(x);
    }

    Ok(groups)
}

/// The share of records, per category, whose `column` equals `value`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Share {
    /// Numeric column tested
    pub column: String,
    /// Value counted
    pub value: f64,
    /// Name of the derived proportion column
    pub name: String,
}

/// How to collapse the records of a table into one row per category
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Aggregation {
    /// Column holding the categories; it becomes the text key of the derived table
    pub key: String,
    /// Summarized numeric column
    pub target: String,
    /// Name of the derived mean column
    pub mean: String,
    /// Name of the derived standard deviation column
    pub std_dev: String,
    /// Name of the derived record count column
    pub count: String,
    /// Optional derived proportion column
    pub share: Option<Share>,
}

impl Aggregation {
    /// Aggregates `target` per `key` into `<target>_mean`, `<target>_std` and `<target>_count`
    /// columns
    pub fn new<K: Into<String>, T: Into<String>>(key: K, target: T) -> Aggregation {
        let target = target.into();

        Aggregation {
            key: key.into(),
            mean: format!("{}_mean", target),
            std_dev: format!("{}_std", target),
            count: format!("{}_count", target),
            target,
            share: None,
        }
    }

    /// Renames the derived mean, standard deviation and count columns
    pub fn columns<M, S, C>(mut self, mean: M, std_dev: S, count: C) -> Aggregation
    where
        M: Into<String>,
        S: Into<String>,
        C: Into<String>,
    {
        self.mean = mean.into();
        self.std_dev = std_dev.into();
        self.count = count.into();
        self
    }

    /// Adds a column with the proportion of records per category whose `column` equals `value`
    pub fn share<C: Into<String>, N: Into<String>>(
        mut self,
        column: C,
        value: f64,
        name: N,
    ) -> Aggregation {
        self.share = Some(Share {
            column: column.into(),
            value,
            name: name.into(),
        });
        self
    }

    /// Builds the derived table, one row per category in order of first appearance
    ///
    /// Undefined statistics, like the standard deviation of a single record, are missing cells.
    pub fn apply(&self, table: &Table) -> Result<Table> {
        let grouped = group_by(table, &self.key, &self.target)?;

        let mut columns = vec![
            (
                self.key.clone(),
                Column::Text(grouped.groups.iter().map(|g| Some(g.key.clone())).collect()),
            ),
            (
                self.mean.clone(),
                Column::Numeric(
                    grouped
                        .groups
                        .iter()
                        .map(|g| defined(g.summary.mean))
                        .collect(),
                ),
            ),
            (
                self.std_dev.clone(),
                Column::Numeric(
                    grouped
                        .groups
                        .iter()
                        .map(|g| defined(g.summary.std_dev))
                        .collect(),
                ),
            ),
            (
                self.count.clone(),
                Column::Numeric(
                    grouped
                        .groups
                        .iter()
                        .map(|g| Some(g.summary.count as f64))
                        .collect(),
                ),
            ),
        ];

        if let Some(share) = &self.share {
            let proportions = self.proportions(table, share)?;
            let cells = grouped
                .groups
                .iter()
                .map(|g| proportions.get(g.key.as_str()).copied())
                .collect();

            columns.push((share.name.clone(), Column::Numeric(cells)));
        }

        info!(
            "Aggregated {} records into {} rows by {:?}",
            table.len(),
            grouped.groups.len(),
            self.key
        );

        Ok(Table::from_columns(columns))
    }

    // Proportion per category, over the records that have a `target` value so that the
    // denominator matches the count column
    fn proportions(&self, table: &Table, share: &Share) -> Result<HashMap<String, f64>> {
        let keys = table.column(&self.key)?;
        let targets = table.numeric(&self.target)?;
        let tested = table.numeric(&share.column)?;

        let mut tally: HashMap<String, (usize, usize)> = HashMap::new();
        for i in 0..table.len() {
            let key = match (keys.key(i), targets[i]) {
                (Some(key), Some(_)) => key,
                _ => continue,
            };

            let entry = tally.entry(key.into_owned()).or_insert((0, 0));
            entry.1 += 1;
            if tested[i] == Some(share.value) {
                entry.0 += 1;
            }
        }

        Ok(tally
            .into_iter()
            .map(|(key, (hits, total))| (key, hits as f64 / total as f64))
            .collect())
    }
}

fn defined(x: f64) -> Option<f64> {
    if x.is_nan() {
        None
    } else {
        Some(x)
    }
}

/// Checks that `k` can be used as a ranking size
pub fn check_top_k(k: usize) -> Result<usize> {
    if k == 0 {
        Err(Error::InvalidConfig(
            "ranking size must be at least 1".to_owned(),
        ))
    } else {
        Ok(k)
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use quickcheck::quickcheck;

    use super::{check_top_k, group_by, Aggregation, Direction, Statistic, Summary};
    use crate::table::{Column, Table};

    fn text(cells: &[&str]) -> Column {
        Column::Text(cells.iter().map(|s| Some((*s).to_owned())).collect())
    }

    fn numbers(cells: &[f64]) -> Column {
        Column::Numeric(cells.iter().map(|&x| Some(x)).collect())
    }

    fn exams() -> Table {
        Table::from_columns(vec![
            (
                "NO_MUNICIPIO_PROVA",
                text(&["Recife", "Olinda", "Recife", "Caruaru", "Olinda", "Recife"]),
            ),
            (
                "NU_NOTA_CH",
                numbers(&[500.0, 600.0, 520.0, 450.0, 640.0, 540.0]),
            ),
            ("TP_ESCOLA", numbers(&[3.0, 2.0, 2.0, 3.0, 3.0, 3.0])),
        ])
    }

    #[test]
    fn describe() {
        let summary = Summary::of(&[1.0, 2.0, 3.0, 4.0]);

        assert_eq!(summary.count, 4);
        assert_relative_eq!(summary.mean, 2.5);
        assert_relative_eq!(summary.std_dev, 1.290_994_448_735_805_6, epsilon = 1e-12);
        assert_relative_eq!(summary.min, 1.0);
        assert_relative_eq!(summary.p25, 1.75);
        assert_relative_eq!(summary.median, 2.5);
        assert_relative_eq!(summary.p75, 3.25);
        assert_relative_eq!(summary.max, 4.0);
    }

    #[test]
    fn undefined_statistics_are_nan() {
        let single = Summary::of(&[7.0]);
        assert_eq!(single.count, 1);
        assert!(single.std_dev.is_nan());
        assert_eq!(single.median, 7.0);

        let empty = Summary::of(&[]);
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_nan());
    }

    #[test]
    fn groups_in_order_of_appearance() {
        let grouped = group_by(&exams(), "NO_MUNICIPIO_PROVA", "NU_NOTA_CH").unwrap();
        let keys: Vec<&str> = grouped.groups.iter().map(|g| g.key.as_str()).collect();

        assert_eq!(keys, vec!["Recife", "Olinda", "Caruaru"]);
        assert_eq!(grouped.get("Recife").unwrap().summary.count, 3);
        assert_relative_eq!(grouped.get("Olinda").unwrap().summary.mean, 620.0);
        assert!(grouped.get("Caruaru").unwrap().summary.std_dev.is_nan());
        assert_eq!(grouped.total_count(), 6);
    }

    #[test]
    fn numeric_keys_render_as_codes() {
        let grouped = group_by(&exams(), "TP_ESCOLA", "NU_NOTA_CH").unwrap();
        let keys: Vec<&str> = grouped.groups.iter().map(|g| g.key.as_str()).collect();

        assert_eq!(keys, vec!["3", "2"]);
    }

    #[test]
    fn missing_cells_are_not_counted() {
        let table = Table::from_columns(vec![
            (
                "k",
                Column::Text(vec![Some("a".to_owned()), None, Some("a".to_owned())]),
            ),
            ("x", Column::Numeric(vec![Some(1.0), Some(2.0), None])),
        ]);
        let grouped = group_by(&table, "k", "x").unwrap();

        assert_eq!(grouped.groups.len(), 1);
        assert_eq!(grouped.total_count(), 1);
    }

    #[test]
    fn empty_table_has_no_groups() {
        let table = Table::from_columns(vec![("k", text(&[])), ("x", numbers(&[]))]);

        assert!(group_by(&table, "k", "x").unwrap().groups.is_empty());
    }

    #[test]
    fn rankings() {
        let grouped = group_by(&exams(), "NO_MUNICIPIO_PROVA", "NU_NOTA_CH").unwrap();

        let top = grouped.rank(Statistic::Mean, Direction::Top, 2);
        assert_eq!(
            top.entries,
            vec![("Olinda".to_owned(), 620.0), ("Recife".to_owned(), 520.0)]
        );
        assert_eq!(top.title(), "Top 2 by mean");

        let bottom = grouped.rank(Statistic::Mean, Direction::Bottom, 10);
        assert_eq!(bottom.entries[0].0, "Caruaru");
        assert_eq!(bottom.entries.len(), 3);

        // Caruaru has a single record, its standard deviation is undefined
        let spread = grouped.rank(Statistic::StdDev, Direction::Top, 10);
        assert_eq!(spread.entries.len(), 2);
        assert_eq!(spread.entries[0].0, "Olinda");
    }

    #[test]
    fn ties_keep_first_encountered_order() {
        let table = Table::from_columns(vec![
            ("k", text(&["b", "a", "c", "d"])),
            ("x", numbers(&[1.0, 1.0, 2.0, 1.0])),
        ]);
        let grouped = group_by(&table, "k", "x").unwrap();

        let top = grouped.rank(Statistic::Mean, Direction::Top, 3);
        let keys: Vec<&str> = top.entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["c", "b", "a"]);

        let bottom = grouped.rank(Statistic::Mean, Direction::Bottom, 3);
        let keys: Vec<&str> = bottom.entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "d"]);
    }

    #[test]
    fn aggregate_by_municipality() {
        let aggregation = Aggregation::new("NO_MUNICIPIO_PROVA", "NU_NOTA_CH").share(
            "TP_ESCOLA",
            3.0,
            "private_share",
        );
        let derived = aggregation.apply(&exams()).unwrap();

        assert_eq!(derived.len(), 3);
        assert_eq!(
            derived.text("NO_MUNICIPIO_PROVA").unwrap(),
            &[
                Some("Recife".to_owned()),
                Some("Olinda".to_owned()),
                Some("Caruaru".to_owned())
            ]
        );
        assert_eq!(
            derived.numeric("NU_NOTA_CH_mean").unwrap(),
            &[Some(520.0), Some(620.0), Some(450.0)]
        );
        assert_eq!(derived.numeric("NU_NOTA_CH_std").unwrap()[2], None);
        assert_eq!(
            derived.numeric("NU_NOTA_CH_count").unwrap(),
            &[Some(3.0), Some(2.0), Some(1.0)]
        );

        let share = derived.numeric("private_share").unwrap();
        assert_relative_eq!(share[0].unwrap(), 2.0 / 3.0);
        assert_relative_eq!(share[1].unwrap(), 0.5);
        assert_relative_eq!(share[2].unwrap(), 1.0);
    }

    #[test]
    fn zero_ranking_size_is_rejected() {
        assert!(check_top_k(0).is_err());
        assert_eq!(check_top_k(10).unwrap(), 10);
    }

    quickcheck! {
        fn groups_partition_the_records(keys: Vec<u8>) -> bool {
            let n = keys.len();
            let table = Table::from_columns(vec![
                (
                    "k",
                    Column::Text(keys.iter().map(|k| Some(format!("{}", k % 5))).collect()),
                ),
                ("x", Column::Numeric((0..n).map(|i| Some(i as f64)).collect())),
            ]);
            let grouped = group_by(&table, "k", "x").unwrap();

            let mut seen: Vec<&str> = grouped.groups.iter().map(|g| g.key.as_str()).collect();
            seen.sort_unstable();
            seen.dedup();

            grouped.total_count() == n && seen.len() == grouped.groups.len()
        }
    }
}
