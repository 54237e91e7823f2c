//! The parameterized cleaning and analysis pipeline.

use std::fmt;

use serde_derive::Serialize;

use crate::correlation::{self, Correlation, Method};
use crate::error::Result;
use crate::group::{self, Aggregation, Direction, GroupedStats, Ranking, Statistic, Summary};
use crate::outlier::{self, Outcome};
use crate::recode::{Bucketing, CodeMap, OrdinalScale};
use crate::table::Table;

/// One derived column, computed from a column present earlier in the pipeline
#[derive(Clone)]
enum Derivation {
    Recode {
        source: String,
        target: String,
        map: &'static CodeMap,
    },
    Bucket {
        source: String,
        target: String,
        bucketing: Bucketing,
    },
    Ordinal {
        source: String,
        target: String,
        scale: &'static OrdinalScale,
    },
}

impl fmt::Debug for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Derivation::Recode {
                source,
                target,
                map,
            } => write!(f, "Recode({} -> {}, {})", source, target, map.name()),
            Derivation::Bucket { source, target, .. } => {
                write!(f, "Bucket({} -> {})", source, target)
            }
            Derivation::Ordinal {
                source,
                target,
                scale,
            } => write!(f, "Ordinal({} -> {}, {})", source, target, scale.name()),
        }
    }
}

impl Derivation {
    fn apply(&self, table: Table) -> Result<Table> {
        match self {
            Derivation::Recode {
                source,
                target,
                map,
            } => table.recode(source, target, map),
            Derivation::Bucket {
                source,
                target,
                bucketing,
            } => table.bucket(source, target, *bucketing),
            Derivation::Ordinal {
                source,
                target,
                scale,
            } => table.ordinal(source, target, scale),
        }
    }

    fn is_ordinal(&self, column: &str) -> bool {
        match self {
            Derivation::Ordinal { target, .. } => target == column,
            _ => false,
        }
    }
}

/// A pair of columns to correlate; `None` picks the method from the column kinds
#[derive(Clone, Debug)]
struct Pair {
    a: String,
    b: String,
    method: Option<Method>,
}

/// The configuration of one analysis of a microdata file
///
/// An analysis coerces its numeric columns, drops every incomplete record, derives labelled
/// columns from the raw codes, optionally drops the score outliers, then describes the score per
/// category and correlates columns. It may also collapse the records into one row per category
/// of a key (e.g. one row per municipality) and rank and correlate those rows.
///
/// ```
/// use enem_eda::{codes, Analysis};
///
/// let analysis = Analysis::new("school", "Scores by school type")
///     .score(codes::SCORE_HUMAN_SCIENCES)
///     .numeric(codes::SCHOOL_TYPE_CODE)
///     .recode(codes::SCHOOL_TYPE_CODE, "Tipo_Escola", &codes::SCHOOL_TYPE)
///     .group_by("Tipo_Escola");
///
/// assert_eq!(analysis.id(), "school");
/// ```
#[derive(Clone, Debug)]
pub struct Analysis {
    id: String,
    title: String,
    score: String,
    numeric: Vec<String>,
    derivations: Vec<Derivation>,
    filter_outliers: bool,
    groupings: Vec<String>,
    correlations: Vec<Pair>,
    aggregation: Option<Aggregation>,
    aggregate_correlations: Vec<Pair>,
}

impl Analysis {
    /// Creates an empty analysis of the human sciences score, with outlier filtering enabled
    ///
    /// `id` names the output directory of the analysis and is matched by the run filter.
    pub fn new<I: Into<String>, T: Into<String>>(id: I, title: T) -> Analysis {
        Analysis {
            id: id.into(),
            title: title.into(),
            score: crate::codes::SCORE_HUMAN_SCIENCES.to_owned(),
            numeric: vec![],
            derivations: vec![],
            filter_outliers: true,
            groupings: vec![],
            correlations: vec![],
            aggregation: None,
            aggregate_correlations: vec![],
        }
    }

    /// Identifier of the analysis
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human readable title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Changes the score column; it is always coerced to numbers and it is the column outliers
    /// are filtered on
    pub fn score<S: Into<String>>(mut self, column: S) -> Analysis {
        self.score = column.into();
        self
    }

    /// Adds a raw column to coerce to numbers
    pub fn numeric<S: Into<String>>(mut self, column: S) -> Analysis {
        self.numeric.push(column.into());
        self
    }

    /// Adds a `target` column with the labels of the `source` codes
    pub fn recode<S: Into<String>, T: Into<String>>(
        mut self,
        source: S,
        target: T,
        map: &'static CodeMap,
    ) -> Analysis {
        self.derivations.push(Derivation::Recode {
            source: source.into(),
            target: target.into(),
            map,
        });
        self
    }

    /// Adds a `target` column with the coarse bucket of the `source` labels
    pub fn bucket<S: Into<String>, T: Into<String>>(
        mut self,
        source: S,
        target: T,
        bucketing: Bucketing,
    ) -> Analysis {
        self.derivations.push(Derivation::Bucket {
            source: source.into(),
            target: target.into(),
            bucketing,
        });
        self
    }

    /// Adds a numeric `target` column with the rank of the `source` labels
    pub fn ordinal<S: Into<String>, T: Into<String>>(
        mut self,
        source: S,
        target: T,
        scale: &'static OrdinalScale,
    ) -> Analysis {
        self.derivations.push(Derivation::Ordinal {
            source: source.into(),
            target: target.into(),
            scale,
        });
        self
    }

    /// Keeps the score outliers
    pub fn without_outlier_filter(mut self) -> Analysis {
        self.filter_outliers = false;
        self
    }

    /// Describes the score per category of `column`
    pub fn group_by<S: Into<String>>(mut self, column: S) -> Analysis {
        self.groupings.push(column.into());
        self
    }

    /// Correlates two numeric columns, with Spearman's coefficient if either is an ordinal
    /// column of this analysis and Pearson's otherwise
    pub fn correlate<A: Into<String>, B: Into<String>>(mut self, a: A, b: B) -> Analysis {
        self.correlations.push(Pair {
            a: a.into(),
            b: b.into(),
            method: None,
        });
        self
    }

    /// Correlates two numeric columns with the given coefficient
    pub fn correlate_with<A: Into<String>, B: Into<String>>(
        mut self,
        a: A,
        b: B,
        method: Method,
    ) -> Analysis {
        self.correlations.push(Pair {
            a: a.into(),
            b: b.into(),
            method: Some(method),
        });
        self
    }

    /// Collapses the filtered records into one row per category
    pub fn aggregate(mut self, aggregation: Aggregation) -> Analysis {
        self.aggregation = Some(aggregation);
        self
    }

    /// Correlates two columns of the aggregated table
    pub fn correlate_aggregated<A: Into<String>, B: Into<String>>(
        mut self,
        a: A,
        b: B,
        method: Method,
    ) -> Analysis {
        self.aggregate_correlations.push(Pair {
            a: a.into(),
            b: b.into(),
            method: Some(method),
        });
        self
    }

    /// Runs the pipeline over a raw table, every cell of which is text
    ///
    /// `top_k` is the size of the rankings of the aggregated rows. A configured column that is
    /// absent from the table is an error; malformed cells and unknown codes are not.
    pub fn run(&self, raw: &Table, top_k: usize) -> Result<AnalysisReport> {
        let top_k = group::check_top_k(top_k)?;

        let mut numeric: Vec<&str> = vec![self.score.as_str()];
        numeric.extend(self.numeric.iter().map(String::as_str));
        let complete = raw.coerce_numeric(&numeric)?.drop_missing();

        info!(
            "{}: {} of {} records are complete",
            self.id,
            complete.len(),
            raw.len()
        );

        let mut table = complete;
        for derivation in &self.derivations {
            table = derivation.apply(table)?;
        }
        let complete_len = table.len();

        let (table, outliers) = if self.filter_outliers {
            let filtered = outlier::filter(&table, &self.score)?;
            (filtered.table, Some(filtered.outcome))
        } else {
            (table, None)
        };

        let overall = Summary::of_column(&table, &self.score)?;

        let groups = self
            .groupings
            .iter()
            .map(|key| group::group_by(&table, key, &self.score))
            .collect::<Result<Vec<_>>>()?;

        let correlations = self
            .correlations
            .iter()
            .map(|pair| self.correlate_pair(&table, pair))
            .collect::<Result<Vec<_>>>()?;

        let aggregate = match &self.aggregation {
            Some(aggregation) => Some(self.run_aggregation(&table, aggregation, top_k)?),
            None => None,
        };

        Ok(AnalysisReport {
            id: self.id.clone(),
            title: self.title.clone(),
            score: self.score.clone(),
            records: Records {
                raw: raw.len(),
                complete: complete_len,
                analyzed: table.len(),
            },
            outliers,
            overall,
            groups,
            correlations,
            aggregate,
            table,
        })
    }

    fn correlate_pair(&self, table: &Table, pair: &Pair) -> Result<Correlation> {
        let method = pair.method.unwrap_or_else(|| {
            Method::for_columns(self.is_ordinal(&pair.a), self.is_ordinal(&pair.b))
        });

        correlation::correlate(table, &pair.a, &pair.b, method)
    }

    fn is_ordinal(&self, column: &str) -> bool {
        self.derivations.iter().any(|d| d.is_ordinal(column))
    }

    fn run_aggregation(
        &self,
        table: &Table,
        aggregation: &Aggregation,
        top_k: usize,
    ) -> Result<AggregateReport> {
        let derived = aggregation.apply(table)?;
        let grouped = group::group_by(table, &aggregation.key, &aggregation.target)?;

        let mut rankings = vec![];
        for &statistic in &[Statistic::Mean, Statistic::StdDev] {
            for &direction in &[Direction::Top, Direction::Bottom] {
                rankings.push(grouped.rank(statistic, direction, top_k));
            }
        }

        let correlations = self
            .aggregate_correlations
            .iter()
            .map(|pair| self.correlate_pair(&derived, pair))
            .collect::<Result<Vec<_>>>()?;

        Ok(AggregateReport {
            aggregation: aggregation.clone(),
            rows: derived.len(),
            rankings,
            correlations,
            table: derived,
        })
    }
}

/// Record counts along the pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Records {
    /// Records read from the file
    pub raw: usize,
    /// Records left after dropping the incomplete ones
    pub complete: usize,
    /// Records left after dropping the outliers, i.e. the records every statistic is computed on
    pub analyzed: usize,
}

/// The per-category table of an analysis, with its rankings and correlations
#[derive(Clone, Debug, Serialize)]
pub struct AggregateReport {
    /// How the rows were built
    pub aggregation: Aggregation,
    /// Number of categories
    pub rows: usize,
    /// Top and bottom categories by mean and by standard deviation
    pub rankings: Vec<Ranking>,
    /// Correlations between derived columns
    pub correlations: Vec<Correlation>,
    /// The derived table
    #[serde(skip)]
    pub table: Table,
}

/// Everything an analysis computed
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    /// Identifier of the analysis
    pub id: String,
    /// Human readable title
    pub title: String,
    /// Score column
    pub score: String,
    /// Record counts
    pub records: Records,
    /// The outlier filter, if enabled
    pub outliers: Option<Outcome>,
    /// Summary of the score over every analyzed record
    pub overall: Summary,
    /// Summaries of the score per category, one entry per grouping
    pub groups: Vec<GroupedStats>,
    /// Correlations over the analyzed records
    pub correlations: Vec<Correlation>,
    /// The per-category table, if configured
    pub aggregate: Option<AggregateReport>,
    /// The analyzed records
    #[serde(skip)]
    pub table: Table,
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::Analysis;
    use crate::codes;
    use crate::correlation::Method;
    use crate::error::Error;
    use crate::group::Aggregation;
    use crate::table::{LoadOptions, Table};
    use crate::UNKNOWN;

    const RAW: &str = "\
NU_NOTA_CH;TP_ESCOLA;Q006;NO_MUNICIPIO_PROVA
520;2;B;Recife
610;3;Q;Olinda
;2;C;Recife
abc;1;A;Recife
480;2;A;Caruaru
550;3;Z;Olinda
1000;3;Q;Recife
500;2;C;Caruaru
530;2;D;Recife
";

    fn raw() -> Table {
        Table::from_reader(RAW.as_bytes(), &LoadOptions::default()).unwrap()
    }

    fn income() -> Analysis {
        Analysis::new("income", "Income")
            .numeric(codes::SCHOOL_TYPE_CODE)
            .recode(codes::FAMILY_INCOME_CODE, "Renda_Familiar", &codes::FAMILY_INCOME)
            .recode(codes::SCHOOL_TYPE_CODE, "Tipo_Escola", &codes::SCHOOL_TYPE)
            .ordinal("Renda_Familiar", "Renda_Ordinal", &codes::FAMILY_INCOME_SCALE)
            .group_by("Tipo_Escola")
            .group_by("Renda_Familiar")
            .correlate("Renda_Ordinal", codes::SCORE_HUMAN_SCIENCES)
    }

    #[test]
    fn cleaning_order() {
        let report = income().run(&raw(), 10).unwrap();

        assert_eq!(report.records.raw, 9);
        // the empty and the malformed score are dropped
        assert_eq!(report.records.complete, 7);
        // 1000 lies beyond the upper fence
        assert_eq!(report.records.analyzed, 6);
        assert_eq!(report.outliers.as_ref().unwrap().removed(), 1);
        assert_eq!(report.overall.count, 6);
        assert_eq!(report.table.len(), 6);
    }

    #[test]
    fn unknown_codes_form_their_own_group() {
        let report = income().run(&raw(), 10).unwrap();
        let by_income = &report.groups[1];

        assert_eq!(by_income.key, "Renda_Familiar");
        assert_eq!(by_income.get(UNKNOWN).unwrap().summary.count, 1);
        assert_eq!(by_income.total_count(), report.records.analyzed);
    }

    #[test]
    fn ordinal_columns_are_rank_correlated() {
        let report = income().run(&raw(), 10).unwrap();
        let correlation = &report.correlations[0];

        assert_eq!(correlation.method, Method::Spearman);
        // the unknown income has no rank
        assert_eq!(correlation.n, 5);
    }

    #[test]
    fn filter_can_be_disabled() {
        let report = income().without_outlier_filter().run(&raw(), 10).unwrap();

        assert!(report.outliers.is_none());
        assert_eq!(report.records.analyzed, 7);
    }

    #[test]
    fn aggregation() {
        let analysis = Analysis::new("municipality", "Municipalities")
            .numeric(codes::SCHOOL_TYPE_CODE)
            .without_outlier_filter()
            .aggregate(
                Aggregation::new(codes::EXAM_MUNICIPALITY, codes::SCORE_HUMAN_SCIENCES)
                    .columns("Media_CH", "Desvio_CH", "Participantes")
                    .share(codes::SCHOOL_TYPE_CODE, codes::PRIVATE_SCHOOL, "Privadas"),
            )
            .correlate_aggregated("Privadas", "Media_CH", Method::Spearman);
        let report = analysis.run(&raw(), 2).unwrap();
        let aggregate = report.aggregate.unwrap();

        assert_eq!(aggregate.rows, 3);
        assert_eq!(aggregate.rankings.len(), 4);
        let top = &aggregate.rankings[0];
        assert_eq!(top.entries.len(), 2);
        assert_eq!(top.entries[0].0, "Recife");
        assert_relative_eq!(top.entries[0].1, (520.0 + 1000.0 + 530.0) / 3.0);
        assert_eq!(aggregate.correlations[0].n, 3);
    }

    #[test]
    fn absent_column_is_fatal() {
        let analysis = Analysis::new("broken", "Broken").numeric("NU_NOTA_MT");

        assert!(matches!(
            analysis.run(&raw(), 10),
            Err(Error::MissingColumn { .. })
        ));
    }

    #[test]
    fn zero_ranking_size_is_rejected() {
        assert!(matches!(
            income().run(&raw(), 0),
            Err(Error::InvalidConfig(_))
        ));
    }
}
