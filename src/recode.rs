//! Categorical recoding.
//!
//! Raw survey answers are single letters (`"A"`..`"Q"`) or small integers (`1`..`20`). A
//! [`CodeMap`] turns them into labels; codes it does not know become [`UNKNOWN`], so they stay
//! visible when grouping. Labels can then be bucketed into coarser categories by a total
//! classification function, or mapped onto an [`OrdinalScale`] for rank correlation.

use crate::error::Result;
use crate::table::{Column, Table};

/// Label given to every code absent from a mapping table
pub const UNKNOWN: &str = "Desconhecido";

/// A fixed mapping from raw codes to labels
#[derive(Clone, Copy, Debug)]
pub struct CodeMap {
    name: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

impl CodeMap {
    /// Creates a mapping table out of `(code, label)` pairs
    pub const fn new(
        name: &'static str,
        entries: &'static [(&'static str, &'static str)],
    ) -> CodeMap {
        CodeMap { name, entries }
    }

    /// Name of the mapping, used in reports
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The `(code, label)` pairs, in definition order
    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }

    /// Returns the label of `code`, or [`UNKNOWN`] if the code is not mapped
    ///
    /// Surrounding whitespace in `code` is ignored.
    pub fn label(&self, code: &str) -> &'static str {
        let code = code.trim();

        self.entries
            .iter()
            .find(|&&(c, _)| c == code)
            .map_or(UNKNOWN, |&(_, label)| label)
    }

    /// Labels in definition order
    pub fn labels(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|&(_, label)| label)
    }
}

/// A fixed mapping from labels to ranks, for ordinal categories
#[derive(Clone, Copy, Debug)]
pub struct OrdinalScale {
    name: &'static str,
    ranks: &'static [(&'static str, u8)],
}

impl OrdinalScale {
    /// Creates an ordinal scale out of `(label, rank)` pairs
    pub const fn new(name: &'static str, ranks: &'static [(&'static str, u8)]) -> OrdinalScale {
        OrdinalScale { name, ranks }
    }

    /// Name of the scale, used in reports
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the rank of `label`; [`UNKNOWN`] and any other unranked label have none
    pub fn rank(&self, label: &str) -> Option<f64> {
        self.ranks
            .iter()
            .find(|&&(l, _)| l == label)
            .map(|&(_, rank)| f64::from(rank))
    }
}

/// A total function from fine labels to coarse buckets
pub type Bucketing = fn(&str) -> &'static str;

impl Table {
    /// Adds a `target` text column holding the label of every code of the `source` column
    ///
    /// `source` may be numeric (integral codes are looked up as `"1"`, `"2"`, ..) or text. Missing
    /// cells stay missing; unmapped codes become [`UNKNOWN`].
    pub fn recode(self, source: &str, target: &str, map: &CodeMap) -> Result<Table> {
        let column = self.column(source)?;
        let labels = (0..self.len())
            .map(|i| column.key(i).map(|code| map.label(&code).to_owned()))
            .collect::<Vec<_>>();

        let unknown = labels
            .iter()
            .filter(|label| label.as_deref() == Some(UNKNOWN))
            .count();
        if unknown > 0 {
            info!(
                "{} codes of {:?} are not in the {} mapping",
                unknown,
                source,
                map.name()
            );
        }

        Ok(self.with_column(target, Column::Text(labels)))
    }

    /// Adds a `target` text column holding the coarse bucket of every label of the `source`
    /// text column
    pub fn bucket(self, source: &str, target: &str, bucketing: Bucketing) -> Result<Table> {
        let buckets = self
            .text(source)?
            .iter()
            .map(|label| label.as_deref().map(|label| bucketing(label).to_owned()))
            .collect();

        Ok(self.with_column(target, Column::Text(buckets)))
    }

    /// Adds a `target` numeric column holding the rank of every label of the `source` text
    /// column; unranked labels are missing
    pub fn ordinal(self, source: &str, target: &str, scale: &OrdinalScale) -> Result<Table> {
        let ranks = self
            .text(source)?
            .iter()
            .map(|label| label.as_deref().and_then(|label| scale.rank(label)))
            .collect();

        Ok(self.with_column(target, Column::Numeric(ranks)))
    }
}

#[cfg(test)]
mod test {
    use quickcheck::quickcheck;

    use super::{CodeMap, OrdinalScale, UNKNOWN};
    use crate::codes;
    use crate::table::{Column, Table};

    static SCHOOL: CodeMap = CodeMap::new(
        "school",
        &[("1", "Não respondeu"), ("2", "Pública"), ("3", "Privada")],
    );

    #[test]
    fn known_and_unknown_codes() {
        assert_eq!(SCHOOL.label("3"), "Privada");
        assert_eq!(SCHOOL.label(" 2 "), "Pública");
        assert_eq!(SCHOOL.label("9"), UNKNOWN);
        assert_eq!(SCHOOL.label(""), UNKNOWN);
    }

    #[test]
    fn recoding_twice_yields_unknown() {
        // Labels are not codes: recoding an already recoded value is not a no-op
        for (_, label) in codes::FAMILY_INCOME.entries() {
            assert_eq!(codes::FAMILY_INCOME.label(label), UNKNOWN);
        }
        assert_eq!(codes::AGE_GROUP.label(UNKNOWN), UNKNOWN);
    }

    #[test]
    fn unknown_code_is_stable() {
        let first = codes::AGE_GROUP.label("99");
        for _ in 0..10 {
            assert_eq!(codes::AGE_GROUP.label("99"), first);
        }
        assert_eq!(first, UNKNOWN);
    }

    #[test]
    fn recode_numeric_and_text_columns() {
        let table = Table::from_columns(vec![
            (
                "TP_ESCOLA",
                Column::Numeric(vec![Some(2.0), Some(3.0), Some(7.0), None]),
            ),
            (
                "Q025",
                Column::Text(vec![
                    Some("A".to_owned()),
                    Some("B".to_owned()),
                    Some("Z".to_owned()),
                    Some("B".to_owned()),
                ]),
            ),
        ]);

        let table = table
            .recode("TP_ESCOLA", "Tipo_Escola", &SCHOOL)
            .unwrap()
            .recode("Q025", "Acesso_Internet", &codes::INTERNET_ACCESS)
            .unwrap();

        assert_eq!(
            table.text("Tipo_Escola").unwrap(),
            &[
                Some("Pública".to_owned()),
                Some("Privada".to_owned()),
                Some(UNKNOWN.to_owned()),
                None
            ]
        );
        assert_eq!(
            table.text("Acesso_Internet").unwrap(),
            &[
                Some("Não".to_owned()),
                Some("Sim".to_owned()),
                Some(UNKNOWN.to_owned()),
                Some("Sim".to_owned())
            ]
        );
    }

    #[test]
    fn ordinal_ranks_skip_unknown() {
        static SCALE: OrdinalScale = OrdinalScale::new("yes/no", &[("Não", 0), ("Sim", 1)]);
        let table = Table::from_columns(vec![(
            "label",
            Column::Text(vec![
                Some("Sim".to_owned()),
                Some(UNKNOWN.to_owned()),
                Some("Não".to_owned()),
            ]),
        )]);

        let table = table.ordinal("label", "rank", &SCALE).unwrap();

        assert_eq!(
            table.numeric("rank").unwrap(),
            &[Some(1.0), None, Some(0.0)]
        );
    }

    #[test]
    fn bucket_requires_text() {
        let table = Table::from_columns(vec![("n", Column::Numeric(vec![Some(1.0)]))]);

        assert!(table.bucket("n", "b", codes::age_band).is_err());
    }

    quickcheck! {
        fn any_code_maps_to_a_label(code: String) -> bool {
            let label = codes::AGE_GROUP.label(&code);

            label == UNKNOWN || codes::AGE_GROUP.labels().any(|l| l == label)
        }
    }
}
