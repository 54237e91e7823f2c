//! Static configuration: column names of the ENEM microdata and the lookup tables of its
//! categorical codes.
//!
//! Labels are kept in Portuguese, as printed in the INEP data dictionary.

use crate::recode::{CodeMap, OrdinalScale, UNKNOWN};

/// Human sciences score
pub const SCORE_HUMAN_SCIENCES: &str = "NU_NOTA_CH";
/// Age group code, `1..=20`
pub const AGE_GROUP_CODE: &str = "TP_FAIXA_ETARIA";
/// School type code, `1..=3`
pub const SCHOOL_TYPE_CODE: &str = "TP_ESCOLA";
/// School location code, `1..=2`
pub const SCHOOL_LOCATION_CODE: &str = "TP_LOCALIZACAO_ESC";
/// State of the school
pub const SCHOOL_STATE: &str = "SG_UF_ESC";
/// Municipality where the exam was taken
pub const EXAM_MUNICIPALITY: &str = "NO_MUNICIPIO_PROVA";
/// Questionnaire: highest schooling of the father or guardian
pub const PARENT_EDUCATION_CODE: &str = "Q001";
/// Questionnaire: monthly family income
pub const FAMILY_INCOME_CODE: &str = "Q006";
/// Questionnaire: internet access at home
pub const INTERNET_ACCESS_CODE: &str = "Q025";

/// School type code of private schools
pub const PRIVATE_SCHOOL: f64 = 3.0;

/// `TP_FAIXA_ETARIA`
pub static AGE_GROUP: CodeMap = CodeMap::new(
    "age group",
    &[
        ("1", "Menor que 17 anos"),
        ("2", "17 anos"),
        ("3", "18 anos"),
        ("4", "19 anos"),
        ("5", "20 anos"),
        ("6", "21 anos"),
        ("7", "22 anos"),
        ("8", "23 anos"),
        ("9", "24 anos"),
        ("10", "25 anos"),
        ("11", "Entre 26 e 30 anos"),
        ("12", "Entre 31 e 35 anos"),
        ("13", "Entre 36 e 40 anos"),
        ("14", "Entre 41 e 45 anos"),
        ("15", "Entre 46 e 50 anos"),
        ("16", "Entre 51 e 55 anos"),
        ("17", "Entre 56 e 60 anos"),
        ("18", "Entre 61 e 65 anos"),
        ("19", "Entre 66 e 70 anos"),
        ("20", "Maior que 70 anos"),
    ],
);

/// Coarse age band: under 18
pub const UNDER_18: &str = "Menor que 18 anos";
/// Coarse age band: 18 to 25
pub const FROM_18_TO_25: &str = "Entre 18 e 25 anos";
/// Coarse age band: over 25
pub const OVER_25: &str = "Maior que 25 anos";

/// Buckets an [`AGE_GROUP`] label into a coarse age band
///
/// Total over every string: [`UNKNOWN`] stays unknown, the two youngest groups are under 18,
/// 18 to 25 year olds are grouped together and every other label is over 25.
pub fn age_band(label: &str) -> &'static str {
    match label {
        UNKNOWN => UNKNOWN,
        "Menor que 17 anos" | "17 anos" => UNDER_18,
        "18 anos" | "19 anos" | "20 anos" | "21 anos" | "22 anos" | "23 anos" | "24 anos"
        | "25 anos" => FROM_18_TO_25,
        _ => OVER_25,
    }
}

/// `Q006`, in reais
pub static FAMILY_INCOME: CodeMap = CodeMap::new(
    "family income",
    &[
        ("A", "Nenhuma renda"),
        ("B", "Até 1.320"),
        ("C", "De 1.320,01 até 1.980"),
        ("D", "De 1.980,01 até 2.640"),
        ("E", "De 2.640,01 até 3.300"),
        ("F", "De 3.300,01 até 3.960"),
        ("G", "De 3.960,01 até 5.280"),
        ("H", "De 5.280,01 até 6.600"),
        ("I", "De 6.600,01 até 7.920"),
        ("J", "De 7.920,01 até 9.240"),
        ("K", "De 9.240,01 até 10.560"),
        ("L", "De 10.560,01 até 11.880"),
        ("M", "De 11.880,01 até 13.200"),
        ("N", "De 13.200,01 até 15.840"),
        ("O", "De 15.840,01 até 19.800"),
        ("P", "De 19.800,01 até 26.400"),
        ("Q", "Acima de 26.400"),
    ],
);

/// [`FAMILY_INCOME`] labels, poorest first
pub static FAMILY_INCOME_SCALE: OrdinalScale = OrdinalScale::new(
    "family income",
    &[
        ("Nenhuma renda", 0),
        ("Até 1.320", 1),
        ("De 1.320,01 até 1.980", 2),
        ("De 1.980,01 até 2.640", 3),
        ("De 2.640,01 até 3.300", 4),
        ("De 3.300,01 até 3.960", 5),
        ("De 3.960,01 até 5.280", 6),
        ("De 5.280,01 até 6.600", 7),
        ("De 6.600,01 até 7.920", 8),
        ("De 7.920,01 até 9.240", 9),
        ("De 9.240,01 até 10.560", 10),
        ("De 10.560,01 até 11.880", 11),
        ("De 11.880,01 até 13.200", 12),
        ("De 13.200,01 até 15.840", 13),
        ("De 15.840,01 até 19.800", 14),
        ("De 19.800,01 até 26.400", 15),
        ("Acima de 26.400", 16),
    ],
);

/// `TP_ESCOLA`
pub static SCHOOL_TYPE: CodeMap = CodeMap::new(
    "school type",
    &[("1", "Não respondeu"), ("2", "Pública"), ("3", "Privada")],
);

/// `TP_LOCALIZACAO_ESC`
pub static SCHOOL_LOCATION: CodeMap =
    CodeMap::new("school location", &[("1", "Urbana"), ("2", "Rural")]);

/// `Q001`
pub static PARENT_EDUCATION: CodeMap = CodeMap::new(
    "parent education",
    &[
        ("A", "Nunca estudou"),
        ("B", "Não completou a 4ª série/5º ano do Ensino Fundamental"),
        (
            "C",
            "Completou a 4ª série/5º ano, mas não completou a 8ª série/9º ano do Ensino Fundamental",
        ),
        (
            "D",
            "Completou a 8ª série/9º ano do Ensino Fundamental, mas não completou o Ensino Médio",
        ),
        ("E", "Completou o Ensino Médio, mas não completou a Faculdade"),
        ("F", "Completou a Faculdade, mas não completou a Pós-graduação"),
        ("G", "Completou a Pós-graduação"),
        ("H", "Não sei"),
    ],
);

/// [`PARENT_EDUCATION`] labels, least schooling first. "Não sei" (don't know) is ranked last,
/// after post-graduation.
pub static PARENT_EDUCATION_SCALE: OrdinalScale = OrdinalScale::new(
    "parent education",
    &[
        ("Nunca estudou", 0),
        ("Não completou a 4ª série/5º ano do Ensino Fundamental", 1),
        (
            "Completou a 4ª série/5º ano, mas não completou a 8ª série/9º ano do Ensino Fundamental",
            2,
        ),
        (
            "Completou a 8ª série/9º ano do Ensino Fundamental, mas não completou o Ensino Médio",
            3,
        ),
        ("Completou o Ensino Médio, mas não completou a Faculdade", 4),
        ("Completou a Faculdade, mas não completou a Pós-graduação", 5),
        ("Completou a Pós-graduação", 6),
        ("Não sei", 7),
    ],
);

/// `Q025`
pub static INTERNET_ACCESS: CodeMap =
    CodeMap::new("internet access", &[("A", "Não"), ("B", "Sim")]);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn age_bands_cover_every_label() {
        let bands: Vec<&str> = AGE_GROUP.labels().map(age_band).collect();

        assert_eq!(bands.iter().filter(|&&b| b == UNDER_18).count(), 2);
        assert_eq!(bands.iter().filter(|&&b| b == FROM_18_TO_25).count(), 8);
        assert_eq!(bands.iter().filter(|&&b| b == OVER_25).count(), 10);
        assert_eq!(age_band(UNKNOWN), UNKNOWN);
        assert_eq!(age_band("anything else"), OVER_25);
    }

    #[test]
    fn scales_rank_every_mapped_label() {
        for label in FAMILY_INCOME.labels() {
            assert!(FAMILY_INCOME_SCALE.rank(label).is_some(), "{}", label);
        }
        for label in PARENT_EDUCATION.labels() {
            assert!(PARENT_EDUCATION_SCALE.rank(label).is_some(), "{}", label);
        }
        assert_eq!(FAMILY_INCOME_SCALE.rank(UNKNOWN), None);
        assert_eq!(FAMILY_INCOME_SCALE.rank("Acima de 26.400"), Some(16.0));
    }
}
