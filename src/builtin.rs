//! The stock analyses of the human sciences score.

use crate::analysis::Analysis;
use crate::codes::*;
use crate::correlation::Method;
use crate::group::Aggregation;

/// Score by age band, family income and school type; income against score
pub fn age_income_school() -> Analysis {
    Analysis::new("age-income-school", "Age, family income and school type")
        .numeric(AGE_GROUP_CODE)
        .numeric(SCHOOL_TYPE_CODE)
        .recode(AGE_GROUP_CODE, "Faixa_Etaria", &AGE_GROUP)
        .bucket("Faixa_Etaria", "Faixa_Etaria_Categorizada", age_band)
        .recode(FAMILY_INCOME_CODE, "Renda_Familiar", &FAMILY_INCOME)
        .recode(SCHOOL_TYPE_CODE, "Tipo_Escola", &SCHOOL_TYPE)
        .ordinal("Renda_Familiar", "Renda_Ordinal", &FAMILY_INCOME_SCALE)
        .group_by("Faixa_Etaria_Categorizada")
        .group_by("Renda_Familiar")
        .group_by("Tipo_Escola")
        .correlate("Renda_Ordinal", SCORE_HUMAN_SCIENCES)
}

/// Score by parental education, internet access and school type, outliers included
pub fn family_background() -> Analysis {
    Analysis::new("family-background", "Parental education and internet access")
        .numeric(SCHOOL_TYPE_CODE)
        .recode(PARENT_EDUCATION_CODE, "Escolaridade_Pais", &PARENT_EDUCATION)
        .recode(INTERNET_ACCESS_CODE, "Acesso_Internet", &INTERNET_ACCESS)
        .ordinal(
            "Escolaridade_Pais",
            "Escolaridade_Pais_Num",
            &PARENT_EDUCATION_SCALE,
        )
        .without_outlier_filter()
        .group_by("Acesso_Internet")
        .group_by(SCHOOL_TYPE_CODE)
        .group_by("Escolaridade_Pais")
        .correlate("Escolaridade_Pais_Num", SCORE_HUMAN_SCIENCES)
}

/// Score by school type, school location and state
pub fn school() -> Analysis {
    Analysis::new("school", "School type, location and state")
        .numeric(SCHOOL_TYPE_CODE)
        .numeric(SCHOOL_LOCATION_CODE)
        .recode(SCHOOL_TYPE_CODE, "Tipo_Escola", &SCHOOL_TYPE)
        .recode(SCHOOL_LOCATION_CODE, "Localizacao_Escola", &SCHOOL_LOCATION)
        .group_by("Tipo_Escola")
        .group_by("Localizacao_Escola")
        .group_by(SCHOOL_STATE)
}

/// Mean and spread of the score per exam municipality, and how the mean follows the share of
/// private school students
pub fn municipality() -> Analysis {
    Analysis::new("municipality", "Exam municipalities")
        .numeric(SCHOOL_TYPE_CODE)
        .aggregate(
            Aggregation::new(EXAM_MUNICIPALITY, SCORE_HUMAN_SCIENCES)
                .columns("Media_CH", "Desvio_CH", "Participantes")
                .share(SCHOOL_TYPE_CODE, PRIVATE_SCHOOL, "Proporcao_Escolas_Privadas"),
        )
        .correlate_aggregated("Proporcao_Escolas_Privadas", "Media_CH", Method::Spearman)
}

/// Every stock analysis, in a stable order
pub fn analyses() -> Vec<Analysis> {
    vec![
        age_income_school(),
        family_background(),
        school(),
        municipality(),
    ]
}
