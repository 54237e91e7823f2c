use enem_eda::{builtin, Explorer};
use serde_json::value::Value;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use walkdir::WalkDir;

/*
 * A small Latin-1 extract with the microdata layout: 14 records, one with a missing cell,
 * one with a malformed score and one score far above the others.
 */
const MICRODATA: &[u8] = b"\
NU_NOTA_CH;TP_FAIXA_ETARIA;TP_ESCOLA;TP_LOCALIZACAO_ESC;SG_UF_ESC;NO_MUNICIPIO_PROVA;Q001;Q006;Q025
512.3;3;2;1;PE;Recife;E;C;B
601.7;2;3;1;PE;Recife;G;Q;B
455.0;12;2;2;PE;Caruaru;B;A;A
530.2;5;2;1;SP;S\xe3o Paulo;H;E;B
588.8;4;3;1;SP;S\xe3o Paulo;F;K;B
470.1;1;1;2;PE;Caruaru;A;B;A
540.0;3;2;1;PE;Recife;D;D;B
505.5;6;2;1;SP;S\xe3o Paulo;C;C;B
620.4;2;3;1;SP;S\xe3o Paulo;G;M;B
480.9;8;2;2;PE;Caruaru;B;B;A
560.0;4;3;1;PE;Recife;E;F;B
990.0;3;3;1;SP;S\xe3o Paulo;H;Q;B
533.3;3;2;1;PE;;E;C;B
abc;3;2;1;PE;Recife;E;C;B
";

fn temp_dir() -> TempDir {
    tempdir().unwrap()
}

fn write_microdata(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("MICRODADOS_ENEM.csv");
    fs::write(&path, MICRODATA).unwrap();
    path
}

fn quiet_explorer(dir: &TempDir) -> Explorer {
    Explorer::default()
        .output_directory(dir.path().join("reports"))
        .without_console()
}

fn verify_file(dir: &Path, path: &str) -> PathBuf {
    let full_path = dir.join(path);
    assert!(
        full_path.is_file(),
        "File {:?} does not exist or is not a file",
        full_path
    );
    let metadata = full_path.metadata().unwrap();
    assert!(metadata.len() > 0);
    full_path
}

fn verify_json(dir: &Path, path: &str) -> Value {
    let full_path = verify_file(dir, path);
    let f = File::open(full_path).unwrap();
    serde_json::from_reader::<File, Value>(f).unwrap()
}

fn count_svgs(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().and_then(|ext| ext.to_str()) == Some("svg"))
        .count()
}

#[test]
fn test_records_are_cleaned_then_filtered() {
    let dir = temp_dir();
    let input = write_microdata(&dir);

    let reports = quiet_explorer(&dir)
        .without_plots()
        .run_all(&input, &builtin::analyses())
        .unwrap();
    assert_eq!(reports.len(), 4);

    for report in &reports {
        assert_eq!(report.records.raw, 14, "{}", report.id);
        assert_eq!(report.records.complete, 12, "{}", report.id);
    }

    let school = reports.iter().find(|r| r.id == "school").unwrap();
    let outcome = school.outliers.as_ref().unwrap();
    assert_eq!(outcome.removed(), 1);
    assert_eq!(school.records.analyzed, 11);
    assert!(school.overall.max < 990.0);

    let family = reports.iter().find(|r| r.id == "family-background").unwrap();
    assert!(family.outliers.is_none());
    assert_eq!(family.records.analyzed, 12);
}

#[test]
fn test_exports() {
    let dir = temp_dir();
    let input = write_microdata(&dir);
    let out = dir.path().join("reports");

    quiet_explorer(&dir)
        .without_plots()
        .run_all(&input, &builtin::analyses())
        .unwrap();

    let summary = verify_json(&out, "school/summary.json");
    assert_eq!(summary["records"]["raw"], 14);
    assert_eq!(summary["id"], "school");

    verify_file(&out, "school/Tipo_Escola.csv");
    verify_file(&out, "age-income-school/Renda_Familiar.csv");

    let aggregate = verify_file(&out, "municipality/aggregate.csv");
    let mut reader = csv::Reader::from_path(aggregate).unwrap();
    let municipalities: Vec<String> = reader
        .records()
        .map(|record| record.unwrap()[0].to_owned())
        .collect();
    assert!(municipalities.contains(&"São Paulo".to_owned()));

    assert_eq!(count_svgs(&out), 0);
    assert!(!out.join("index.html").exists());
}

#[test]
fn test_filter() {
    let dir = temp_dir();
    let input = write_microdata(&dir);
    let out = dir.path().join("reports");

    let reports = quiet_explorer(&dir)
        .without_plots()
        .with_filter("^school$")
        .unwrap()
        .run_all(&input, &builtin::analyses())
        .unwrap();

    assert_eq!(reports.len(), 1);
    assert!(out.join("school").is_dir());
    assert!(!out.join("municipality").exists());
}

#[test]
fn test_missing_column_is_fatal() {
    let dir = temp_dir();
    let path = dir.path().join("incomplete.csv");
    fs::write(&path, "NU_NOTA_CH;TP_ESCOLA\n500.0;2\n").unwrap();

    let result = quiet_explorer(&dir)
        .without_plots()
        .with_filter("^school$")
        .unwrap()
        .run_all(&path, &builtin::analyses());

    let message = result.unwrap_err().to_string();
    assert!(message.contains("TP_LOCALIZACAO_ESC"), "{}", message);
}

#[cfg(feature = "plotters")]
#[test]
fn test_plots_and_html() {
    let dir = temp_dir();
    let input = write_microdata(&dir);
    let out = dir.path().join("reports");

    quiet_explorer(&dir)
        .with_plots()
        .run_all(&input, &builtin::analyses())
        .unwrap();

    verify_file(&out, "index.html");
    verify_file(&out, "school/index.html");
    verify_file(&out, "school/histogram.svg");
    verify_file(&out, "school/Tipo_Escola_stacked.svg");
    verify_file(&out, "school/Tipo_Escola_counts.svg");
    verify_file(&out, "municipality/index.html");

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains("school/index.html"));
}
