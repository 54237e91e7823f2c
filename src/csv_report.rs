use crate::analysis::AnalysisReport;
use crate::error::{Error, Result};
use crate::group::GroupedStats;
use crate::report::{make_filename_safe, Report, ReportContext};
use crate::table::{Column, Table};
use csv::Writer;
use serde_derive::Serialize;
use std::fs::File;
use std::path::Path;

#[derive(Serialize)]
struct CsvRow<'a> {
    grouping: &'a str,
    category: &'a str,
    count: usize,
    mean: f64,
    std_dev: f64,
    min: f64,
    p25: f64,
    median: f64,
    p75: f64,
    max: f64,
}

struct CsvReportWriter<'a> {
    writer: Writer<File>,
    path: &'a Path,
}
impl<'a> CsvReportWriter<'a> {
    fn create(path: &'a Path) -> Result<CsvReportWriter<'a>> {
        if let Some(parent) = path.parent() {
            crate::fs::mkdirp(&parent)?;
        }

        let writer = Writer::from_path(path).map_err(|inner| Error::CsvError {
            path: path.to_owned(),
            inner,
        })?;
        Ok(CsvReportWriter { writer, path })
    }

    fn csv_error(&self, inner: csv::Error) -> Error {
        Error::CsvError {
            path: self.path.to_owned(),
            inner,
        }
    }

    fn write_grouped(&mut self, grouped: &GroupedStats) -> Result<()> {
        for group in &grouped.groups {
            let s = &group.summary;
            let row = CsvRow {
                grouping: &grouped.key,
                category: &group.key,
                count: s.count,
                mean: s.mean,
                std_dev: s.std_dev,
                min: s.min,
                p25: s.p25,
                median: s.median,
                p75: s.p75,
                max: s.max,
            };
            self.writer
                .serialize(row)
                .map_err(|inner| self.csv_error(inner))?;
        }
        self.flush()
    }

    fn write_table(&mut self, table: &Table) -> Result<()> {
        self.writer
            .write_record(table.names())
            .map_err(|inner| self.csv_error(inner))?;

        for row in 0..table.len() {
            let mut record = Vec::with_capacity(table.names().len());
            for name in table.names() {
                let cell = match table.column(name)? {
                    Column::Text(cells) => cells[row].clone(),
                    Column::Numeric(cells) => cells[row].map(|x| x.to_string()),
                };
                record.push(cell.unwrap_or_default());
            }
            self.writer
                .write_record(&record)
                .map_err(|inner| self.csv_error(inner))?;
        }
        self.flush()
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|inner| Error::AccessError {
            path: self.path.to_owned(),
            inner,
        })
    }
}

pub struct FileCsvReport;
impl FileCsvReport {
    fn write_grouped(&self, path: &Path, grouped: &GroupedStats) -> Result<()> {
        CsvReportWriter::create(path)?.write_grouped(grouped)
    }

    fn write_table(&self, path: &Path, table: &Table) -> Result<()> {
        CsvReportWriter::create(path)?.write_table(table)
    }
}

impl Report for FileCsvReport {
    fn analysis_complete(&self, report: &AnalysisReport, context: &ReportContext) {
        for grouped in &report.groups {
            let file_name = format!("{}.csv", make_filename_safe(&grouped.key));
            let path = context.report_path(&report.id, &file_name);
            log_if_err!(self.write_grouped(&path, grouped));
        }

        if let Some(aggregate) = &report.aggregate {
            let path = context.report_path(&report.id, "aggregate.csv");
            log_if_err!(self.write_table(&path, &aggregate.table));
        }
    }
}

#[cfg(test)]
mod test {
    use tempfile::tempdir;

    use super::FileCsvReport;
    use crate::group::group_by;
    use crate::table::{Column, Table};

    #[test]
    fn one_row_per_category() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("age-income-school").join("Tipo_Escola.csv");
        let table = Table::from_columns(vec![
            (
                "Tipo_Escola",
                Column::Text(vec![
                    Some("Pública".to_owned()),
                    Some("Privada".to_owned()),
                    Some("Pública".to_owned()),
                ]),
            ),
            (
                "NU_NOTA_CH",
                Column::Numeric(vec![Some(500.0), Some(600.0), Some(520.0)]),
            ),
        ]);
        let grouped = group_by(&table, "Tipo_Escola", "NU_NOTA_CH").unwrap();

        FileCsvReport.write_grouped(&path, &grouped).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "grouping");
        assert_eq!(&headers[1], "category");
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Pública");
        assert_eq!(&rows[0][2], "2");
        assert_eq!(rows[0][3].parse::<f64>().unwrap(), 510.0);
    }

    #[test]
    fn missing_cells_are_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aggregate.csv");
        let table = Table::from_columns(vec![
            ("k", Column::Text(vec![Some("a".to_owned()), None])),
            ("x", Column::Numeric(vec![None, Some(1.5)])),
        ]);

        FileCsvReport.write_table(&path, &table).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "k,x\na,\n,1.5\n");
    }
}
