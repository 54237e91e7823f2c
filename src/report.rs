use crate::analysis::{Analysis, AnalysisReport};
use crate::csv_report::FileCsvReport;
use crate::format;
use crate::fs;
use crate::group::{GroupedStats, Ranking, Summary};
use crate::html::Html;
use crate::outlier::Outcome;
use crate::Correlation;

use anes::{Attribute, Color, ResetAttributes, SetAttribute, SetForegroundColor};
use std::cmp;
use std::path::{Path, PathBuf};

const MAX_DIRECTORY_NAME_LEN: usize = 64;

fn truncate_to_character_boundary(s: &mut String, max_len: usize) {
    let mut boundary = cmp::min(max_len, s.len());
    while !s.is_char_boundary(boundary) {
        boundary -= 1;
    }
    s.truncate(boundary);
}

pub fn make_filename_safe(string: &str) -> String {
    let mut string = string.replace(
        &['?', '"', '/', '\\', '*', '<', '>', ':', '|', '^', ' '][..],
        "_",
    );

    // Truncate to last character boundary before max length...
    truncate_to_character_boundary(&mut string, MAX_DIRECTORY_NAME_LEN);

    if cfg!(target_os = "windows") {
        // On Windows, file names are not case-sensitive, so lowercase everything.
        string = string.to_lowercase();
    }

    string
}

pub struct ReportContext {
    pub output_directory: PathBuf,
}
impl ReportContext {
    pub fn report_path<P: AsRef<Path> + ?Sized>(&self, id: &str, file_name: &P) -> PathBuf {
        let mut path = self.output_directory.clone();
        path.push(make_filename_safe(id));
        path.push(file_name);
        path
    }
}

pub(crate) trait Report {
    fn analysis_start(&self, _analysis: &Analysis, _context: &ReportContext) {}
    fn analysis_complete(&self, _report: &AnalysisReport, _context: &ReportContext) {}
    fn final_summary(&self, _reports: &[AnalysisReport], _context: &ReportContext) {}
}

pub(crate) struct Reports {
    pub(crate) cli_enabled: bool,
    pub(crate) cli: CliReport,
    pub(crate) json_enabled: bool,
    pub(crate) csv_enabled: bool,
    pub(crate) html: Option<Html>,
}
macro_rules! reports_impl {
    (fn $name:ident(&self, $($argn:ident: $argt:ty),*)) => {
        fn $name(&self, $($argn: $argt),* ) {
            if self.cli_enabled {
                self.cli.$name($($argn),*);
            }
            if self.json_enabled {
                JsonReport.$name($($argn),*);
            }
            if self.csv_enabled {
                FileCsvReport.$name($($argn),*);
            }
            if let Some(reporter) = &self.html {
                reporter.$name($($argn),*);
            }
        }
    };
}

impl Report for Reports {
    reports_impl!(fn analysis_start(&self, analysis: &Analysis, context: &ReportContext));
    reports_impl!(fn analysis_complete(&self, report: &AnalysisReport, context: &ReportContext));
    reports_impl!(fn final_summary(&self, reports: &[AnalysisReport], context: &ReportContext));
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum CliVerbosity {
    Quiet,
    Normal,
    Verbose,
}

pub(crate) struct CliReport {
    pub enable_text_coloring: bool,
    pub verbosity: CliVerbosity,
}
impl CliReport {
    pub fn new(enable_text_coloring: bool, verbosity: CliVerbosity) -> CliReport {
        CliReport {
            enable_text_coloring,
            verbosity,
        }
    }

    fn with_color(&self, color: Color, s: &str) -> String {
        if self.enable_text_coloring {
            format!("{}{}{}", SetForegroundColor(color), s, ResetAttributes)
        } else {
            String::from(s)
        }
    }

    fn green(&self, s: &str) -> String {
        self.with_color(Color::DarkGreen, s)
    }

    fn yellow(&self, s: &str) -> String {
        self.with_color(Color::DarkYellow, s)
    }

    fn bold(&self, s: String) -> String {
        if self.enable_text_coloring {
            format!("{}{}{}", SetAttribute(Attribute::Bold), s, ResetAttributes)
        } else {
            s
        }
    }

    fn faint(&self, s: String) -> String {
        if self.enable_text_coloring {
            format!("{}{}{}", SetAttribute(Attribute::Faint), s, ResetAttributes)
        } else {
            s
        }
    }

    pub fn outliers(&self, outcome: &Outcome) {
        let fences = &outcome.fences;
        println!(
            "Fences of {}: [{} {}] (Q1 = {}, Q3 = {}, IQR = {})",
            outcome.column,
            self.bold(format::short(fences.lower)),
            self.bold(format::short(fences.upper)),
            format::short(fences.q1),
            format::short(fences.q3),
            format::short(fences.iqr),
        );

        let counts = &outcome.counts;
        let noutliers = counts.outliers();
        let sample_size = counts.total();

        if noutliers == 0 {
            return;
        }

        let percent = |n: usize| 100. * n as f64 / sample_size as f64;

        println!(
            "{}",
            self.yellow(&format!(
                "Found {} outliers among {} records ({:.2}%)",
                format::integer(noutliers),
                format::integer(sample_size),
                percent(noutliers)
            ))
        );

        if !matches!(self.verbosity, CliVerbosity::Verbose) {
            return;
        }

        let print = |n, label| {
            if n != 0 {
                println!("  {} ({:.2}%) {}", n, percent(n), label);
            }
        };

        print(counts.low_severe, "low severe");
        print(counts.low_mild, "low mild");
        print(counts.high_mild, "high mild");
        print(counts.high_severe, "high severe");
    }

    fn summary_header(&self, width: usize, key: &str) -> String {
        self.faint(format!(
            "{:<width$} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            key,
            "count",
            "mean",
            "std",
            "min",
            "25%",
            "50%",
            "75%",
            "max",
            width = width
        ))
    }

    fn summary_row(width: usize, key: &str, s: &Summary) -> String {
        format!(
            "{:<width$} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            key,
            s.count,
            format::short(s.mean),
            format::short(s.std_dev),
            format::short(s.min),
            format::short(s.p25),
            format::short(s.median),
            format::short(s.p75),
            format::short(s.max),
            width = width
        )
    }

    pub fn grouped(&self, grouped: &GroupedStats) {
        println!();
        println!("{} by {}:", grouped.target, self.bold(grouped.key.clone()));

        if grouped.groups.is_empty() {
            println!("  (no records)");
            return;
        }

        let width = grouped
            .groups
            .iter()
            .map(|group| group.key.chars().count())
            .max()
            .unwrap_or(0)
            .max(grouped.key.chars().count());

        println!("  {}", self.summary_header(width, &grouped.key));
        for group in &grouped.groups {
            println!("  {}", CliReport::summary_row(width, &group.key, &group.summary));
        }
    }

    pub fn correlation(&self, correlation: &Correlation) {
        println!(
            "{} correlation between {} and {}: r = {} (p = {}, n = {})",
            correlation.method,
            correlation.columns.0,
            correlation.columns.1,
            self.bold(format::short(correlation.coefficient)),
            format::p_value(correlation.p_value),
            format::integer(correlation.n)
        );
    }

    pub fn ranking(&self, ranking: &Ranking) {
        println!();
        println!("{}:", ranking.title());

        let width = ranking
            .entries
            .iter()
            .map(|(key, _)| key.chars().count())
            .max()
            .unwrap_or(0);
        for (position, (key, value)) in ranking.entries.iter().enumerate() {
            println!(
                "  {:>2}. {:<width$} {:>8}",
                position + 1,
                key,
                format::short(*value),
                width = width
            );
        }
    }
}
impl Report for CliReport {
    fn analysis_start(&self, analysis: &Analysis, _: &ReportContext) {
        println!(
            "{} {}",
            self.green(&self.bold(analysis.title().to_owned())),
            self.faint(format!("({})", analysis.id()))
        );
    }

    fn analysis_complete(&self, report: &AnalysisReport, _: &ReportContext) {
        let records = &report.records;
        println!(
            "Records: {} read, {} complete, {} analyzed",
            format::integer(records.raw),
            format::integer(records.complete),
            format::integer(records.analyzed)
        );

        if !matches!(self.verbosity, CliVerbosity::Quiet) {
            if let Some(outcome) = &report.outliers {
                self.outliers(outcome);
            }

            println!();
            let width = report.score.chars().count().max(3);
            println!("  {}", self.summary_header(width, &report.score));
            println!(
                "  {}",
                CliReport::summary_row(width, "all", &report.overall)
            );

            for grouped in &report.groups {
                self.grouped(grouped);
            }
        }

        if !report.correlations.is_empty() {
            println!();
        }
        for correlation in &report.correlations {
            self.correlation(correlation);
        }

        if let Some(aggregate) = &report.aggregate {
            println!();
            println!(
                "{} rows by {}",
                format::integer(aggregate.rows),
                self.bold(aggregate.aggregation.key.clone())
            );

            if !matches!(self.verbosity, CliVerbosity::Quiet) {
                for ranking in &aggregate.rankings {
                    self.ranking(ranking);
                }
                println!();
            }

            for correlation in &aggregate.correlations {
                self.correlation(correlation);
            }
        }

        println!();
    }

    fn final_summary(&self, reports: &[AnalysisReport], context: &ReportContext) {
        if matches!(self.verbosity, CliVerbosity::Quiet) {
            return;
        }

        println!(
            "{} analyses complete, reports written to {}",
            reports.len(),
            context.output_directory.display()
        );
    }
}

pub struct JsonReport;
impl Report for JsonReport {
    fn analysis_complete(&self, report: &AnalysisReport, context: &ReportContext) {
        let path = context.report_path(&report.id, "summary.json");
        log_if_err!(fs::save(report, &path));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_make_filename_safe_replaces_characters() {
        let input = "?/\\*\" ";
        let safe = make_filename_safe(input);
        assert_eq!("______", &safe);
    }

    #[test]
    fn test_make_filename_safe_truncates_long_strings() {
        let input = "this_is_a_very_long_string._it_is_too_long_to_be_safe_as_a_directory_name,_and_so_it_needs_to_be_truncated.";
        let safe = make_filename_safe(input);
        assert!(input.len() > MAX_DIRECTORY_NAME_LEN);
        assert_eq!(&input[0..MAX_DIRECTORY_NAME_LEN], &safe);
    }

    #[test]
    fn test_make_filename_safe_respects_character_boundaries() {
        let input = "Escolaridade_Paisçççççççççççççççççççççççççççççççççççççççççççççç";
        let safe = make_filename_safe(input);
        assert!(safe.len() <= MAX_DIRECTORY_NAME_LEN);
        assert!(safe.starts_with("Escolaridade_Pais"));
    }

    #[test]
    fn report_paths_live_under_the_analysis_directory() {
        let context = ReportContext {
            output_directory: PathBuf::from("target/enem-eda"),
        };

        assert_eq!(
            context.report_path("age-income-school", "summary.json"),
            PathBuf::from("target/enem-eda/age-income-school/summary.json")
        );
    }
}
