//! Run configuration and the runner feeding the reports.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::analysis::{Analysis, AnalysisReport};
use crate::cli::{self, Args};
use crate::error::Result;
use crate::html::Html;
#[cfg(feature = "plotters")]
use crate::plot::PlottersBackend;
use crate::report::{CliReport, CliVerbosity, Report, ReportContext, Reports};
use crate::table::{LoadOptions, Table};

fn stdout_isatty() -> bool {
    atty::is(atty::Stream::Stdout)
}

#[cfg(feature = "plotters")]
fn default_html() -> Option<Html> {
    Some(Html::new(Box::new(PlottersBackend)))
}

#[cfg(not(feature = "plotters"))]
fn default_html() -> Option<Html> {
    None
}

/// Runs a set of analyses over one microdata file and reports on them
///
/// Every report is printed to the console and exported under the output directory:
/// `summary.json` and one CSV per grouping in a directory per analysis, plus SVG charts and
/// HTML pages unless plots are disabled.
///
/// ```no_run
/// use enem_eda::{builtin, Explorer};
///
/// let explorer = Explorer::default()
///     .output_directory("relatorios")
///     .top_k(5)
///     .without_plots();
/// let reports = explorer.run_all("dados.csv", &builtin::analyses()).unwrap();
/// assert_eq!(reports.len(), 4);
/// ```
pub struct Explorer {
    output_directory: PathBuf,
    top_k: usize,
    filter: Option<Regex>,
    load_options: LoadOptions,
    report: Reports,
}

impl Default for Explorer {
    /// Creates an explorer with the default configuration
    ///
    /// - Output directory: `target/enem-eda`
    /// - Ranking size: 10
    /// - Plots and HTML: enabled if built with the `plotters` feature
    /// - Input: `;` separated, Latin-1 encoded
    fn default() -> Explorer {
        let reports = Reports {
            cli_enabled: true,
            cli: CliReport::new(false, CliVerbosity::Normal),
            json_enabled: true,
            csv_enabled: true,
            html: default_html(),
        };

        Explorer {
            output_directory: PathBuf::from(cli::DEFAULT_OUTPUT_DIRECTORY),
            top_k: cli::DEFAULT_TOP_K,
            filter: None,
            load_options: LoadOptions::default(),
            report: reports,
        }
    }
}

impl Explorer {
    /// Changes the directory the reports are written to
    #[must_use]
    pub fn output_directory<P: AsRef<Path>>(mut self, path: P) -> Explorer {
        self.output_directory = path.as_ref().to_owned();
        self
    }

    /// Changes the number of categories in the top and bottom rankings
    ///
    /// Zero is rejected when the analyses run.
    #[must_use]
    pub fn top_k(mut self, k: usize) -> Explorer {
        self.top_k = k;
        self
    }

    /// Enables SVG charts and HTML pages
    #[must_use]
    pub fn with_plots(mut self) -> Explorer {
        self.report.html = default_html();
        if self.report.html.is_none() {
            warn!("Plots were requested but enem-eda was built without the `plotters` feature");
        }
        self
    }

    /// Disables SVG charts and HTML pages
    #[must_use]
    pub fn without_plots(mut self) -> Explorer {
        self.report.html = None;
        self
    }

    /// Only runs the analyses whose id matches the regular expression `filter`
    pub fn with_filter<S: AsRef<str>>(mut self, filter: S) -> Result<Explorer> {
        self.filter = Some(Regex::new(filter.as_ref())?);
        Ok(self)
    }

    /// Changes how the input file is read
    #[must_use]
    pub fn load_options(mut self, options: LoadOptions) -> Explorer {
        self.load_options = options;
        self
    }

    /// Enables or disables the colors of the console report
    #[must_use]
    pub fn with_text_coloring(mut self, enabled: bool) -> Explorer {
        self.report.cli.enable_text_coloring = enabled;
        self
    }

    /// Disables the console report
    #[must_use]
    pub fn without_console(mut self) -> Explorer {
        self.report.cli_enabled = false;
        self
    }

    #[doc(hidden)]
    pub fn configure_from_args(mut self, args: &Args) -> Result<Explorer> {
        self = self
            .output_directory(&args.output_directory)
            .top_k(args.top)
            .with_text_coloring(args.color.enabled(stdout_isatty()));

        if args.no_plot {
            self = self.without_plots();
        }

        if let Some(filter) = &args.filter {
            self = self.with_filter(filter)?;
        }

        self.report.cli.verbosity = if args.verbose {
            CliVerbosity::Verbose
        } else if args.quiet {
            CliVerbosity::Quiet
        } else {
            CliVerbosity::Normal
        };

        Ok(self)
    }

    fn filter_matches(&self, id: &str) -> bool {
        match &self.filter {
            Some(regex) => regex.is_match(id),
            None => true,
        }
    }

    /// Prints the id and title of every analysis the filter lets through
    pub fn list(&self, analyses: &[Analysis]) {
        for analysis in analyses.iter().filter(|a| self.filter_matches(a.id())) {
            println!("{}: {}", analysis.id(), analysis.title());
        }
    }

    /// Loads the microdata file at `path` and runs every analysis the filter lets through
    ///
    /// The input is loaded once and shared by the analyses. Unreadable input and columns
    /// absent from it are fatal; failing to write a report is only logged.
    pub fn run_all<P: AsRef<Path>>(
        &self,
        path: P,
        analyses: &[Analysis],
    ) -> Result<Vec<AnalysisReport>> {
        let selected: Vec<&Analysis> = analyses
            .iter()
            .filter(|analysis| self.filter_matches(analysis.id()))
            .collect();

        if selected.is_empty() {
            warn!("No analysis matches the filter");
            return Ok(Vec::new());
        }

        info!("Loading {:?}", path.as_ref());
        let table = Table::load(path, &self.load_options)?;
        info!("Loaded {} records", table.len());

        let context = ReportContext {
            output_directory: self.output_directory.clone(),
        };

        let mut reports = Vec::with_capacity(selected.len());
        for analysis in selected {
            self.report.analysis_start(analysis, &context);
            let report = analysis.run(&table, self.top_k)?;
            self.report.analysis_complete(&report, &context);
            reports.push(report);
        }

        self.report.final_summary(&reports, &context);
        Ok(reports)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::builtin;

    #[test]
    fn filter_selects_by_id() {
        let explorer = Explorer::default().with_filter("^school$").unwrap();

        assert!(explorer.filter_matches("school"));
        assert!(!explorer.filter_matches("municipality"));
    }

    #[test]
    fn invalid_filter() {
        assert!(Explorer::default().with_filter("(").is_err());
    }

    #[test]
    fn nothing_selected_loads_nothing() {
        let explorer = Explorer::default()
            .without_console()
            .with_filter("^nope$")
            .unwrap();

        let reports = explorer
            .run_all("does/not/exist.csv", &builtin::analyses())
            .unwrap();
        assert!(reports.is_empty());
    }

    #[test]
    fn unreadable_input_is_fatal() {
        let explorer = Explorer::default().without_console().without_plots();

        assert!(explorer
            .run_all("does/not/exist.csv", &builtin::analyses())
            .is_err());
    }

    #[test]
    fn configured_from_args() {
        let args = Args {
            input: Some(PathBuf::from("dados.csv")),
            filter: Some("school".to_owned()),
            output_directory: PathBuf::from("out"),
            top: 3,
            no_plot: true,
            color: cli::Color::Never,
            verbose: false,
            quiet: true,
            list: false,
        };

        let explorer = Explorer::default().configure_from_args(&args).unwrap();

        assert_eq!(explorer.output_directory, PathBuf::from("out"));
        assert_eq!(explorer.top_k, 3);
        assert!(explorer.report.html.is_none());
        assert!(!explorer.report.cli.enable_text_coloring);
        assert_eq!(explorer.report.cli.verbosity, CliVerbosity::Quiet);
        assert!(explorer.filter_matches("school"));
    }
}
