use crate::analysis::{Analysis, AnalysisReport};
use crate::error::{log_error, Result};
use crate::format;
use crate::fs;
use crate::group::{self, GroupedStats, Ranking, Summary};
use crate::outlier::Outcome;
use crate::plot::{Plotter, Scatter, Stack};
use crate::report::{make_filename_safe, Report, ReportContext};
use crate::Correlation;
use serde::Serialize;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tinytemplate::TinyTemplate;

fn debug_context<S: Serialize>(path: &Path, context: &S) {
    if crate::debug_enabled() {
        let mut context_path = PathBuf::from(path);
        context_path.set_extension("json");
        println!("Writing report context to {:?}", context_path);
        let result = fs::save(context, &context_path);
        if let Err(e) = result {
            error!("Failed to write report context debug output: {}", e);
        }
    }
}

#[derive(Serialize)]
struct Plot {
    name: String,
    url: String,
}

#[derive(Serialize)]
struct SummaryRow {
    name: String,
    count: String,
    mean: String,
    std_dev: String,
    min: String,
    p25: String,
    median: String,
    p75: String,
    max: String,
}
impl SummaryRow {
    fn new(name: &str, summary: &Summary) -> SummaryRow {
        SummaryRow {
            name: name.to_owned(),
            count: format::integer(summary.count),
            mean: format::short(summary.mean),
            std_dev: format::short(summary.std_dev),
            min: format::short(summary.min),
            p25: format::short(summary.p25),
            median: format::short(summary.median),
            p75: format::short(summary.p75),
            max: format::short(summary.max),
        }
    }
}

#[derive(Serialize)]
struct GroupTable {
    key: String,
    rows: Vec<SummaryRow>,
}
impl GroupTable {
    fn new(grouped: &GroupedStats) -> GroupTable {
        GroupTable {
            key: grouped.key.clone(),
            rows: grouped
                .groups
                .iter()
                .map(|group| SummaryRow::new(&group.key, &group.summary))
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct OutlierContext {
    column: String,
    q1: String,
    q3: String,
    iqr: String,
    lower: String,
    upper: String,
    removed: String,
    share: String,
}
impl OutlierContext {
    fn new(outcome: &Outcome) -> OutlierContext {
        let fences = &outcome.fences;
        let share = if outcome.before == 0 {
            0.0
        } else {
            outcome.removed() as f64 / outcome.before as f64
        };

        OutlierContext {
            column: outcome.column.clone(),
            q1: format::short(fences.q1),
            q3: format::short(fences.q3),
            iqr: format::short(fences.iqr),
            lower: format::short(fences.lower),
            upper: format::short(fences.upper),
            removed: format::integer(outcome.removed()),
            share: format::percent(share),
        }
    }
}

#[derive(Serialize)]
struct CorrelationRow {
    method: String,
    a: String,
    b: String,
    coefficient: String,
    p_value: String,
    n: String,
}
impl CorrelationRow {
    fn new(correlation: &Correlation) -> CorrelationRow {
        CorrelationRow {
            method: correlation.method.to_string(),
            a: correlation.columns.0.clone(),
            b: correlation.columns.1.clone(),
            coefficient: format::short(correlation.coefficient),
            p_value: format::p_value(correlation.p_value),
            n: format::integer(correlation.n),
        }
    }
}

#[derive(Serialize)]
struct RankingEntry {
    position: usize,
    name: String,
    value: String,
}

#[derive(Serialize)]
struct RankingTable {
    title: String,
    entries: Vec<RankingEntry>,
}
impl RankingTable {
    fn new(ranking: &Ranking) -> RankingTable {
        RankingTable {
            title: ranking.title(),
            entries: ranking
                .entries
                .iter()
                .enumerate()
                .map(|(i, (name, value))| RankingEntry {
                    position: i + 1,
                    name: name.clone(),
                    value: format::short(*value),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct AggregateContext {
    key: String,
    rows: String,
    rankings: Vec<RankingTable>,
    correlations: Vec<CorrelationRow>,
}

#[derive(Serialize)]
struct Context {
    id: String,
    title: String,
    score: String,

    raw: String,
    complete: String,
    analyzed: String,

    outliers: Option<OutlierContext>,
    overall: SummaryRow,
    groups: Vec<GroupTable>,
    correlations: Vec<CorrelationRow>,
    aggregate: Option<AggregateContext>,

    plots: Vec<Plot>,
}

#[derive(Serialize)]
struct IndexEntry {
    id: String,
    title: String,
    path: String,
    analyzed: String,
}

#[derive(Serialize)]
struct IndexContext {
    analyses: Vec<IndexEntry>,
}

pub struct Html {
    templates: TinyTemplate<'static>,
    plotter: RefCell<Box<dyn Plotter>>,
}
impl Html {
    pub(crate) fn new(plotter: Box<dyn Plotter>) -> Html {
        let mut templates = TinyTemplate::new();
        templates
            .add_template("index", include_str!("index.html.tt"))
            .expect("Unable to parse index template.");
        templates
            .add_template("analysis_report", include_str!("analysis_report.html.tt"))
            .expect("Unable to parse analysis_report template");

        let plotter = RefCell::new(plotter);
        Html { templates, plotter }
    }

    fn render<S: Serialize>(&self, template: &str, context: &S, path: &Path) -> Result<()> {
        debug_context(path, context);
        let text = self.templates.render(template, context)?;
        fs::save_string(&text, &path)
    }
}
impl Report for Html {
    fn analysis_start(&self, analysis: &Analysis, context: &ReportContext) {
        info!(
            "Writing HTML report of {} to {:?}",
            analysis.id(),
            context.report_path(analysis.id(), "index.html")
        );
    }

    fn analysis_complete(&self, report: &AnalysisReport, context: &ReportContext) {
        let plots = self.generate_plots(report, context);

        let aggregate = report.aggregate.as_ref().map(|aggregate| AggregateContext {
            key: aggregate.aggregation.key.clone(),
            rows: format::integer(aggregate.rows),
            rankings: aggregate.rankings.iter().map(RankingTable::new).collect(),
            correlations: aggregate
                .correlations
                .iter()
                .map(CorrelationRow::new)
                .collect(),
        });

        let html_context = Context {
            id: report.id.clone(),
            title: report.title.clone(),
            score: report.score.clone(),

            raw: format::integer(report.records.raw),
            complete: format::integer(report.records.complete),
            analyzed: format::integer(report.records.analyzed),

            outliers: report.outliers.as_ref().map(OutlierContext::new),
            overall: SummaryRow::new("all", &report.overall),
            groups: report.groups.iter().map(GroupTable::new).collect(),
            correlations: report.correlations.iter().map(CorrelationRow::new).collect(),
            aggregate,

            plots,
        };

        let report_path = context.report_path(&report.id, "index.html");
        log_if_err!(self.render("analysis_report", &html_context, &report_path));
    }

    fn final_summary(&self, reports: &[AnalysisReport], context: &ReportContext) {
        let output_directory = &context.output_directory;
        try_else_return!(fs::mkdirp(output_directory));

        let analyses = reports
            .iter()
            .map(|report| IndexEntry {
                id: report.id.clone(),
                title: report.title.clone(),
                path: format!("{}/index.html", make_filename_safe(&report.id)),
                analyzed: format::integer(report.records.analyzed),
            })
            .collect();

        let report_path = output_directory.join("index.html");
        log_if_err!(self.render("index", &IndexContext { analyses }, &report_path));
    }
}

// Keeps the plot if it was drawn, logs the failure otherwise
fn keep(plots: &mut Vec<Plot>, name: String, url: String, result: Result<()>) {
    match result {
        Ok(()) => plots.push(Plot { name, url }),
        Err(e) => log_error(&e),
    }
}

impl Html {
    fn generate_plots(&self, report: &AnalysisReport, context: &ReportContext) -> Vec<Plot> {
        let mut plots = Vec::new();
        let mut plotter = self.plotter.borrow_mut();
        let path = |file: &str| context.report_path(&report.id, file);

        let scores = try_else_return!(report.table.numeric(&report.score), || plots);
        let scores: Vec<f64> = scores.iter().flatten().copied().collect();
        if scores.is_empty() {
            warn!("No records left in {}, skipping its plots", report.id);
            return plots;
        }

        let url = "histogram.svg".to_owned();
        let title = format!("Distribution of {}", report.score);
        let result = plotter.histogram(&path(&url), &title, &report.score, &scores);
        keep(&mut plots, title, url, result);

        for grouped in &report.groups {
            let safe_key = make_filename_safe(&grouped.key);

            let partition = match group::partition(&report.table, &grouped.key, &report.score) {
                Ok(partition) => partition,
                Err(e) => {
                    log_error(&e);
                    continue;
                }
            };
            let stacks: Vec<Stack<'_>> = partition
                .iter()
                .map(|(label, values)| Stack { label, values })
                .collect();

            let url = format!("{}_stacked.svg", safe_key);
            let title = format!("{} by {}", report.score, grouped.key);
            let result = plotter.stacked_histogram(&path(&url), &title, &report.score, &stacks);
            keep(&mut plots, title, url, result);

            let url = format!("{}_counts.svg", safe_key);
            let title = format!("Records by {}", grouped.key);
            let result = plotter.counts(&path(&url), &title, grouped);
            keep(&mut plots, title, url, result);
        }

        let aggregate = match &report.aggregate {
            Some(aggregate) => aggregate,
            None => return plots,
        };

        for ranking in &aggregate.rankings {
            if ranking.entries.is_empty() {
                continue;
            }

            let title = format!("{}: {}", aggregate.aggregation.key, ranking.title());
            let url = format!("{}.svg", make_filename_safe(&ranking.title().to_lowercase()));
            let result = plotter.ranking(&path(&url), &title, ranking);
            keep(&mut plots, title, url, result);
        }

        for correlation in &aggregate.correlations {
            let (a, b) = &correlation.columns;
            let scatter = match scatter(&aggregate.table, &aggregate.aggregation.key, a, b) {
                Ok(scatter) => scatter,
                Err(e) => {
                    log_error(&e);
                    continue;
                }
            };
            if scatter.points.is_empty() {
                continue;
            }

            let title = format!("{} vs {}", b, a);
            let url = format!("{}_{}.svg", make_filename_safe(a), make_filename_safe(b));
            let result = plotter.scatter(&path(&url), &title, &scatter);
            keep(&mut plots, title, url, result);
        }

        plots
    }
}

// The rows of `table` where both `a` and `b` are present, labelled by `key`
fn scatter<'a>(
    table: &crate::table::Table,
    key: &str,
    a: &'a str,
    b: &'a str,
) -> Result<Scatter<'a>> {
    let keys = table.column(key)?;
    let xs = table.numeric(a)?;
    let ys = table.numeric(b)?;

    let mut points = Vec::new();
    let mut labels = Vec::new();
    for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
        if let (Some(x), Some(y)) = (x, y) {
            points.push((*x, *y));
            labels.push(keys.key(i).map(|k| k.into_owned()).unwrap_or_default());
        }
    }

    Ok(Scatter {
        x_desc: a,
        y_desc: b,
        points,
        labels,
    })
}
