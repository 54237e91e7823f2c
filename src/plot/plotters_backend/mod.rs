use super::{Bins, Plotter, Scatter, Stack, HISTOGRAM_BINS};
use crate::error::{Error, Result};
use crate::group::{GroupedStats, Ranking};
use plotters::data::float::pretty_print_float;
use plotters::prelude::*;
use std::path::Path;

static DEFAULT_FONT: FontFamily = FontFamily::SansSerif;
static SIZE: (u32, u32) = (960, 540);
static POINT_SIZE: u32 = 3;

const DARK_BLUE: RGBColor = RGBColor(31, 120, 180);
const DARK_ORANGE: RGBColor = RGBColor(255, 127, 0);
const DARK_RED: RGBColor = RGBColor(227, 26, 28);

const NUM_COLORS: usize = 8;
static STACK_COLORS: [RGBColor; NUM_COLORS] = [
    RGBColor(178, 34, 34),
    RGBColor(46, 139, 87),
    RGBColor(0, 139, 139),
    RGBColor(255, 215, 0),
    RGBColor(0, 0, 139),
    RGBColor(220, 20, 60),
    RGBColor(139, 0, 139),
    RGBColor(0, 255, 127),
];

mod bars;
mod histogram;
mod scatter;

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

fn draw<F>(path: &Path, figure: F) -> Result<()>
where
    F: FnOnce(&Path) -> DrawResult,
{
    if let Some(parent) = path.parent() {
        crate::fs::mkdirp(&parent)?;
    }

    figure(path).map_err(|e| Error::PlotError(format!("{}: {}", path.display(), e)))
}

#[derive(Default)]
pub struct PlottersBackend;

impl Plotter for PlottersBackend {
    fn histogram(&mut self, path: &Path, title: &str, x_desc: &str, values: &[f64]) -> Result<()> {
        draw(path, |path| {
            histogram::histogram_figure(path, title, x_desc, values, HISTOGRAM_BINS)
        })
    }

    fn stacked_histogram(
        &mut self,
        path: &Path,
        title: &str,
        x_desc: &str,
        stacks: &[Stack<'_>],
    ) -> Result<()> {
        draw(path, |path| {
            histogram::stacked_histogram_figure(path, title, x_desc, stacks, HISTOGRAM_BINS)
        })
    }

    fn counts(&mut self, path: &Path, title: &str, grouped: &GroupedStats) -> Result<()> {
        let bars: Vec<(&str, f64)> = grouped
            .groups
            .iter()
            .map(|group| (group.key.as_str(), group.summary.count as f64))
            .collect();

        draw(path, |path| {
            bars::vertical_bars(path, title, &grouped.key, "Records", &bars)
        })
    }

    fn ranking(&mut self, path: &Path, title: &str, ranking: &Ranking) -> Result<()> {
        let bars: Vec<(&str, f64)> = ranking
            .entries
            .iter()
            .map(|(key, value)| (key.as_str(), *value))
            .collect();

        draw(path, |path| {
            bars::horizontal_bars(path, title, ranking.statistic.as_str(), &bars)
        })
    }

    fn scatter(&mut self, path: &Path, title: &str, scatter: &Scatter<'_>) -> Result<()> {
        draw(path, |path| scatter::scatter_figure(path, title, scatter))
    }
}
