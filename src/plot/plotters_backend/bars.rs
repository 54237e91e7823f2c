use super::*;

fn label_at<'a>(bars: &[(&'a str, f64)], v: f64) -> &'a str {
    let i = v.round();
    if i < 0.0 {
        return "";
    }
    bars.get(i as usize).map(|(label, _)| *label).unwrap_or("")
}

fn value_range(bars: &[(&str, f64)]) -> std::ops::Range<f64> {
    let max = bars
        .iter()
        .map(|(_, value)| *value)
        .filter(|value| value.is_finite())
        .fold(0.0, f64::max);
    let max = if max > 0.0 { max } else { 1.0 };

    0.0..max * 1.05
}

/// One bar per category, categories along the x axis
pub(crate) fn vertical_bars(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[(&str, f64)],
) -> DrawResult {
    let root_area = SVGBackend::new(path, SIZE).into_drawing_area();
    root_area.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root_area)
        .caption(title, (DEFAULT_FONT, 20))
        .margin((5).percent())
        .set_label_area_size(LabelAreaPosition::Left, (5).percent_width().min(60))
        .set_label_area_size(LabelAreaPosition::Bottom, (10).percent_height().min(60))
        .build_cartesian_2d(-0.5..bars.len() as f64 - 0.5, value_range(bars))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(bars.len())
        .x_label_style((DEFAULT_FONT, 10))
        .x_label_formatter(&|v: &f64| label_at(bars, *v).to_owned())
        .y_label_formatter(&|y| pretty_print_float(*y, false))
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
        let center = i as f64;
        Rectangle::new(
            [(center - 0.4, 0.0), (center + 0.4, *value)],
            DARK_BLUE.mix(0.75).filled(),
        )
    }))?;

    root_area.present()?;
    Ok(())
}

/// One bar per category, categories along the y axis, first entry on top
pub(crate) fn horizontal_bars(
    path: &Path,
    title: &str,
    x_desc: &str,
    bars: &[(&str, f64)],
) -> DrawResult {
    let size = (SIZE.0, 150 + (18 * bars.len() as u32));
    let root_area = SVGBackend::new(path, size).into_drawing_area();
    root_area.fill(&WHITE)?;

    // Entries are drawn bottom-up
    let reversed: Vec<(&str, f64)> = bars.iter().rev().copied().collect();

    let mut chart = ChartBuilder::on(&root_area)
        .caption(title, (DEFAULT_FONT, 20))
        .margin((5).percent())
        .set_label_area_size(LabelAreaPosition::Left, (20).percent_width().min(200))
        .set_label_area_size(LabelAreaPosition::Bottom, (5).percent_height().min(40))
        .build_cartesian_2d(value_range(&reversed), -0.5..reversed.len() as f64 - 0.5)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(x_desc)
        .y_labels(reversed.len())
        .y_label_style((DEFAULT_FONT, 10))
        .y_label_formatter(&|v: &f64| label_at(&reversed, *v).to_owned())
        .x_label_formatter(&|x| pretty_print_float(*x, false))
        .draw()?;

    chart.draw_series(reversed.iter().enumerate().map(|(i, (_, value))| {
        let center = i as f64;
        Rectangle::new(
            [(0.0, center - 0.4), (*value, center + 0.4)],
            DARK_ORANGE.mix(0.75).filled(),
        )
    }))?;

    root_area.present()?;
    Ok(())
}
