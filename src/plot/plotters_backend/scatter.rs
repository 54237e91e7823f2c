use super::*;

/// Points are only labelled up to this many
const MAX_LABELS: usize = 50;

pub(crate) fn scatter_figure(path: &Path, title: &str, scatter: &Scatter<'_>) -> DrawResult {
    let x_range = plotters::data::fitting_range(scatter.points.iter().map(|(x, _)| x));
    let y_range = plotters::data::fitting_range(scatter.points.iter().map(|(_, y)| y));

    let root_area = SVGBackend::new(path, SIZE).into_drawing_area();
    root_area.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root_area)
        .caption(title, (DEFAULT_FONT, 20))
        .margin((5).percent())
        .set_label_area_size(LabelAreaPosition::Left, (5).percent_width().min(60))
        .set_label_area_size(LabelAreaPosition::Bottom, (5).percent_height().min(40))
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(scatter.x_desc)
        .y_desc(scatter.y_desc)
        .x_label_formatter(&|x| pretty_print_float(*x, false))
        .y_label_formatter(&|y| pretty_print_float(*y, false))
        .draw()?;

    chart.draw_series(
        scatter
            .points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), POINT_SIZE, DARK_RED.filled())),
    )?;

    if scatter.points.len() <= MAX_LABELS {
        chart.draw_series(
            scatter
                .points
                .iter()
                .zip(&scatter.labels)
                .map(|(&(x, y), label)| Text::new(label.clone(), (x, y), (DEFAULT_FONT, 10))),
        )?;
    }

    root_area.present()?;
    Ok(())
}
