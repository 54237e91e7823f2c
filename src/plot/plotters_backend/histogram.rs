use super::*;

pub(crate) fn histogram_figure(
    path: &Path,
    title: &str,
    x_desc: &str,
    values: &[f64],
    nbins: usize,
) -> DrawResult {
    let bins = Bins::spanning(values, nbins).unwrap_or(Bins {
        min: 0.0,
        max: 1.0,
        count: nbins,
    });
    let counts = bins.histogram(values);
    let y_max = counts.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.05;

    let root_area = SVGBackend::new(path, SIZE).into_drawing_area();
    root_area.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root_area)
        .caption(title, (DEFAULT_FONT, 20))
        .margin((5).percent())
        .set_label_area_size(LabelAreaPosition::Left, (5).percent_width().min(60))
        .set_label_area_size(LabelAreaPosition::Bottom, (5).percent_height().min(40))
        .build_cartesian_2d(bins.min..bins.max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc("Records")
        .x_label_formatter(&|x| pretty_print_float(*x, false))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, &n)| {
        Rectangle::new(
            [(bins.edge(i), 0.0), (bins.edge(i + 1), n as f64)],
            DARK_BLUE.mix(0.5).filled(),
        )
    }))?;

    root_area.present()?;
    Ok(())
}

pub(crate) fn stacked_histogram_figure(
    path: &Path,
    title: &str,
    x_desc: &str,
    stacks: &[Stack<'_>],
    nbins: usize,
) -> DrawResult {
    let bins = Bins::spanning(stacks.iter().flat_map(|s| s.values.iter()), nbins).unwrap_or(
        Bins {
            min: 0.0,
            max: 1.0,
            count: nbins,
        },
    );

    let layers: Vec<Vec<usize>> = stacks.iter().map(|s| bins.histogram(s.values)).collect();
    let totals: Vec<usize> = (0..nbins)
        .map(|i| layers.iter().map(|layer| layer[i]).sum())
        .collect();
    let y_max = totals.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.05;

    let root_area = SVGBackend::new(path, SIZE).into_drawing_area();
    root_area.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root_area)
        .caption(title, (DEFAULT_FONT, 20))
        .margin((5).percent())
        .set_label_area_size(LabelAreaPosition::Left, (5).percent_width().min(60))
        .set_label_area_size(LabelAreaPosition::Bottom, (5).percent_height().min(40))
        .build_cartesian_2d(bins.min..bins.max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc("Records")
        .x_label_formatter(&|x| pretty_print_float(*x, false))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()?;

    let mut bottom = vec![0usize; nbins];
    for (id, (stack, layer)) in stacks.iter().zip(&layers).enumerate() {
        let color = STACK_COLORS[id % NUM_COLORS];
        let rectangles: Vec<_> = (0..nbins)
            .filter(|&i| layer[i] > 0)
            .map(|i| {
                Rectangle::new(
                    [
                        (bins.edge(i), bottom[i] as f64),
                        (bins.edge(i + 1), (bottom[i] + layer[i]) as f64),
                    ],
                    color.mix(0.75).filled(),
                )
            })
            .collect();

        chart
            .draw_series(rectangles)?
            .label(stack.label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.filled()));

        for (b, n) in bottom.iter_mut().zip(layer) {
            *b += n;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root_area.present()?;
    Ok(())
}
