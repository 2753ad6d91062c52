//! Static Chart Renderer
//! Reusable plotters primitives for the survey reports. Every function owns
//! its drawing context for the duration of the call: the backend is created,
//! drawn, presented, and dropped before returning, so no rendering state
//! leaks between reports.

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Color palette for bar/box/line series.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(52, 152, 219),  // Blue
    RGBColor(231, 76, 60),   // Red
    RGBColor(46, 204, 113),  // Green
    RGBColor(155, 89, 182),  // Purple
    RGBColor(243, 156, 18),  // Orange
    RGBColor(26, 188, 156),  // Teal
    RGBColor(233, 30, 99),   // Pink
    RGBColor(0, 188, 212),   // Cyan
    RGBColor(121, 85, 72),   // Brown
    RGBColor(96, 125, 139),  // Blue Grey
];

const CHART_SIZE: (u32, u32) = (1000, 600);
const GRID_SIZE: (u32, u32) = (1400, 900);

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn palette_color(i: usize) -> RGBColor {
    PALETTE[i % PALETTE.len()]
}

/// Axis label for a segmented categorical axis.
fn segment_label(seg: &SegmentValue<u32>, labels: &[String]) -> String {
    match seg {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
            labels.get(*i as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    }
}

fn max_or(values: impl IntoIterator<Item = f64>, fallback: f64) -> f64 {
    let max = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if max.is_finite() && max > 0.0 {
        max
    } else {
        fallback
    }
}

/// Histogram of a numeric column.
pub fn histogram(path: &Path, title: &str, x_desc: &str, values: &[f64], bins: usize) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    draw_histogram_panel(&root, title, x_desc, values, bins)?;
    root.present()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn draw_histogram_panel(
    area: &Area,
    title: &str,
    x_desc: &str,
    values: &[f64],
    bins: usize,
) -> Result<()> {
    let (counts, min, width) = crate::stats::calculator::bin_counts(values, bins);
    let x_max = min + width * bins as f64;
    let y_max = max_or(counts.iter().map(|&c| c as f64), 1.0) * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(min..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc("Frequency")
        .label_style(("sans-serif", 13))
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
        let x0 = min + i as f64 * width;
        Rectangle::new(
            [(x0, 0.0), (x0 + width, count as f64)],
            palette_color(0).mix(0.7).filled(),
        )
    }))?;
    Ok(())
}

/// Vertical bars over categorical labels.
pub fn bar_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    labels: &[String],
    values: &[f64],
) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = max_or(values.iter().copied(), 1.0) * 1.1;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(90)
        .y_label_area_size(55)
        .build_cartesian_2d((0u32..labels.len() as u32).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(labels.len() + 1)
        .x_label_formatter(&|seg| segment_label(seg, labels))
        .x_label_style(TextStyle::from(("sans-serif", 13)).transform(FontTransform::Rotate90))
        .label_style(("sans-serif", 13))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(palette_color(0).mix(0.8).filled())
            .margin(8)
            .data(values.iter().enumerate().map(|(i, &v)| (i as u32, v))),
    )?;

    root.present()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Horizontal bars over categorical labels, first label at the top.
pub fn horizontal_bar_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    labels: &[String],
    values: &[f64],
) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    // Reverse so the first (largest) label renders at the top of the chart.
    let labels_rev: Vec<String> = labels.iter().rev().cloned().collect();
    let values_rev: Vec<f64> = values.iter().rev().copied().collect();

    let x_max = max_or(values_rev.iter().copied(), 1.0) * 1.1;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(170)
        .build_cartesian_2d(0f64..x_max, (0u32..labels_rev.len() as u32).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .y_labels(labels_rev.len() + 1)
        .y_label_formatter(&|seg| segment_label(seg, &labels_rev))
        .label_style(("sans-serif", 13))
        .draw()?;

    chart.draw_series(
        Histogram::horizontal(&chart)
            .style(palette_color(0).mix(0.8).filled())
            .margin(6)
            .data(values_rev.iter().enumerate().map(|(i, &v)| (i as u32, v))),
    )?;

    root.present()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// One named series of a grouped bar chart; `values` is indexed by category.
pub struct BarGroup {
    pub name: String,
    pub values: Vec<f64>,
}

/// Side-by-side bars per category, one bar per series, with a legend.
pub fn grouped_bar_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    categories: &[String],
    series: &[BarGroup],
) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = categories.len();
    let y_max = max_or(
        series.iter().flat_map(|s| s.values.iter().copied()),
        1.0,
    ) * 1.15;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(90)
        .y_label_area_size(55)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(n)
        .x_label_formatter(&|x| {
            let i = x.round();
            if (x - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < n {
                categories[i as usize].clone()
            } else {
                String::new()
            }
        })
        .x_label_style(TextStyle::from(("sans-serif", 13)).transform(FontTransform::Rotate90))
        .label_style(("sans-serif", 13))
        .draw()?;

    // Bars for category i span [i - 0.4, i + 0.4], divided among the series.
    let group_width = 0.8f64;
    let bar_width = group_width / series.len().max(1) as f64;
    for (si, s) in series.iter().enumerate() {
        let color = palette_color(si);
        chart
            .draw_series(s.values.iter().enumerate().filter_map(|(ci, &v)| {
                if !v.is_finite() {
                    return None;
                }
                let x0 = ci as f64 - group_width / 2.0 + si as f64 * bar_width;
                Some(Rectangle::new(
                    [(x0, 0.0), (x0 + bar_width, v)],
                    color.mix(0.8).filled(),
                ))
            }))?
            .label(s.name.clone())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.mix(0.8).filled())
            });
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .label_font(("sans-serif", 13))
        .draw()?;

    root.present()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Boxplot per labeled group. `y_range` fixes the axis; when `None` the
/// range is padded out of the data like the interactive viewer did.
pub fn boxplot(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    groups: &[(String, Vec<f64>)],
    y_range: Option<(f32, f32)>,
) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    draw_boxplot_panel(&root, title, x_desc, y_desc, groups, y_range)?;
    root.present()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn data_y_range(groups: &[(String, Vec<f64>)]) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for (_, values) in groups {
        for &v in values {
            if v.is_finite() {
                min = min.min(v as f32);
                max = max.max(v as f32);
            }
        }
    }
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * 0.15).max(0.5);
    (min - pad, max + pad)
}

fn draw_boxplot_panel(
    area: &Area,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    groups: &[(String, Vec<f64>)],
    y_range: Option<(f32, f32)>,
) -> Result<()> {
    let labels: Vec<String> = groups.iter().map(|(label, _)| label.clone()).collect();
    let (y_lo, y_hi) = y_range.unwrap_or_else(|| data_y_range(groups));

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(90)
        .y_label_area_size(55)
        .build_cartesian_2d(labels[..].into_segmented(), y_lo..y_hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_label_style(TextStyle::from(("sans-serif", 13)).transform(FontTransform::Rotate90))
        .label_style(("sans-serif", 13))
        .draw()?;

    for (i, (_, values)) in groups.iter().enumerate() {
        if values.is_empty() {
            continue;
        }
        let quartiles = Quartiles::new(values);
        chart.draw_series(std::iter::once(
            Boxplot::new_vertical(SegmentValue::CenterOf(&labels[i]), &quartiles)
                .width(18)
                .whisker_width(0.5)
                .style(palette_color(i)),
        ))?;
    }
    Ok(())
}

/// Annotated correlation heatmap over a symmetric matrix in [-1, 1].
pub fn heatmap(path: &Path, title: &str, labels: &[String], matrix: &[Vec<f64>]) -> Result<()> {
    let root = BitMapBackend::new(path, (800, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let k = labels.len() as i32;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(100)
        .build_cartesian_2d(0..k, 0..k)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(labels.len())
        .y_labels(labels.len())
        .x_label_formatter(&|x| labels.get(*x as usize).cloned().unwrap_or_default())
        .y_label_formatter(&|y| labels.get(*y as usize).cloned().unwrap_or_default())
        .label_style(("sans-serif", 14))
        .draw()?;

    chart.draw_series((0..k).flat_map(|i| {
        (0..k).map(move |j| {
            let v = matrix[i as usize][j as usize];
            Rectangle::new([(i, j), (i + 1, j + 1)], heat_color(v).filled())
        })
    }))?;

    let text_style = TextStyle::from(("sans-serif", 16)).color(&BLACK);
    chart.draw_series((0..k).flat_map(|i| {
        let text_style = text_style.clone();
        (0..k).map(move |j| {
            let v = matrix[i as usize][j as usize];
            let label = if v.is_nan() {
                "-".to_string()
            } else {
                format!("{v:.2}")
            };
            EmptyElement::at((i, j)) + Text::new(label, (55, 55), text_style.clone())
        })
    }))?;

    root.present()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Diverging blue-white-red color scale for correlations.
fn heat_color(v: f64) -> RGBColor {
    if v.is_nan() {
        return RGBColor(200, 200, 200);
    }
    let v = v.clamp(-1.0, 1.0);
    let lerp = |a: u8, b: u8, t: f64| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    if v < 0.0 {
        let t = 1.0 + v;
        RGBColor(lerp(59, 255, t), lerp(76, 255, t), lerp(192, 255, t))
    } else {
        RGBColor(lerp(255, 180, v), lerp(255, 4, v), lerp(255, 38, v))
    }
}

/// Grid of histograms, one panel per named series, two panels per row.
pub fn histogram_grid(
    path: &Path,
    title: &str,
    panels: &[(String, Vec<f64>)],
    bins: usize,
) -> Result<()> {
    let root = BitMapBackend::new(path, GRID_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let titled = root.titled(title, ("sans-serif", 28))?;

    let rows = panels.len().div_ceil(2);
    let areas = titled.split_evenly((rows, 2));
    for ((name, values), area) in panels.iter().zip(areas.iter()) {
        draw_histogram_panel(area, name, name, values, bins)?;
    }

    root.present()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Grid of line charts. Each panel is a named list of (label, value) points
/// drawn in order along the x axis.
pub fn line_grid(
    path: &Path,
    title: &str,
    y_desc: &str,
    panels: &[(String, Vec<(String, f64)>)],
) -> Result<()> {
    let root = BitMapBackend::new(path, GRID_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let titled = root.titled(title, ("sans-serif", 28))?;

    let rows = panels.len().div_ceil(2);
    let areas = titled.split_evenly((rows, 2));
    for (pi, ((name, points), area)) in panels.iter().zip(areas.iter()).enumerate() {
        let n = points.len();
        let y_max = max_or(points.iter().map(|(_, v)| *v), 1.0) * 1.15;
        let labels: Vec<String> = points.iter().map(|(l, _)| l.clone()).collect();

        let mut chart = ChartBuilder::on(area)
            .caption(name, ("sans-serif", 20))
            .margin(12)
            .x_label_area_size(95)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc(y_desc)
            .x_labels(n)
            .x_label_formatter(&|x| {
                let i = x.round();
                if (x - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < labels.len() {
                    labels[i as usize].clone()
                } else {
                    String::new()
                }
            })
            .x_label_style(TextStyle::from(("sans-serif", 11)).transform(FontTransform::Rotate90))
            .label_style(("sans-serif", 12))
            .draw()?;

        let color = palette_color(pi);
        chart.draw_series(LineSeries::new(
            points
                .iter()
                .enumerate()
                .filter(|(_, (_, v))| v.is_finite())
                .map(|(i, (_, v))| (i as f64, *v)),
            color.stroke_width(2),
        ))?;
        chart.draw_series(
            points
                .iter()
                .enumerate()
                .filter(|(_, (_, v))| v.is_finite())
                .map(|(i, (_, v))| Circle::new((i as f64, *v), 3, color.filled())),
        )?;
    }

    root.present()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Grid of boxplot panels sharing a fixed y range, three panels per row.
pub fn boxplot_grid(
    path: &Path,
    title: &str,
    y_desc: &str,
    panels: &[(String, Vec<(String, Vec<f64>)>)],
    y_range: (f32, f32),
) -> Result<()> {
    let root = BitMapBackend::new(path, GRID_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let titled = root.titled(title, ("sans-serif", 28))?;

    let rows = panels.len().div_ceil(3);
    let areas = titled.split_evenly((rows, 3));
    for ((name, groups), area) in panels.iter().zip(areas.iter()) {
        draw_boxplot_panel(area, name, "", y_desc, groups, Some(y_range))?;
    }

    root.present()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
