use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use plotters::prelude::*;

use super::report_service::ReportError;
use crate::models::{ComparisonReport, DashboardView};

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const CHANGE_CHART_SIZE: (u32, u32) = (1000, 600);
const CHANGE_CHART_TITLE: &str = "Crypto Price Change Over the Last Week";

/// How the bar chart draws an asset whose change is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingBarPolicy {
    /// Leave the category slot empty
    #[default]
    Skip,
    /// Draw a zero-height bar
    Zero,
    /// Leave the slot empty and write "n/a" on the zero line
    Marker,
}

impl FromStr for MissingBarPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" | "gap" => Ok(MissingBarPolicy::Skip),
            "zero" => Ok(MissingBarPolicy::Zero),
            "marker" | "mark" => Ok(MissingBarPolicy::Marker),
            other => Err(format!("Unknown missing bar policy '{}'. Use: skip, zero, marker", other)),
        }
    }
}

/// One category on the change chart
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: Option<f64>,
    pub marked: bool,
}

/// Map report rows to bars under `policy`, keeping report order
pub fn bars_for(report: &ComparisonReport, policy: MissingBarPolicy) -> Vec<Bar> {
    report
        .rows
        .iter()
        .map(|row| match (row.change_pct, policy) {
            (Some(change), _) => Bar { label: row.name.clone(), value: Some(change), marked: false },
            (None, MissingBarPolicy::Skip) => Bar { label: row.name.clone(), value: None, marked: false },
            (None, MissingBarPolicy::Zero) => Bar { label: row.name.clone(), value: Some(0.0), marked: false },
            (None, MissingBarPolicy::Marker) => Bar { label: row.name.clone(), value: None, marked: true },
        })
        .collect()
}

/// Y axis range that always includes the zero line, padded by 10%
fn value_range<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    let (min, max) = values
        .into_iter()
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let padding = (max - min).max(1.0) * 0.1;
    (min - padding, max + padding)
}

/// Category axis values: one per bar (plotters integer ranges include the end)
fn category_range(count: usize) -> std::ops::Range<usize> {
    0..count.max(1) - 1
}

fn chart_err<E: Display>(stage: &'static str) -> impl Fn(E) -> ReportError {
    move |e| ReportError::Chart(format!("Failed to {}: {}", stage, e))
}

/// Render the weekly change bar chart as a PNG at `path`, overwriting it
pub fn render_change_chart(
    report: &ComparisonReport,
    policy: MissingBarPolicy,
    path: &Path,
) -> Result<(), ReportError> {
    let bars = bars_for(report, policy);
    let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();
    let slots = bars.len().max(1);
    let (y_min, y_max) = value_range(bars.iter().filter_map(|b| b.value));

    let root = BitMapBackend::new(path, CHANGE_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err("fill canvas"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(CHANGE_CHART_TITLE, ("sans-serif", 28).into_font())
        .margin(15)
        .x_label_area_size(90)
        .y_label_area_size(60)
        .build_cartesian_2d(category_range(slots).into_segmented(), y_min..y_max)
        .map_err(chart_err("build chart"))?;

    let label_formatter = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .set_tick_mark_size(LabelAreaPosition::Bottom, 0)
        .disable_x_mesh()
        .y_desc("Percent Change (%)")
        .x_labels(slots)
        .x_label_formatter(&label_formatter)
        .x_label_style(("sans-serif", 14).into_font().transform(FontTransform::Rotate90))
        .draw()
        .map_err(chart_err("draw mesh"))?;

    let data: Vec<(usize, f64)> = bars
        .iter()
        .enumerate()
        .filter_map(|(i, b)| b.value.map(|v| (i, v)))
        .collect();

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(SKY_BLUE.filled())
                .margin(12)
                .data(data.iter().copied()),
        )
        .map_err(chart_err("draw bars"))?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BLACK.stroke_width(1))
                .margin(12)
                .data(data.iter().copied()),
        )
        .map_err(chart_err("draw bar outlines"))?;

    chart
        .draw_series(LineSeries::new(
            vec![(SegmentValue::Exact(0), 0.0), (SegmentValue::Last, 0.0)],
            BLACK.stroke_width(1),
        ))
        .map_err(chart_err("draw zero line"))?;

    chart
        .draw_series(bars.iter().enumerate().filter(|(_, b)| b.marked).map(|(i, _)| {
            Text::new("n/a", (SegmentValue::CenterOf(i), 0.0), ("sans-serif", 14).into_font())
        }))
        .map_err(chart_err("draw missing markers"))?;

    root.present().map_err(chart_err("render chart"))?;
    Ok(())
}

/// Generate a dashboard price chart image as PNG bytes
pub fn generate_price_chart(view: &DashboardView, width: u32, height: u32) -> Result<Vec<u8>, ReportError> {
    let price_points = &view.series;

    if price_points.is_empty() {
        return Err(ReportError::Chart("No price data to chart".to_string()));
    }

    // BitMapBackend encodes PNG only when writing to a file
    let temp_file = std::env::temp_dir().join(format!(
        "coinboard_chart_{}_{}.png",
        view.asset.id,
        chrono::Utc::now().timestamp_millis()
    ));

    read_back_png(&temp_file, |path| draw_price_chart(view, path, width, height))
}

/// Run `draw` against `path`, read the PNG back and remove the file whether or not drawing succeeded
fn read_back_png<F>(path: &Path, draw: F) -> Result<Vec<u8>, ReportError>
where
    F: FnOnce(&Path) -> Result<(), ReportError>,
{
    let result = draw(path).and_then(|_| Ok(std::fs::read(path)?));
    let _ = std::fs::remove_file(path);
    result
}

fn draw_price_chart(view: &DashboardView, path: &Path, width: u32, height: u32) -> Result<(), ReportError> {
    let price_points = &view.series;

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err("fill canvas"))?;

    let min_price = price_points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let max_price = price_points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);

    let padding = (max_price - min_price).max(1e-8) * 0.1;
    let y_min = (min_price - padding).max(0.0);
    let y_max = max_price + padding;

    let x_min = price_points[0].timestamp;
    let mut x_max = price_points[price_points.len() - 1].timestamp;
    if x_max <= x_min {
        x_max = x_min + chrono::Duration::minutes(1);
    }

    let mut chart = ChartBuilder::on(&root)
        .caption(view.title(), ("sans-serif", 36).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(chart_err("build chart"))?;

    chart
        .configure_mesh()
        .y_desc("Price (USD)")
        .x_desc("Time")
        .x_label_formatter(&|t| t.format("%Y-%m-%d").to_string())
        .draw()
        .map_err(chart_err("draw mesh"))?;

    chart
        .draw_series(LineSeries::new(
            price_points.iter().map(|p| (p.timestamp, p.price)),
            BLUE.stroke_width(2),
        ))
        .map_err(chart_err("draw price line"))?;

    root.present().map_err(chart_err("render chart"))?;
    Ok(())
}
