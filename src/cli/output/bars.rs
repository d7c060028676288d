use ansi_term::Colour;

use crate::{aggregate::Series, progress::ProgressSnapshot};

const BAR_WIDTH: usize = 40;
const FILLED: char = '█';
const EMPTY: char = '░';

/// Renders a fraction in `[0, 1]` as a fixed width bar. Out of range values are clamped.
pub fn render_bar(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_nan() {
        0.
    } else {
        fraction.clamp(0., 1.)
    };
    let filled = (fraction * width as f64).floor() as usize;
    let mut bar = String::with_capacity(width * FILLED.len_utf8());
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(width - filled));
    bar
}

/// Rows of a horizontal bar chart. Bars are scaled to the largest value of the series.
pub fn series_rows(series: &Series, unit: &str) -> Vec<String> {
    let max = series.values().iter().copied().fold(0., f64::max);
    let label_width = series.labels().iter().map(|l| l.chars().count()).max().unwrap_or(0);

    series
        .iter()
        .zip(series.formatted_values())
        .map(|((label, value), formatted)| {
            let fraction = if max > 0. { value / max } else { 0. };
            format!(
                "{label:<label_width$}  {}  {formatted}{unit}",
                Colour::Cyan.paint(render_bar(fraction, BAR_WIDTH))
            )
        })
        .collect()
}

/// Rows describing current progress. `day_of_month` is displayed next to the month bar.
pub fn progress_rows(snapshot: &ProgressSnapshot, day_of_month: u32) -> Vec<String> {
    let rows = [
        ("HOUR", snapshot.hour, format!("{:.1}min", snapshot.hour * 60.)),
        ("DAY", snapshot.day, format!("{:.1}h", snapshot.day * 24.)),
        ("MONTH", snapshot.month, format!("{day_of_month}day")),
        ("YEAR", snapshot.year, format!("{:.2} days", snapshot.year * 365.)),
    ];

    rows.into_iter()
        .map(|(name, fraction, detail)| {
            format!(
                "{name:<5}  {}  {:>8.4}%  {detail}",
                Colour::Green.paint(render_bar(fraction, BAR_WIDTH)),
                fraction * 100.
            )
        })
        .collect()
}
