//! Text rendering of charts for the terminal.

use charts::{ChartSink, SlotContent};
use charts::segments::DetailChart;
use market::Series;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Squeeze `series` into `width` block characters. Each column is the mean of
/// the samples that fall into it.
pub fn sparkline(series: &Series, width: usize) -> String {
    let points = series.points();
    if points.is_empty() || width == 0 {
        return String::new();
    }

    let columns = width.min(points.len());
    let means: Vec<f64> = (0..columns)
        .map(|c| {
            let start = c * points.len() / columns;
            let end = ((c + 1) * points.len() / columns).max(start + 1);
            let bucket = &points[start..end];
            bucket.iter().map(|p| p.price).sum::<f64>() / bucket.len() as f64
        })
        .collect();

    let lo = means.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = means.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;

    means
        .into_iter()
        .map(|m| {
            if span <= f64::EPSILON {
                BARS[BARS.len() / 2]
            } else {
                let idx = ((m - lo) / span * (BARS.len() - 1) as f64).round() as usize;
                BARS[idx.min(BARS.len() - 1)]
            }
        })
        .collect()
}

/// Slot sink that keeps the last rendered line.
pub struct TextSink {
    width: usize,
    line: String,
    renders: usize,
}

impl TextSink {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            line: String::new(),
            renders: 0,
        }
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl ChartSink for TextSink {
    fn render(&mut self, content: &SlotContent) {
        self.renders += 1;
        self.line = match content {
            SlotContent::Blank => "…".to_string(),
            SlotContent::NoData => "no data".to_string(),
            SlotContent::Series(s) => sparkline(s, self.width),
        };
    }
}

/// Detail chart as a colour-free text block: average line, then one line per
/// segment.
pub fn detail_lines(chart: &DetailChart, width: usize) -> Vec<String> {
    let mut out = Vec::with_capacity(chart.segments.len() + 3);

    out.push(sparkline(&chart.series, width));
    if let Some((lo, hi)) = chart.series.price_range() {
        out.push(format!("low ${lo:.2}  high ${hi:.2}  average ${:.2}", chart.average));
    }
    out.push(format!(
        "{} points, {} segments",
        chart.series.len(),
        chart.segments.len()
    ));

    for seg in &chart.segments {
        let (Some(first), Some(last)) = (seg.points.first(), seg.points.last()) else {
            continue;
        };
        out.push(format!(
            "  {} {} → {}  ${:.2} → ${:.2}",
            if seg.above_average { "▲ above" } else { "▼ below" },
            common::time::format_hhmm(first.t as i64),
            common::time::format_hhmm(last.t as i64),
            first.price,
            last.price,
        ));
    }

    out
}
