//! Average-split detail chart.
//!
//! The detail chart colours the price line by whether it runs above or below
//! the window's average price. The series is cut into contiguous segments at
//! every crossing of the average; the interpolated crossing point closes one
//! segment and opens the next, so adjacent segments join without a gap.
//!
//! Pure and deterministic: no I/O, no clock.

use std::sync::Arc;

use market::Series;

/// Chart coordinate. `t` is fractional because crossings fall between samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub t: f64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub points: Vec<ChartPoint>,
    /// Segment runs at or above the average.
    pub above_average: bool,
}

#[derive(Debug, Clone)]
pub struct DetailChart {
    pub series: Arc<Series>,
    pub average: f64,
    pub segments: Vec<Segment>,
    /// Horizontal average line from the first to the last sample.
    pub average_line: (ChartPoint, ChartPoint),
}

impl DetailChart {
    /// `None` for an empty series.
    pub fn build(series: Arc<Series>) -> Option<Self> {
        let average = series.average()?;
        let first = series.first()?.ts as f64;
        let last = series.last()?.ts as f64;

        let segments = split_by_average(&series, average);

        Some(Self {
            series,
            average,
            segments,
            average_line: (
                ChartPoint { t: first, price: average },
                ChartPoint { t: last, price: average },
            ),
        })
    }
}

pub fn split_by_average(series: &Series, average: f64) -> Vec<Segment> {
    let points = series.points();
    let Some(head) = points.first() else {
        return Vec::new();
    };

    let mut segments = Vec::new();
    let mut current: Vec<ChartPoint> = Vec::new();
    let mut current_above = head.price >= average;

    for p in points {
        let point = ChartPoint {
            t: p.ts as f64,
            price: p.price,
        };
        let above = p.price >= average;

        if above != current_above {
            if let Some(prev) = current.last().copied() {
                // prev and point lie on opposite sides, so prices differ.
                let ratio = (average - prev.price) / (point.price - prev.price);
                current.push(ChartPoint {
                    t: prev.t + ratio * (point.t - prev.t),
                    price: average,
                });
            }

            let carry = current.last().copied();
            segments.push(Segment {
                points: std::mem::take(&mut current),
                above_average: current_above,
            });
            current.extend(carry);
            current_above = above;
        }

        current.push(point);
    }

    segments.push(Segment {
        points: current,
        above_average: current_above,
    });

    segments
}
