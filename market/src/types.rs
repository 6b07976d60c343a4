/// Stable upstream identifier of an asset (e.g. `"bitcoin"`).
pub type AssetId = String;

/// Immutable snapshot of one asset at listing time.
///
/// Replaced wholesale on every refresh; never patched field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    pub symbol: String,
    pub current_price: f64,
    /// Icon URI, resolved by the host's image loader.
    pub image: String,
    /// Absent when upstream omits it.
    pub market_cap: Option<u64>,
    /// 24h change in percent, sign-significant.
    pub price_change_percentage_24h: Option<f64>,
    pub market_cap_rank: u32,
}

/// One sample of a price history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    /// Seconds since the epoch.
    pub ts: i64,
    pub price: f64,
}

impl PricePoint {
    pub fn new(ts: i64, price: f64) -> Self {
        Self { ts, price }
    }
}

/// Ordered price history for one asset over one window.
///
/// An empty series is a valid value and is distinct from "never fetched".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: Vec<PricePoint>,
}

impl Series {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Arithmetic mean of all prices, `None` for an empty series.
    pub fn average(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let sum: f64 = self.points.iter().map(|p| p.price).sum();
        Some(sum / self.points.len() as f64)
    }

    /// `(min, max)` price, `None` for an empty series.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter().map(|p| p.price);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

impl From<Vec<PricePoint>> for Series {
    fn from(points: Vec<PricePoint>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<PricePoint> for Series {
    fn from_iter<I: IntoIterator<Item = PricePoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Time window of a series request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesWindow {
    /// Rolling last 24 hours. This is the window the row cache holds.
    Last24Hours,
    /// Explicit `[from, to)` range in epoch seconds. Never cached.
    Range { from: i64, to: i64 },
}

impl SeriesWindow {
    /// The hour ending at `now_secs`.
    pub fn last_hour(now_secs: i64) -> Self {
        SeriesWindow::Range {
            from: now_secs - 3_600,
            to: now_secs,
        }
    }

    pub fn is_cacheable(&self) -> bool {
        matches!(self, SeriesWindow::Last24Hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(prices: &[f64]) -> Series {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| PricePoint::new(i as i64 * 60, *p))
            .collect()
    }

    #[test]
    fn empty_series_has_no_statistics() {
        let s = Series::empty();
        assert!(s.is_empty());
        assert_eq!(s.average(), None);
        assert_eq!(s.price_range(), None);
    }

    #[test]
    fn average_and_range() {
        let s = series(&[10.0, 20.0, 30.0, 40.0]);
        assert_eq!(s.len(), 4);
        assert!((s.average().unwrap() - 25.0).abs() < 1e-9);
        assert_eq!(s.price_range(), Some((10.0, 40.0)));
        assert_eq!(s.first().unwrap().ts, 0);
        assert_eq!(s.last().unwrap().ts, 180);
    }

    #[test]
    fn last_hour_window_spans_3600_seconds() {
        let w = SeriesWindow::last_hour(10_000);
        assert_eq!(w, SeriesWindow::Range { from: 6_400, to: 10_000 });
        assert!(!w.is_cacheable());
        assert!(SeriesWindow::Last24Hours.is_cacheable());
    }
}
