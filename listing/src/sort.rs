//! Sort keys and per-key direction state.
//!
//! Each key remembers its own direction. Selecting the active key flips its
//! direction; selecting another key activates it with whatever direction that
//! key last had. All keys start ascending, with `Rank` active.

use std::cmp::Ordering;

use market::Asset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Rank,
    MarketCap,
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl SortKey {
    /// Ascending comparison. A missing market cap compares as 0.
    pub fn compare(&self, a: &Asset, b: &Asset) -> Ordering {
        match self {
            SortKey::Rank => a.market_cap_rank.cmp(&b.market_cap_rank),
            SortKey::MarketCap => a.market_cap.unwrap_or(0).cmp(&b.market_cap.unwrap_or(0)),
            SortKey::Price => a.current_price.total_cmp(&b.current_price),
        }
    }

    pub fn compare_directed(&self, a: &Asset, b: &Asset, direction: SortDirection) -> Ordering {
        match direction {
            SortDirection::Ascending => self.compare(a, b),
            SortDirection::Descending => self.compare(b, a),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    active: SortKey,
    rank: SortDirection,
    market_cap: SortDirection,
    price: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            active: SortKey::Rank,
            rank: SortDirection::Ascending,
            market_cap: SortDirection::Ascending,
            price: SortDirection::Ascending,
        }
    }
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> SortKey {
        self.active
    }

    pub fn direction(&self) -> SortDirection {
        self.direction_of(self.active)
    }

    pub fn direction_of(&self, key: SortKey) -> SortDirection {
        match key {
            SortKey::Rank => self.rank,
            SortKey::MarketCap => self.market_cap,
            SortKey::Price => self.price,
        }
    }

    /// Tap on a sort control.
    pub fn select(&mut self, key: SortKey) {
        if key == self.active {
            let flipped = self.direction_of(key).flipped();
            *self.slot_mut(key) = flipped;
        } else {
            self.active = key;
        }
    }

    fn slot_mut(&mut self, key: SortKey) -> &mut SortDirection {
        match key {
            SortKey::Rank => &mut self.rank,
            SortKey::MarketCap => &mut self.market_cap,
            SortKey::Price => &mut self.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_rank_ascending() {
        let s = SortState::new();
        assert_eq!(s.active(), SortKey::Rank);
        assert_eq!(s.direction(), SortDirection::Ascending);
    }

    #[test]
    fn selecting_active_key_flips_it() {
        let mut s = SortState::new();
        s.select(SortKey::Rank);
        assert_eq!(s.direction(), SortDirection::Descending);
        s.select(SortKey::Rank);
        assert_eq!(s.direction(), SortDirection::Ascending);
    }

    #[test]
    fn each_key_keeps_its_own_direction() {
        let mut s = SortState::new();
        s.select(SortKey::Price);
        s.select(SortKey::Price);
        assert_eq!(s.direction(), SortDirection::Descending);

        s.select(SortKey::MarketCap);
        assert_eq!(s.direction(), SortDirection::Ascending);

        s.select(SortKey::Price);
        assert_eq!(s.active(), SortKey::Price);
        assert_eq!(s.direction(), SortDirection::Descending);
        assert_eq!(s.direction_of(SortKey::Rank), SortDirection::Ascending);
    }
}
