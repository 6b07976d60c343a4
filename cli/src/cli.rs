use clap::{Args, Parser, Subcommand, ValueEnum};

use charts::detail::TimeRange;
use listing::{SortKey, SortState};

#[derive(Debug, Parser)]
#[clap(name = "tracker", version, about = "Crypto market tracker")]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Market listing with 24h sparklines
    List(ListArgs),
    /// Price chart of one asset split around its average
    Detail(DetailArgs),
    /// Manage favorite assets
    #[clap(subcommand)]
    Fav(FavCommand),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show favorites
    #[clap(long)]
    pub favorites: bool,

    /// Case-insensitive name/symbol filter
    #[clap(long, default_value = "")]
    pub search: String,

    #[clap(long, value_enum, default_value_t = SortCli::Rank)]
    pub sort: SortCli,

    /// Sort descending
    #[clap(long)]
    pub desc: bool,

    /// Rows per page; also the number of chart slots
    #[clap(long, default_value = "10")]
    pub rows: usize,

    /// Pages to render. Every page after the first recycles the same slots.
    #[clap(long, default_value = "1")]
    pub pages: usize,
}

#[derive(Debug, Args)]
pub struct DetailArgs {
    pub id: String,

    #[clap(long, value_enum, default_value_t = RangeCli::Day)]
    pub range: RangeCli,
}

#[derive(Debug, Subcommand)]
pub enum FavCommand {
    Add { id: String },
    Remove { id: String },
    Toggle { id: String },
    List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortCli {
    Rank,
    MarketCap,
    Price,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RangeCli {
    #[value(name = "24h")]
    Day,
    #[value(name = "1h")]
    Hour,
}

impl From<SortCli> for SortKey {
    fn from(s: SortCli) -> Self {
        match s {
            SortCli::Rank => SortKey::Rank,
            SortCli::MarketCap => SortKey::MarketCap,
            SortCli::Price => SortKey::Price,
        }
    }
}

impl From<RangeCli> for TimeRange {
    fn from(r: RangeCli) -> Self {
        match r {
            RangeCli::Day => TimeRange::Day,
            RangeCli::Hour => TimeRange::Hour,
        }
    }
}

/// Sequence of sort selections that reaches `key` in the requested direction
/// from the initial sort state.
pub(crate) fn sort_taps(key: SortKey, desc: bool) -> Vec<SortKey> {
    let mut taps = Vec::new();
    if SortState::new().active() != key {
        taps.push(key);
    }
    if desc {
        taps.push(key);
    }
    taps
}

#[cfg(test)]
mod tests {
    use super::*;
    use listing::SortDirection;

    fn replay(taps: &[SortKey]) -> SortState {
        let mut s = SortState::new();
        for k in taps {
            s.select(*k);
        }
        s
    }

    #[test]
    fn taps_reach_requested_sort() {
        for key in [SortKey::Rank, SortKey::MarketCap, SortKey::Price] {
            let asc = replay(&sort_taps(key, false));
            assert_eq!((asc.active(), asc.direction()), (key, SortDirection::Ascending));

            let desc = replay(&sort_taps(key, true));
            assert_eq!((desc.active(), desc.direction()), (key, SortDirection::Descending));
        }
    }

    #[test]
    fn parses_list_flags() {
        let cli = Cli::parse_from([
            "tracker", "list", "--favorites", "--search", "bit", "--sort", "market-cap", "--desc",
            "--rows", "5",
        ]);
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert!(args.favorites);
        assert_eq!(args.search, "bit");
        assert!(matches!(args.sort, SortCli::MarketCap));
        assert!(args.desc);
        assert_eq!(args.rows, 5);
        assert_eq!(args.pages, 1);
    }

    #[test]
    fn parses_detail_range() {
        let cli = Cli::parse_from(["tracker", "detail", "bitcoin", "--range", "1h"]);
        let Command::Detail(args) = cli.command else {
            panic!("expected detail");
        };
        assert_eq!(args.id, "bitcoin");
        assert_eq!(TimeRange::from(args.range), TimeRange::Hour);
    }
}
