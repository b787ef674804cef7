//! Which page backs which endpoint.
//!
//! Every listing the agent can ask for is a row in [`BOARDS`]: a path under
//! the site root, the position of the table on that page, and the column map
//! to apply. The table position is a property of each page's layout and is not
//! derived from anything else.

use crate::shape::{ColumnMap, Trim, CANONICAL_COLUMNS, DERIVATIVE_COLUMNS};

/// One scraped table: where it lives and how to read it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Page {
    /// Path relative to the configured site root.
    pub path: &'static str,
    pub table_index: usize,
    /// `None` keeps the page's own headers.
    pub columns: Option<&'static ColumnMap>,
    pub trim: Trim,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Layout {
    /// One table, answered as an array of records.
    Single(Page),
    /// Several tables, answered as an object keyed by label.
    Grouped(&'static [(&'static str, Page)]),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Board {
    pub api_path: &'static str,
    pub summary: &'static str,
    pub layout: Layout,
    /// Fields to keep from each record, if the endpoint trims them.
    pub select: Option<&'static [&'static str]>,
}

const fn listing(path: &'static str) -> Page {
    Page {
        path,
        table_index: 0,
        columns: Some(CANONICAL_COLUMNS),
        trim: Trim::LISTING,
    }
}

const fn derivatives(path: &'static str) -> Page {
    Page {
        path,
        table_index: 0,
        columns: Some(DERIVATIVE_COLUMNS),
        trim: Trim::LISTING,
    }
}

const fn board(api_path: &'static str, summary: &'static str, layout: Layout) -> Board {
    Board {
        api_path,
        summary,
        layout,
        select: None,
    }
}

const TOP_ETF_LISTS: &[(&str, Page)] = &[
    ("TopGainers", listing("markets/etfs/gainers/")),
    ("TopPerforming", listing("markets/etfs/top-performing/")),
];

const LOSING_ETFS: &[(&str, Page)] = &[("TopLosers", listing("markets/etfs/losers/"))];

const TRENDING_ETF_LISTS: &[(&str, Page)] = &[
    ("MostActive", listing("markets/etfs/most-active/")),
    ("Trending", listing("markets/etfs/trending/")),
];

const ETF_HIST: &[(&str, Page)] = &[
    (
        "BestHistoricalPerformance",
        listing("markets/etfs/best-historical-performance/"),
    ),
    ("TopETF", listing("markets/etfs/top/")),
];

const MF_DAYS_TOP_LISTS: &[(&str, Page)] = &[
    ("DaysTopGainers", listing("markets/mutualfunds/gainers/")),
    ("DaysTopPerforming", listing("markets/mutualfunds/top-performing/")),
    ("DaysTopLosers", listing("markets/mutualfunds/losers/")),
];

const MF_BEST_PERFORMING: &[(&str, Page)] = &[
    (
        "BestHistoricalPerforming",
        listing("markets/mutualfunds/best-historical-performance/"),
    ),
    ("OverallBestMutualFunds", listing("markets/mutualfunds/top/")),
];

const INDEX_FIELDS: &[&str] = &["symbol", "name", "price", "change"];

pub static BOARDS: &[Board] = &[
    board(
        "/day_gainers",
        "Days top gaining tickers",
        Layout::Single(listing("markets/stocks/gainers/")),
    ),
    board(
        "/day_losers",
        "Days top losing tickers",
        Layout::Single(listing("markets/stocks/losers/")),
    ),
    board(
        "/most_active",
        "Days most active tickers",
        Layout::Single(listing("markets/stocks/most-active/")),
    ),
    board(
        "/futures",
        "Futures market tickers",
        Layout::Single(derivatives("markets/commodities/")),
    ),
    board(
        "/bonds",
        "Bond market tickers",
        Layout::Single(derivatives("markets/bonds/")),
    ),
    board(
        "/top_crypto",
        "Days top crypto",
        Layout::Single(listing("markets/crypto/all/")),
    ),
    Board {
        api_path: "/market_indices",
        summary: "Market indices status",
        layout: Layout::Single(Page {
            trim: Trim::FULL,
            ..listing("markets/world-indices/")
        }),
        select: Some(INDEX_FIELDS),
    },
    board(
        "/top_etf_lists",
        "Day's top ETF lists: TopGainers and TopPerforming",
        Layout::Grouped(TOP_ETF_LISTS),
    ),
    board(
        "/losing_etfs",
        "Day's losing ETFs",
        Layout::Grouped(LOSING_ETFS),
    ),
    board(
        "/trending_etf_lists",
        "MostActive and Trending ETF lists",
        Layout::Grouped(TRENDING_ETF_LISTS),
    ),
    board(
        "/etf_hist",
        "Historical performance and top ETFs",
        Layout::Grouped(ETF_HIST),
    ),
    board(
        "/mf_days_top_lists",
        "Mutual funds day's top lists: gainers, top performing and losers",
        Layout::Grouped(MF_DAYS_TOP_LISTS),
    ),
    board(
        "/mf_best_performing",
        "Best historical performing and overall best mutual funds",
        Layout::Grouped(MF_BEST_PERFORMING),
    ),
    board(
        "/days_forex",
        "Day's currencies performance",
        Layout::Single(listing("markets/currencies/")),
    ),
    board(
        "/sectors",
        "List of market sectors",
        Layout::Single(listing("sectors/")),
    ),
];

/// Sectors with a detail page under `sectors/<name>/`.
pub const SECTORS: &[&str] = &[
    "technology",
    "financial-services",
    "consumer-cyclical",
    "healthcare",
    "communication-services",
    "basic-materials",
    "consumer-defensive",
    "energy",
    "industrials",
    "real-estate",
    "utilities",
];

/// Tables of a sector page, by label and position. Headers are kept as-is and
/// no column or row is dropped.
pub const SECTOR_TABLES: &[(&str, usize)] = &[
    ("industries", 1),
    ("large_equities", 2),
    ("etf_opportunities", 3),
    ("fund_opportunities", 4),
];

/// Find the board served at `api_path` (leading slash optional).
pub fn board_at(api_path: &str) -> Option<&'static Board> {
    let wanted = api_path.trim_matches('/');
    BOARDS
        .iter()
        .find(|b| b.api_path.trim_start_matches('/') == wanted)
}

pub fn sector(name: &str) -> Option<&'static str> {
    let wanted = name.trim().to_ascii_lowercase();
    SECTORS.iter().copied().find(|s| *s == wanted)
}
