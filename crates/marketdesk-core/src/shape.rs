//! Turn a [`RawTable`] into the records handed back to callers.

use crate::error::ParseError;
use crate::record::{is_missing, sanitize, type_column, Scalar, TabularRecord};
use crate::table::{RawTable, UNNAMED_PREFIX};

/// Source header -> output field. Headers not listed pass through as they are.
pub type ColumnMap = [(&'static str, &'static str)];

/// Headers of the stock, ETF, fund, currency and sector listings.
pub const CANONICAL_COLUMNS: &ColumnMap = &[
    ("Symbol", "symbol"),
    ("Name", "name"),
    ("Price", "price"),
    ("Change", "change"),
    ("Change %", "changePercent"),
    ("Volume", "volume"),
    ("Avg Vol (3M)", "avgVolume"),
    ("Market Cap", "marketCap"),
    ("P/E Ratio (TTM)", "peRatio"),
    ("52 Wk Change %", "weekRange"),
];

/// Headers of the futures and bond listings.
pub const DERIVATIVE_COLUMNS: &ColumnMap = &[
    ("Symbol", "symbol"),
    ("Name", "name"),
    ("Price", "price"),
    ("Change", "change"),
    ("Change %", "changePercent"),
    ("Volume", "volume"),
    ("Market Time", "marketTime"),
    ("Open Interest", "openInterest"),
];

/// The column whose cells carry a trailing annotation after the value.
pub const PRICE_COLUMN: &str = "Price";

/// How much of a table survives shaping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trim {
    /// Drop every column that has a missing cell.
    pub drop_incomplete: bool,
    /// Keep at most the configured number of rows.
    pub cap_rows: bool,
}

impl Trim {
    /// Listings: complete columns only, capped.
    pub const LISTING: Trim = Trim {
        drop_incomplete: true,
        cap_rows: true,
    };
    /// Every column and row; gaps come back empty.
    pub const FULL: Trim = Trim {
        drop_incomplete: false,
        cap_rows: false,
    };
}

/// Normalize one table.
///
/// With a column map: the price column is cut to its leading token (and kept
/// as text), known headers are renamed, and header-less columns are dropped.
/// Then `trim` decides whether columns with a missing cell are dropped and
/// whether at most `row_cap` rows are kept. Cells are typed a column at a
/// time and non-finite numbers become empty.
pub fn shape(
    table: RawTable,
    columns: Option<&ColumnMap>,
    trim: Trim,
    row_cap: usize,
) -> Vec<TabularRecord> {
    let RawTable { headers, rows } = table;
    let width = headers.len();

    let price = columns.and_then(|_| headers.iter().position(|h| h == PRICE_COLUMN));

    let mut cells: Vec<Vec<Option<String>>> = rows
        .into_iter()
        .map(|row| {
            let mut row: Vec<Option<String>> = row
                .into_iter()
                .take(width)
                .map(|text| (!is_missing(&text)).then_some(text))
                .collect();
            row.resize(width, None);
            row
        })
        .collect();

    if let Some(col) = price {
        for row in cells.iter_mut() {
            if let Some(text) = row[col].take() {
                row[col] = text.split_whitespace().next().map(str::to_string);
            }
        }
    }

    let names: Vec<String> = match columns {
        Some(map) => headers.iter().map(|h| rename(h, map).to_string()).collect(),
        None => headers.clone(),
    };

    let keep: Vec<usize> = (0..width)
        .filter(|&col| !(columns.is_some() && headers[col].starts_with(UNNAMED_PREFIX)))
        .filter(|&col| !trim.drop_incomplete || cells.iter().all(|row| row[col].is_some()))
        .collect();

    if trim.cap_rows {
        cells.truncate(row_cap);
    }

    let mut typed: Vec<std::vec::IntoIter<Scalar>> = keep
        .iter()
        .map(|&col| {
            let column: Vec<Option<String>> = cells.iter_mut().map(|row| row[col].take()).collect();
            let values = if Some(col) == price {
                column
                    .into_iter()
                    .map(|cell| cell.map_or(Scalar::Empty, Scalar::Text))
                    .collect::<Vec<Scalar>>()
            } else {
                type_column(column)
            };
            values.into_iter()
        })
        .collect();

    let mut records: Vec<TabularRecord> = (0..cells.len())
        .map(|_| {
            keep.iter()
                .zip(typed.iter_mut())
                .map(|(&col, values)| (names[col].clone(), values.next().unwrap_or(Scalar::Empty)))
                .collect()
        })
        .collect();

    sanitize(&mut records);
    records
}

/// Look `header` up in `map`; an absent key leaves the header unchanged.
pub fn rename<'a>(header: &'a str, map: &'a ColumnMap) -> &'a str {
    map.iter()
        .find(|(from, _)| *from == header)
        .map(|(_, to)| *to)
        .unwrap_or(header)
}

/// Keep only `fields` of each record, in the order given. A field the page
/// never had is `MissingColumn`.
pub fn select(
    records: Vec<TabularRecord>,
    fields: &[&str],
) -> Result<Vec<TabularRecord>, ParseError> {
    records
        .into_iter()
        .map(|mut record| {
            fields
                .iter()
                .map(|field| {
                    record
                        .swap_remove(*field)
                        .map(|value| (field.to_string(), value))
                        .ok_or_else(|| ParseError::MissingColumn(field.to_string()))
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn price_keeps_only_its_leading_token() {
        let raw = table(&["Symbol", "Price"], &[&["X", "123.45 +1.2%"], &["Y", "9"]]);
        let records = shape(raw, Some(CANONICAL_COLUMNS), Trim::LISTING, 20);
        assert_eq!(records[0]["price"], Scalar::from("123.45"));
        assert_eq!(records[1]["price"], Scalar::from("9"));
    }

    #[test]
    fn known_headers_are_renamed_and_others_pass_through() {
        let raw = table(
            &["Symbol", "Market Cap", "P/E Ratio (TTM)", "52 Wk Range"],
            &[&["X", "2.9T", "31.2", "120 - 200"]],
        );
        let records = shape(raw, Some(CANONICAL_COLUMNS), Trim::LISTING, 20);
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["symbol", "marketCap", "peRatio", "52 Wk Range"]);
        assert!(!records[0].contains_key("Market Cap"));
        assert_eq!(records[0]["peRatio"], Scalar::Float(31.2));
    }

    #[test]
    fn a_single_gap_drops_the_whole_column() {
        let raw = table(
            &["Symbol", "Volume", "Avg Vol (3M)"],
            &[&["A", "10", "5"], &["B", "11", "N/A"], &["C", "12"]],
        );
        let records = shape(raw, Some(CANONICAL_COLUMNS), Trim::LISTING, 20);
        assert_eq!(records.len(), 3);
        for record in &records {
            assert!(!record.contains_key("avgVolume"));
            assert!(record.contains_key("volume"));
        }
    }

    #[test]
    fn unnamed_columns_only_go_when_renaming() {
        let raw = table(&["Symbol", "Unnamed: 1"], &[&["A", "chart"]]);
        let renamed = shape(raw.clone(), Some(CANONICAL_COLUMNS), Trim::LISTING, 20);
        assert_eq!(renamed[0].len(), 1);

        let untouched = shape(raw, None, Trim::LISTING, 20);
        assert_eq!(untouched[0]["Unnamed: 1"], Scalar::from("chart"));
        assert_eq!(untouched[0]["Symbol"], Scalar::from("A"));
    }

    #[test]
    fn without_renaming_the_price_is_left_alone() {
        let raw = table(&["Price"], &[&["150.00 +1.0%"]]);
        let records = shape(raw, None, Trim::LISTING, 20);
        assert_eq!(records[0]["Price"], Scalar::from("150.00 +1.0%"));
    }

    #[test]
    fn caps_rows_and_keeps_order() {
        let rows: Vec<Vec<String>> = (0..50).map(|i| vec![format!("T{i}")]).collect();
        let raw = RawTable {
            headers: vec!["Symbol".into()],
            rows,
        };
        let records = shape(raw, Some(CANONICAL_COLUMNS), Trim::LISTING, 20);
        assert_eq!(records.len(), 20);
        assert_eq!(records[0]["symbol"], Scalar::from("T0"));
        assert_eq!(records[19]["symbol"], Scalar::from("T19"));
    }

    #[test]
    fn infinities_become_empty() {
        let raw = table(
            &["Symbol", "P/E Ratio (TTM)"],
            &[&["A", "inf"], &["B", "-Infinity"], &["C", "28.4"]],
        );
        let records = shape(raw, Some(CANONICAL_COLUMNS), Trim::LISTING, 20);
        assert_eq!(records[0]["peRatio"], Scalar::Empty);
        assert_eq!(records[1]["peRatio"], Scalar::Empty);
        assert_eq!(records[2]["peRatio"], Scalar::Float(28.4));
    }

    #[test]
    fn symbols_that_read_like_numbers_stay_text() {
        let raw = table(
            &["Symbol", "Name"],
            &[&["NAN", "Nano Labs"], &["INF", "Infinity Corp"], &["AAPL", "Apple Inc."]],
        );
        let records = shape(raw, Some(CANONICAL_COLUMNS), Trim::LISTING, 20);
        assert_eq!(records[0]["symbol"], Scalar::from("NAN"));
        assert_eq!(records[1]["symbol"], Scalar::from("INF"));
        assert_eq!(records[1]["name"], Scalar::from("Infinity Corp"));
    }

    #[test]
    fn gains_and_losses_share_one_type() {
        let raw = table(
            &["Symbol", "Change", "Volume"],
            &[&["UP", "+1.50", "1,000"], &["DOWN", "-0.5", "250"]],
        );
        let records = shape(raw, Some(CANONICAL_COLUMNS), Trim::LISTING, 20);
        assert_eq!(records[0]["change"], Scalar::from("+1.50"));
        assert_eq!(records[1]["change"], Scalar::from("-0.5"));
        assert_eq!(records[0]["volume"], Scalar::Integer(1000));
        assert_eq!(records[1]["volume"], Scalar::Integer(250));
    }

    #[test]
    fn full_trim_keeps_gaps_and_every_row() {
        let mut rows: Vec<Vec<String>> = (0..30)
            .map(|i| vec![format!("I{i}"), format!("{i}.5")])
            .collect();
        rows[3][1] = "N/A".to_string();
        let raw = RawTable {
            headers: vec!["Industry".into(), "Weight".into()],
            rows,
        };
        let records = shape(raw, None, Trim::FULL, 20);
        assert_eq!(records.len(), 30);
        assert_eq!(records[3]["Weight"], Scalar::Empty);
        assert_eq!(records[4]["Weight"], Scalar::Float(4.5));
        assert_eq!(records[29]["Industry"], Scalar::from("I29"));
    }

    #[test]
    fn missing_price_column_is_a_no_op() {
        let raw = table(&["Symbol", "Last"], &[&["A", "1.5 x"]]);
        let records = shape(raw, Some(CANONICAL_COLUMNS), Trim::LISTING, 20);
        assert_eq!(records[0]["Last"], Scalar::from("1.5 x"));
    }

    #[test]
    fn select_projects_and_reports_gaps() {
        let raw = table(
            &["Symbol", "Name", "Price", "Change", "Volume"],
            &[&["^GSPC", "S&P 500", "5,000.10 +3", "+3.00", "0"]],
        );
        let records = shape(raw, Some(CANONICAL_COLUMNS), Trim::LISTING, 20);

        let picked = select(records.clone(), &["symbol", "price"]).unwrap();
        let keys: Vec<&str> = picked[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["symbol", "price"]);
        assert_eq!(picked[0]["price"], Scalar::from("5,000.10"));

        let err = select(records, &["symbol", "marketCap"]).unwrap_err();
        assert!(matches!(err, ParseError::MissingColumn(col) if col == "marketCap"));
    }
}
