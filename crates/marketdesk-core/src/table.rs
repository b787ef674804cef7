//! Read every `<table>` of an HTML document into header + rows of cell text.
//!
//! Header rules:
//!
//! - the header is the last `<thead>` row, else a leading row made only of
//!   `<th>` cells, else positional names `0, 1, 2, ...`;
//! - cell text is the element's text with whitespace runs collapsed;
//! - `colspan = n` repeats a cell `n` times;
//! - empty header names become `Unnamed: <position>` and repeated names get
//!   `.1`, `.2`, ... suffixes.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

pub const UNNAMED_PREFIX: &str = "Unnamed: ";

/// Upper bound on `colspan`, so a hostile page cannot blow up a row.
const MAX_COLSPAN: usize = 64;

/// A parsed table before any normalization.
///
/// Rows may be shorter than `headers`; the missing tail counts as missing cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

struct Cell {
    text: String,
    header: bool,
    span: usize,
}

/// Parse all tables in document order, nested tables included.
pub fn parse_tables(html: &str) -> Vec<RawTable> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("table") else {
        return Vec::new();
    };
    document.select(&selector).map(read_table).collect()
}

fn read_table(table: ElementRef) -> RawTable {
    let mut head_rows: Vec<Vec<Cell>> = Vec::new();
    let mut body_rows: Vec<Vec<Cell>> = Vec::new();

    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "thead" => head_rows.extend(rows_of(child)),
            "tbody" | "tfoot" => body_rows.extend(rows_of(child)),
            "tr" => body_rows.push(read_row(child)),
            _ => {}
        }
    }

    let header_cells = match head_rows.pop() {
        Some(last) => Some(last),
        None if body_rows
            .first()
            .is_some_and(|row| !row.is_empty() && row.iter().all(|cell| cell.header)) =>
        {
            Some(body_rows.remove(0))
        }
        None => None,
    };

    let rows: Vec<Vec<String>> = body_rows
        .into_iter()
        .filter(|row| !row.is_empty())
        .map(expand)
        .collect();

    let headers = match header_cells {
        Some(cells) => name_columns(expand(cells)),
        None => {
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            (0..width).map(|i| i.to_string()).collect()
        }
    };

    RawTable { headers, rows }
}

fn rows_of(section: ElementRef) -> Vec<Vec<Cell>> {
    section
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
        .map(read_row)
        .collect()
}

fn read_row(row: ElementRef) -> Vec<Cell> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter_map(|el| {
            let header = match el.value().name() {
                "th" => true,
                "td" => false,
                _ => return None,
            };
            let span = el
                .value()
                .attr("colspan")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(1)
                .clamp(1, MAX_COLSPAN);
            Some(Cell {
                text: cell_text(el),
                header,
                span,
            })
        })
        .collect()
}

fn expand(cells: Vec<Cell>) -> Vec<String> {
    let mut out = Vec::with_capacity(cells.len());
    for cell in cells {
        for _ in 1..cell.span {
            out.push(cell.text.clone());
        }
        out.push(cell.text);
    }
    out
}

fn cell_text(el: ElementRef) -> String {
    let raw: String = el.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn name_columns(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.into_iter()
        .enumerate()
        .map(|(i, name)| {
            let name = if name.is_empty() {
                format!("{UNNAMED_PREFIX}{i}")
            } else {
                name
            };
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name
            } else {
                format!("{name}.{count}")
            };
            *count += 1;
            unique
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_thead_and_tbody() {
        let html = r#"
            <html><body>
            <table>
              <thead><tr><th>Symbol</th><th>Name</th><th>Price</th></tr></thead>
              <tbody>
                <tr><td>AAPL</td><td>Apple   Inc.</td><td><span>150.00</span> <span>+1.0%</span></td></tr>
                <tr><td>MSFT</td><td>Microsoft</td><td>300.10</td></tr>
              </tbody>
            </table>
            </body></html>"#;

        let tables = parse_tables(html);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["Symbol", "Name", "Price"]);
        assert_eq!(
            tables[0].rows,
            vec![
                vec!["AAPL", "Apple Inc.", "150.00 +1.0%"],
                vec!["MSFT", "Microsoft", "300.10"],
            ]
        );
    }

    #[test]
    fn leading_th_row_is_the_header_without_thead() {
        let html = "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>";
        let table = &parse_tables(html)[0];
        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(table.rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn headerless_tables_get_positional_names() {
        let html = "<table><tr><td>x</td><td>y</td><td>z</td></tr><tr><td>1</td></tr></table>";
        let table = &parse_tables(html)[0];
        assert_eq!(table.headers, vec!["0", "1", "2"]);
        assert_eq!(table.rows[1], vec!["1"]);
    }

    #[test]
    fn names_blank_and_repeated_headers() {
        let html = "<table><thead><tr><th>Symbol</th><th></th><th>Change</th><th>Change</th></tr></thead>\
                    <tbody><tr><td>A</td><td>b</td><td>c</td><td>d</td></tr></tbody></table>";
        let table = &parse_tables(html)[0];
        assert_eq!(
            table.headers,
            vec!["Symbol", "Unnamed: 1", "Change", "Change.1"]
        );
    }

    #[test]
    fn colspan_repeats_cells() {
        let html = "<table><thead><tr><th colspan=\"2\">Range</th><th>Close</th></tr></thead>\
                    <tbody><tr><td>1</td><td>2</td><td>3</td></tr></tbody></table>";
        let table = &parse_tables(html)[0];
        assert_eq!(table.headers, vec!["Range", "Range.1", "Close"]);
    }

    #[test]
    fn tables_come_back_in_document_order() {
        let html = "<table><tr><th>First</th></tr></table>\
                    <div><table><tr><th>Second</th></tr><tr><td>v</td></tr></table></div>";
        let tables = parse_tables(html);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].headers, vec!["First"]);
        assert!(tables[0].rows.is_empty());
        assert_eq!(tables[1].headers, vec!["Second"]);
        assert_eq!(tables[1].rows, vec![vec!["v"]]);
    }

    #[test]
    fn no_tables_is_an_empty_list() {
        assert!(parse_tables("<html><body><p>nothing</p></body></html>").is_empty());
    }
}
